#![forbid(unsafe_code)]

//! Quick sort, Lomuto partition with the last element as pivot.
//!
//! The pivot stays raised and special for the whole partition while each
//! candidate is raised against it. Values not greater than the pivot grow a
//! partly-sorted region on the left. The pivot is then lowered, swapped to
//! the region boundary, and marked sorted; the region marks are cleared
//! before recursing.

use sortviz_core::BarValue;
use sortviz_runtime::{Engine, StepResult};

use crate::{settle_trivial, span};

const PIVOT_PAUSE: u64 = 150;
const SINGLE_PAUSE: u64 = 100;

pub fn sort<V: BarValue>(engine: &Engine<V>) -> StepResult<()> {
    if settle_trivial(engine)? {
        return Ok(());
    }
    quick_sort(engine, 0, engine.len() - 1)
}

/// Sort `[low, high]`; requires `low <= high`.
fn quick_sort<V: BarValue>(engine: &Engine<V>, low: usize, high: usize) -> StepResult<()> {
    if low == high {
        engine.mark_sorted(low)?;
        return engine.sleep(SINGLE_PAUSE);
    }

    let pivot = partition(engine, low, high)?;
    if pivot > low {
        quick_sort(engine, low, pivot - 1)?;
    }
    if pivot < high {
        quick_sort(engine, pivot + 1, high)?;
    }
    Ok(())
}

fn partition<V: BarValue>(engine: &Engine<V>, low: usize, high: usize) -> StepResult<usize> {
    let pivot = engine.read(high)?;
    engine.raise_special(high)?;
    engine.sleep(PIVOT_PAUSE)?;

    let mut boundary = low;
    for j in low..high {
        engine.compare_against(j, high)?;
        let value = engine.read(j)?;
        engine.clear_comparison()?;
        if value <= pivot {
            if boundary != j {
                engine.swap(boundary, j)?;
            }
            engine.mark_partly_sorted(&[boundary])?;
            boundary += 1;
        }
    }

    engine.lower_special(high, false)?;
    if boundary != high {
        engine.swap(boundary, high)?;
    }
    engine.clear_partly_sorted(&[boundary])?;
    engine.mark_sorted(boundary)?;
    engine.sleep(PIVOT_PAUSE)?;

    engine.clear_partly_sorted(&span(low, boundary))?;
    tracing::trace!(low, high, pivot = boundary, "partition");
    Ok(boundary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sortviz_runtime::board::lock_board;

    #[test]
    fn pivot_lands_in_final_position() {
        let (engine, _) = Engine::detached(vec![4u32, 7, 1, 3]);
        let p = partition(&engine, 0, 3).unwrap();
        assert_eq!(p, 1);
        let values = engine.values();
        assert_eq!(values[1], 3);
        assert!(values[..1].iter().all(|&v| v <= 3));
        assert!(values[2..].iter().all(|&v| v > 3));
        let board = lock_board(engine.board());
        assert!(board.states().is_sorted(1));
        assert_eq!(board.states().partly_sorted().count(), 0);
        assert_eq!(board.states().special().count(), 0);
    }

    #[test]
    fn all_equal_values() {
        let (engine, _) = Engine::detached(vec![2u32; 6]);
        sort(&engine).unwrap();
        assert!(lock_board(engine.board()).is_fully_sorted());
    }
}
