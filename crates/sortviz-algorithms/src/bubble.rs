#![forbid(unsafe_code)]

//! Bubble sort with early exit.
//!
//! Each pass compares neighbours left to right and bubbles the largest
//! unsorted value into `last`, which is then marked sorted. A pass without
//! a swap proves the prefix is already in order, so the whole prefix is
//! marked at once and the loop stops.

use sortviz_core::BarValue;
use sortviz_runtime::{Engine, StepResult};

use crate::settle_trivial;

/// Pause after each comparison.
const COMPARE_PAUSE: u64 = 120;
/// Pause after locking the tail of a pass.
const PASS_PAUSE: u64 = 100;

pub fn sort<V: BarValue>(engine: &Engine<V>) -> StepResult<()> {
    if settle_trivial(engine)? {
        return Ok(());
    }
    let n = engine.len();

    for pass in 0..n - 1 {
        let last = n - pass - 1;
        let mut swapped = false;

        for j in 0..last {
            engine.highlight(&[j, j + 1])?;
            if engine.read(j)? > engine.read(j + 1)? {
                engine.swap(j, j + 1)?;
                swapped = true;
            }
            engine.sleep(COMPARE_PAUSE)?;
        }

        engine.highlight(&[])?;
        engine.mark_sorted(last)?;
        engine.sleep(PASS_PAUSE)?;
        tracing::trace!(pass, swapped, "bubble pass");

        if !swapped {
            for k in 0..last {
                engine.mark_sorted(k)?;
            }
            break;
        }
    }

    engine.mark_sorted(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sortviz_runtime::board::lock_board;

    #[test]
    fn already_sorted_input_takes_one_pass() {
        let (engine, _) = Engine::detached(vec![1u32, 2, 3, 4]);
        sort(&engine).unwrap();
        let trace = lock_board(engine.board()).take_trace();
        assert!(!trace.iter().any(|s| s.moves_data()));
        let highlights = trace
            .iter()
            .filter(|s| matches!(s, sortviz_runtime::Step::Highlight(v) if v.len() == 2))
            .count();
        assert_eq!(highlights, 3);
    }

    #[test]
    fn reversed_input_is_sorted() {
        let (engine, _) = Engine::detached(vec![5u32, 4, 3, 2, 1]);
        sort(&engine).unwrap();
        assert_eq!(engine.values(), vec![1, 2, 3, 4, 5]);
        assert!(lock_board(engine.board()).is_fully_sorted());
    }
}
