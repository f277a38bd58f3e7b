#![forbid(unsafe_code)]

//! Insertion sort with a shifting insert.
//!
//! The value at `i` (raised, special) is compared against the sorted prefix
//! from right to left (each candidate raised, comparing). The scan stops at
//! the first value not greater than it, which keeps equal values in input
//! order. The value is then moved into place with a single
//! [`insert_shift`](Engine::insert_shift) rather than a chain of swaps, so
//! the prefix slides right in one step. The prefix is shown partly sorted
//! until the end, when every bar turns sorted at once.

use sortviz_core::BarValue;
use sortviz_runtime::{Engine, StepResult};

use crate::{settle_trivial, span};

const COMPARE_PAUSE: u64 = 200;
const INSERTED_PAUSE: u64 = 150;
const STEP_PAUSE: u64 = 100;
const FINISH_PAUSE: u64 = 200;

pub fn sort<V: BarValue>(engine: &Engine<V>) -> StepResult<()> {
    if settle_trivial(engine)? {
        return Ok(());
    }
    let n = engine.len();

    for i in 1..n {
        let current = engine.read(i)?;
        let mut insert_at = 0;
        let mut anchor = None;

        for j in (0..i).rev() {
            engine.highlight_with_anchor(&[i], &[j])?;
            engine.sleep(COMPARE_PAUSE)?;
            if engine.read(j)? <= current {
                insert_at = j + 1;
                anchor = Some(j);
                break;
            }
        }

        if insert_at < i {
            engine.insert_shift(i, insert_at, anchor)?;
            engine.sleep(INSERTED_PAUSE)?;
            engine.highlight_with_anchor(&[], &[])?;
            engine.mark_partly_sorted(&[insert_at])?;
        } else {
            engine.highlight_with_anchor(&[], &[])?;
            engine.mark_partly_sorted(&span(0, i + 1))?;
        }
        engine.sleep(STEP_PAUSE)?;
    }

    engine.sleep(FINISH_PAUSE)?;
    let all = span(0, n);
    engine.clear_partly_sorted(&all)?;
    for i in all {
        engine.mark_sorted(i)?;
    }
    Ok(())
}
