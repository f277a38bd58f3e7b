#![forbid(unsafe_code)]

//! Selection sort.
//!
//! The running minimum of the unsorted suffix is kept special while the scan
//! compares it against each candidate. One swap per position, then the
//! position is sorted and the rest of the suffix is shown partly sorted.

use sortviz_core::BarValue;
use sortviz_runtime::{Engine, StepResult};

use crate::{settle_trivial, span};

const COMPARE_PAUSE: u64 = 120;
const STEP_PAUSE: u64 = 100;
const FINALE_PAUSE: u64 = 500;

pub fn sort<V: BarValue>(engine: &Engine<V>) -> StepResult<()> {
    if settle_trivial(engine)? {
        return Ok(());
    }
    let n = engine.len();

    for i in 0..n - 1 {
        engine.highlight(&[i])?;
        engine.mark_special(&[i])?;

        let mut min = i;
        for j in i + 1..n {
            engine.highlight(&[min, j])?;
            if engine.read(j)? < engine.read(min)? {
                engine.mark_special(&[])?;
                min = j;
                engine.mark_special(&[min])?;
            }
            engine.sleep(COMPARE_PAUSE)?;
        }

        engine.highlight(&[])?;
        if min != i {
            engine.swap(i, min)?;
        }
        engine.mark_sorted(i)?;
        engine.mark_special(&[])?;
        engine.mark_partly_sorted(&span(i + 1, n))?;
        engine.sleep(STEP_PAUSE)?;
    }
    engine.mark_sorted(n - 1)?;

    engine.highlight(&span(0, n))?;
    engine.sleep(FINALE_PAUSE)?;
    engine.highlight(&[])
}
