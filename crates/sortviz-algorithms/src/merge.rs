#![forbid(unsafe_code)]

//! Top-down merge sort, merging in place through overwrites.
//!
//! Both halves are copied out before a merge; the merged run is then
//! written back slot by slot with [`overwrite`](Engine::overwrite). Ties
//! take from the left half, which keeps the sort stable.

use sortviz_core::BarValue;
use sortviz_runtime::{Engine, StepResult};

use crate::span;

const SECTION_PAUSE: u64 = 200;
const WRITE_PAUSE: u64 = 150;
const FINALE_PAUSE: u64 = 500;

pub fn sort<V: BarValue>(engine: &Engine<V>) -> StepResult<()> {
    let n = engine.len();
    if n == 0 {
        return Ok(());
    }
    split(engine, 0, n - 1)?;

    // Overwrites mark what they write; a single element is never written.
    for i in 0..n {
        engine.mark_sorted(i)?;
    }
    engine.highlight(&span(0, n))?;
    engine.sleep(FINALE_PAUSE)?;
    engine.highlight(&[])
}

fn split<V: BarValue>(engine: &Engine<V>, left: usize, right: usize) -> StepResult<()> {
    if left >= right {
        return Ok(());
    }
    let mid = left + (right - left) / 2;
    split(engine, left, mid)?;
    split(engine, mid + 1, right)?;
    merge(engine, left, mid, right)
}

fn merge<V: BarValue>(engine: &Engine<V>, left: usize, mid: usize, right: usize) -> StepResult<()> {
    let values = engine.values();
    let lower = &values[left..=mid];
    let upper = &values[mid + 1..=right];
    tracing::trace!(left, mid, right, "merge");

    engine.highlight(&span(left, right + 1))?;
    engine.sleep(SECTION_PAUSE)?;

    let (mut i, mut j, mut k) = (0, 0, left);
    while i < lower.len() && j < upper.len() {
        engine.highlight(&[left + i, mid + 1 + j])?;
        if lower[i] <= upper[j] {
            engine.overwrite(k, lower[i])?;
            i += 1;
        } else {
            engine.overwrite(k, upper[j])?;
            j += 1;
        }
        k += 1;
        engine.sleep(WRITE_PAUSE)?;
    }

    for &value in lower[i..].iter().chain(&upper[j..]) {
        engine.highlight(&[k])?;
        engine.overwrite(k, value)?;
        k += 1;
        engine.sleep(WRITE_PAUSE)?;
    }

    engine.highlight(&[])?;
    engine.mark_partly_sorted(&span(left, right + 1))
}
