#![forbid(unsafe_code)]

//! Heap sort on a max-heap.
//!
//! Build the heap bottom-up, then repeatedly flash the root, swap it behind
//! the heap, mark it sorted, and sift the new root down. During a sift the
//! parent and its children are raised together and the winning child is
//! marked special before the exchange.

use sortviz_core::{BarValue, VisualState};
use sortviz_runtime::{Engine, FlashOptions, StepResult};
use web_time::Duration;

use crate::settle_trivial;

const WINNER_PAUSE: u64 = 100;
const EXTRACT_PAUSE: u64 = 100;

/// The root pulses before each extraction.
const ROOT_FLASH: FlashOptions = FlashOptions {
    tone: VisualState::Special,
    times: 3,
    interval: Duration::from_millis(120),
};

pub fn sort<V: BarValue>(engine: &Engine<V>) -> StepResult<()> {
    if settle_trivial(engine)? {
        return Ok(());
    }
    let n = engine.len();

    for i in (0..n / 2).rev() {
        sift_down(engine, n, i)?;
    }
    engine.highlight(&[])?;
    engine.mark_special(&[])?;

    for end in (1..n).rev() {
        engine.flash(0, ROOT_FLASH)?;
        engine.highlight(&[0, end])?;
        engine.sleep(EXTRACT_PAUSE)?;
        engine.swap(0, end)?;
        engine.mark_sorted(end)?;
        engine.highlight(&[])?;
        sift_down(engine, end, 0)?;
    }

    engine.mark_sorted(0)?;
    engine.highlight(&[])?;
    engine.mark_special(&[])
}

/// Restore the heap property below `root` within the first `heap_size`
/// slots.
fn sift_down<V: BarValue>(engine: &Engine<V>, heap_size: usize, root: usize) -> StepResult<()> {
    let mut parent = root;
    loop {
        let left = 2 * parent + 1;
        let right = left + 1;
        let family: Vec<usize> = [parent, left, right]
            .into_iter()
            .filter(|&i| i == parent || i < heap_size)
            .collect();
        engine.highlight(&family)?;

        let mut largest = parent;
        if left < heap_size && engine.read(left)? > engine.read(largest)? {
            largest = left;
        }
        if right < heap_size && engine.read(right)? > engine.read(largest)? {
            largest = right;
        }
        if largest == parent {
            return engine.highlight(&[]);
        }

        engine.mark_special(&[largest])?;
        engine.sleep(WINNER_PAUSE)?;
        engine.swap(parent, largest)?;
        engine.highlight(&[])?;
        engine.mark_special(&[])?;
        parent = largest;
    }
}
