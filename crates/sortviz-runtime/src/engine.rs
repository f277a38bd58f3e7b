#![forbid(unsafe_code)]

//! Animation primitives: the only legal way a driver touches the board.
//!
//! Every primitive follows the same discipline:
//!
//! 1. pass the gate ([`GateProbe::checkpoint`]): wait out a pause, fail
//!    with [`StepError::Cancelled`] if cancelled;
//! 2. validate indices and apply its constant-time mutation under the board
//!    lock;
//! 3. release the lock and [`sleep`](Engine::sleep), which checks the gate
//!    again before and after the timed wait.
//!
//! Nothing is mutated after a failed checkpoint. Swap and rotate commit the
//! data only after their wait succeeds, so a driver reading between
//! primitives always sees a consistent array.
//!
//! # Example
//!
//! ```
//! use sortviz_runtime::engine::Engine;
//!
//! let (engine, pacer) = Engine::detached(vec![3u32, 1, 2]);
//! engine.highlight(&[0, 1])?;
//! if engine.read(0)? > engine.read(1)? {
//!     engine.swap(0, 1)?;
//! }
//! assert_eq!(engine.values(), vec![1, 3, 2]);
//! assert_eq!(pacer.waits().len(), 2);
//! # Ok::<(), sortviz_runtime::StepError>(())
//! ```

use std::fmt;
use std::sync::{Arc, MutexGuard};

use sortviz_core::{BarValue, GeometryConfig, Pacing, SpeedDial, Viewport, VisualState};
use web_time::Duration;

use crate::board::{Board, FlashState, SharedBoard, lock_board};
use crate::error::StepResult;
use crate::gate::{ControlGate, GateProbe};
use crate::pacer::{Pacer, VirtualPacer};
use crate::trace::Step;

/// Base durations of the primitives, in milliseconds, before speed scaling.
pub mod durations {
    pub const HIGHLIGHT: u64 = 240;
    pub const HIGHLIGHT_WITH_ANCHOR: u64 = 240;
    pub const MARK_SPECIAL: u64 = 160;
    pub const SWAP: u64 = 300;
    /// Hold between the two highlights of an overwrite.
    pub const OVERWRITE_HOLD: u64 = 260;
    pub const ROTATE: u64 = 250;
    pub const RAISE_SPECIAL: u64 = 200;
    pub const LOWER_SPECIAL: u64 = 150;
    pub const COMPARE_AGAINST: u64 = 180;
    pub const CLEAR_COMPARISON: u64 = 100;
    pub const LOWER: u64 = 150;
}

const DETACHED_VIEWPORT: Viewport = Viewport::new(1280.0, 900.0);

/// Where a bar lands after [`Engine::lower`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Settle {
    /// Only drop the comparison.
    #[default]
    Stay,
    PartlySorted,
    Sorted,
}

/// Options for [`Engine::flash`].
///
/// The interval is raw wall time; it is not scaled by the speed dial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashOptions {
    pub tone: VisualState,
    pub times: u32,
    pub interval: Duration,
}

impl Default for FlashOptions {
    fn default() -> Self {
        Self {
            tone: VisualState::Special,
            times: 3,
            interval: Duration::from_millis(150),
        }
    }
}

/// Driver-facing handle to a board.
///
/// Cloning yields another handle to the same board, gate, and pacer.
#[derive(Clone)]
pub struct Engine<V: BarValue = u32> {
    board: SharedBoard<V>,
    probe: GateProbe,
    pacer: Arc<dyn Pacer>,
    speed: SpeedDial,
    pacing: Pacing,
}

impl<V: BarValue> fmt::Debug for Engine<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("len", &self.len())
            .field("probe", &self.probe)
            .field("speed", &self.speed.value())
            .field("pacing", &self.pacing)
            .finish()
    }
}

impl<V: BarValue> Engine<V> {
    pub fn new(
        board: SharedBoard<V>,
        probe: GateProbe,
        pacer: Arc<dyn Pacer>,
        speed: SpeedDial,
        pacing: Pacing,
    ) -> Self {
        Self {
            board,
            probe,
            pacer,
            speed,
            pacing,
        }
    }

    /// A self-contained engine over `values`: idle gate, default geometry,
    /// trace enabled, and a [`VirtualPacer`] so nothing actually sleeps.
    pub fn detached(values: Vec<V>) -> (Self, VirtualPacer) {
        let pacer = VirtualPacer::new();
        let board = Board::new(values, GeometryConfig::default(), DETACHED_VIEWPORT)
            .with_trace()
            .shared();
        let engine = Self::new(
            board,
            ControlGate::new().probe(),
            Arc::new(pacer.clone()),
            SpeedDial::default(),
            Pacing::default(),
        );
        (engine, pacer)
    }

    /// The board this engine drives.
    pub fn board(&self) -> &SharedBoard<V> {
        &self.board
    }

    pub fn probe(&self) -> &GateProbe {
        &self.probe
    }

    fn lock(&self) -> MutexGuard<'_, Board<V>> {
        lock_board(&self.board)
    }

    // ── Reads ─────────────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Committed value at `index`. Never suspends.
    pub fn read(&self, index: usize) -> StepResult<V> {
        let board = self.lock();
        board.check(index)?;
        Ok(board.committed()[index])
    }

    /// Copy of the committed array.
    pub fn values(&self) -> Vec<V> {
        self.lock().committed().to_vec()
    }

    // ── Timing ────────────────────────────────────────────────────────────

    /// Suspend for `base_ms` scaled by the speed dial, checking the gate
    /// before and after.
    pub fn sleep(&self, base_ms: u64) -> StepResult<()> {
        let effective = self
            .pacing
            .effective(Duration::from_millis(base_ms), self.speed.factor());
        self.wait(effective)
    }

    /// Alias of [`sleep`](Self::sleep), for drivers that read better with it.
    pub fn pause(&self, base_ms: u64) -> StepResult<()> {
        self.sleep(base_ms)
    }

    fn wait(&self, duration: Duration) -> StepResult<()> {
        self.probe.checkpoint()?;
        self.pacer.wait(&self.probe, duration);
        self.probe.checkpoint()
    }

    /// Gate check followed by one locked mutation.
    fn apply<T>(&self, f: impl FnOnce(&mut Board<V>) -> StepResult<T>) -> StepResult<T> {
        self.probe.checkpoint()?;
        let mut board = self.lock();
        f(&mut board)
    }

    // ── Comparison visuals ────────────────────────────────────────────────

    /// Make `indices` exactly the comparing set.
    pub fn highlight(&self, indices: &[usize]) -> StepResult<()> {
        self.apply(|board| {
            board.check_all(indices)?;
            board.states_mut().set_comparing(indices);
            board.record(Step::Highlight(indices.to_vec()));
            Ok(())
        })?;
        self.sleep(durations::HIGHLIGHT)
    }

    /// Make `anchors` exactly the special set and `candidates` exactly the
    /// comparing set. Both are raised.
    pub fn highlight_with_anchor(&self, anchors: &[usize], candidates: &[usize]) -> StepResult<()> {
        self.apply(|board| {
            board.check_all(anchors)?;
            board.check_all(candidates)?;
            let states = board.states_mut();
            states.set_special(anchors);
            states.set_comparing(candidates);
            board.record(Step::HighlightWithAnchor {
                anchors: anchors.to_vec(),
                candidates: candidates.to_vec(),
            });
            Ok(())
        })?;
        self.sleep(durations::HIGHLIGHT_WITH_ANCHOR)
    }

    /// Make `index` the only comparing bar, keeping `pivot` if it is one.
    pub fn compare_against(&self, index: usize, pivot: usize) -> StepResult<()> {
        self.apply(|board| {
            board.check(index)?;
            board.check(pivot)?;
            let keep_pivot = board.states().state(pivot).comparing && pivot != index;
            let next = if keep_pivot {
                vec![index, pivot]
            } else {
                vec![index]
            };
            board.states_mut().set_comparing(&next);
            board.record(Step::CompareAgainst { index, pivot });
            Ok(())
        })?;
        self.sleep(durations::COMPARE_AGAINST)
    }

    /// Drop every comparison. Special bars stay raised.
    pub fn clear_comparison(&self) -> StepResult<()> {
        self.apply(|board| {
            board.states_mut().clear_comparing();
            board.record(Step::ClearComparison);
            Ok(())
        })?;
        self.sleep(durations::CLEAR_COMPARISON)
    }

    /// Drop the comparison at `index` and settle the bar.
    pub fn lower(&self, index: usize, settle: Settle) -> StepResult<()> {
        self.apply(|board| {
            board.check(index)?;
            let states = board.states_mut();
            states.remove_comparing(index);
            match settle {
                Settle::Stay => 0,
                Settle::PartlySorted => states.mark_partly_sorted(&[index]),
                Settle::Sorted => states.mark_sorted(index),
            };
            board.record(Step::Lower { index, settle });
            Ok(())
        })?;
        self.sleep(durations::LOWER)
    }

    // ── Special ───────────────────────────────────────────────────────────

    /// Make `indices` exactly the special set.
    pub fn mark_special(&self, indices: &[usize]) -> StepResult<()> {
        self.apply(|board| {
            board.check_all(indices)?;
            board.states_mut().set_special(indices);
            board.record(Step::MarkSpecial(indices.to_vec()));
            Ok(())
        })?;
        self.sleep(durations::MARK_SPECIAL)
    }

    /// Remove `indices` from the special set. Does not suspend.
    pub fn clear_special(&self, indices: &[usize]) -> StepResult<()> {
        self.apply(|board| {
            board.check_all(indices)?;
            board.states_mut().clear_special(indices);
            board.record(Step::ClearSpecial(indices.to_vec()));
            Ok(())
        })
    }

    /// Add `index` to the special set without touching other members.
    pub fn raise_special(&self, index: usize) -> StepResult<()> {
        self.apply(|board| {
            board.check(index)?;
            board.states_mut().add_special(index);
            board.record(Step::RaiseSpecial(index));
            Ok(())
        })?;
        self.sleep(durations::RAISE_SPECIAL)
    }

    /// Remove `index` from the special set, optionally marking it sorted.
    pub fn lower_special(&self, index: usize, mark_sorted: bool) -> StepResult<()> {
        self.apply(|board| {
            board.check(index)?;
            let states = board.states_mut();
            states.clear_special(&[index]);
            if mark_sorted {
                states.mark_sorted(index);
            }
            board.record(Step::LowerSpecial {
                index,
                sorted: mark_sorted,
            });
            Ok(())
        })?;
        self.sleep(durations::LOWER_SPECIAL)
    }

    // ── Progress marks (no suspension) ────────────────────────────────────

    /// Union `indices` into the partly-sorted set.
    pub fn mark_partly_sorted(&self, indices: &[usize]) -> StepResult<()> {
        self.apply(|board| {
            board.check_all(indices)?;
            board.states_mut().mark_partly_sorted(indices);
            board.record(Step::MarkPartlySorted(indices.to_vec()));
            Ok(())
        })
    }

    pub fn clear_partly_sorted(&self, indices: &[usize]) -> StepResult<()> {
        self.apply(|board| {
            board.check_all(indices)?;
            board.states_mut().clear_partly_sorted(indices);
            board.record(Step::ClearPartlySorted(indices.to_vec()));
            Ok(())
        })
    }

    /// Terminal: mark `index` sorted, dropping its special and partly-sorted
    /// layers.
    pub fn mark_sorted(&self, index: usize) -> StepResult<()> {
        self.apply(|board| {
            board.check(index)?;
            board.states_mut().mark_sorted(index);
            board.record(Step::MarkSorted(index));
            Ok(())
        })
    }

    // ── Data movement ─────────────────────────────────────────────────────

    /// Exchange the values at `i` and `j` along with their special and
    /// partly-sorted layers. No-op when `i == j`.
    ///
    /// The displayed array and the layers change first; the committed array
    /// changes only after the animation wait completes.
    pub fn swap(&self, i: usize, j: usize) -> StepResult<()> {
        let moved = self.apply(|board| {
            board.check(i)?;
            board.check(j)?;
            if i == j {
                return Ok(false);
            }
            board.displayed_mut().swap(i, j);
            board.states_mut().swap_layers(i, j);
            let (a, b) = (board.committed()[i].magnitude(), board.committed()[j].magnitude());
            board.record(Step::Swap { i, j, a, b });
            Ok(true)
        })?;
        if !moved {
            return Ok(());
        }
        self.sleep(durations::SWAP)?;
        self.lock().committed_mut().swap(i, j);
        Ok(())
    }

    /// Write `value` at `index`, relayout, flash a highlight, then mark the
    /// slot sorted.
    pub fn overwrite(&self, index: usize, value: V) -> StepResult<()> {
        self.apply(|board| {
            board.check(index)?;
            board.committed_mut()[index] = value;
            board.displayed_mut()[index] = value;
            board.relayout();
            board.record(Step::Overwrite {
                index,
                value: value.magnitude(),
            });
            Ok(())
        })?;
        self.highlight(&[index])?;
        self.sleep(durations::OVERWRITE_HOLD)?;
        self.highlight(&[])?;
        self.mark_sorted(index)
    }

    /// Move the value at `from` to `to`, shifting everything strictly between
    /// them one slot toward `from`. Element layers stay where they are.
    pub fn rotate(&self, from: usize, to: usize) -> StepResult<()> {
        let moved = self.apply(|board| {
            board.check(from)?;
            board.check(to)?;
            if from == to {
                return Ok(false);
            }
            rotate_range(board.displayed_mut(), from, to);
            board.record(Step::Rotate { from, to });
            Ok(true)
        })?;
        if !moved {
            return Ok(());
        }
        self.sleep(durations::ROTATE)?;
        rotate_range(self.lock().committed_mut(), from, to);
        Ok(())
    }

    /// Insertion shift: [`rotate`](Self::rotate) plus the reclassification
    /// that goes with it, applied in one step.
    ///
    /// - every comparison is dropped;
    /// - `anchor` (the bar the inserted value settles after) is lowered into
    ///   partly sorted;
    /// - every other slot of the rotated range is lowered into partly sorted;
    /// - `to` becomes the single raised special bar.
    pub fn insert_shift(&self, from: usize, to: usize, anchor: Option<usize>) -> StepResult<()> {
        let moved = self.apply(|board| {
            board.check(from)?;
            board.check(to)?;
            if let Some(anchor) = anchor {
                board.check(anchor)?;
            }
            if from == to {
                return Ok(false);
            }
            rotate_range(board.displayed_mut(), from, to);

            let (lo, hi) = (from.min(to), from.max(to));
            let shifted: Vec<usize> = (lo..=hi).filter(|&k| k != to).collect();
            let states = board.states_mut();
            states.clear_comparing();
            if let Some(anchor) = anchor {
                states.clear_special(&[anchor]);
                states.mark_partly_sorted(&[anchor]);
            }
            states.clear_special(&shifted);
            states.mark_partly_sorted(&shifted);
            states.clear_partly_sorted(&[to]);
            states.set_special(&[to]);

            board.record(Step::InsertShift { from, to, anchor });
            Ok(true)
        })?;
        if !moved {
            return Ok(());
        }
        self.sleep(durations::ROTATE)?;
        rotate_range(self.lock().committed_mut(), from, to);
        Ok(())
    }

    // ── Cosmetic ──────────────────────────────────────────────────────────

    /// Pulse the bar at `index` in `options.tone`. Tracked layers are not
    /// touched; the override is gone when this returns, even on error.
    pub fn flash(&self, index: usize, options: FlashOptions) -> StepResult<()> {
        self.apply(|board| {
            board.check(index)?;
            board.record(Step::Flash {
                index,
                tone: options.tone,
                times: options.times,
            });
            Ok(())
        })?;
        let on = FlashState {
            index,
            tone: options.tone,
        };
        for _ in 0..options.times {
            self.probe.checkpoint()?;
            self.lock().set_flash(Some(on));
            self.pacer.wait(&self.probe, options.interval);
            self.lock().set_flash(None);
            self.wait(options.interval)?;
        }
        Ok(())
    }
}

fn rotate_range<T>(slice: &mut [T], from: usize, to: usize) {
    if from > to {
        slice[to..=from].rotate_right(1);
    } else if from < to {
        slice[from..=to].rotate_left(1);
    }
}
