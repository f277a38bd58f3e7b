#![forbid(unsafe_code)]

//! The board: array model, element states, and derived layout.
//!
//! # Committed vs displayed values
//!
//! The board keeps two copies of the array. *Committed* values are what
//! drivers read; *displayed* values are what renderers draw. Swap and rotate
//! update the displayed copy first, suspend for the animation, then commit,
//! so a driver never reads a half-finished exchange. Overwrite commits both
//! at once. Outside an in-flight step the two copies are equal.
//!
//! # Ownership
//!
//! A board is shared as [`SharedBoard`] between the engine (driver thread)
//! and the session (orchestrator thread). Only engine primitives mutate the
//! array and the element states; the session may only relayout and take
//! snapshots.

use std::sync::{Arc, Mutex, MutexGuard};

use sortviz_core::{
    BarAppearance, BarValue, ElementState, ElementStates, GeometryConfig, Layout, Viewport,
    VisualState, appearance,
};

use crate::error::{StepError, StepResult};
use crate::gate::RunPhase;
use crate::trace::Step;

/// Board shared between the engine and its owner.
pub type SharedBoard<V> = Arc<Mutex<Board<V>>>;

/// Lock a shared board, recovering from a poisoned lock.
///
/// A driver that panics mid-primitive leaves the board internally well
/// formed (every mutation is a single constant-time step), so the data is
/// still usable.
pub fn lock_board<V: BarValue>(board: &Mutex<Board<V>>) -> MutexGuard<'_, Board<V>> {
    board.lock().unwrap_or_else(|e| e.into_inner())
}

/// A transient tone override on one bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashState {
    pub index: usize,
    pub tone: VisualState,
}

/// Array model, element states, layout, and optional step trace.
#[derive(Debug)]
pub struct Board<V: BarValue = u32> {
    committed: Vec<V>,
    displayed: Vec<V>,
    states: ElementStates,
    geometry: GeometryConfig,
    viewport: Viewport,
    layout: Option<Layout>,
    flash: Option<FlashState>,
    trace: Option<Vec<Step>>,
}

impl<V: BarValue> Board<V> {
    /// Create a board over `values` with every position idle.
    pub fn new(values: Vec<V>, geometry: GeometryConfig, viewport: Viewport) -> Self {
        let mut board = Self {
            states: ElementStates::new(values.len()),
            displayed: values.clone(),
            committed: values,
            geometry,
            viewport,
            layout: None,
            flash: None,
            trace: None,
        };
        board.relayout();
        board
    }

    /// Start recording a [`Step`] trace.
    pub fn with_trace(mut self) -> Self {
        self.trace = Some(Vec::new());
        self
    }

    /// Wrap the board for sharing.
    pub fn shared(self) -> SharedBoard<V> {
        Arc::new(Mutex::new(self))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.committed.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }

    /// Values drivers read.
    pub fn committed(&self) -> &[V] {
        &self.committed
    }

    /// Values renderers draw.
    pub fn displayed(&self) -> &[V] {
        &self.displayed
    }

    pub fn states(&self) -> &ElementStates {
        &self.states
    }

    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn geometry(&self) -> &GeometryConfig {
        &self.geometry
    }

    pub fn flash(&self) -> Option<FlashState> {
        self.flash
    }

    pub fn is_tracing(&self) -> bool {
        self.trace.is_some()
    }

    /// Replace the array, drop every state, and recompute the layout.
    ///
    /// An enabled trace stays enabled but is emptied.
    pub fn reset(&mut self, values: Vec<V>) {
        self.states.reset(values.len());
        self.displayed = values.clone();
        self.committed = values;
        self.flash = None;
        if let Some(trace) = &mut self.trace {
            trace.clear();
        }
        self.relayout();
    }

    /// Bring the board to a clean pre-run state over its current values.
    ///
    /// Displayed values snap back to committed ones (a cancelled swap may
    /// have left them apart) and every state is cleared.
    pub fn prepare_run(&mut self) {
        self.displayed.clone_from(&self.committed);
        self.states.reset(self.committed.len());
        self.flash = None;
        self.relayout();
    }

    /// Recompute the layout for a new viewport. States are untouched.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.relayout();
    }

    /// Recompute the layout from the displayed magnitudes.
    pub fn relayout(&mut self) {
        let magnitudes: Vec<u32> = self.displayed.iter().map(BarValue::magnitude).collect();
        self.layout = self.geometry.layout(&magnitudes, self.viewport);
    }

    /// Drop any transient flash.
    pub fn clear_flash(&mut self) {
        self.flash = None;
    }

    /// Every position sorted and the committed array non-decreasing.
    pub fn is_fully_sorted(&self) -> bool {
        self.states.all_sorted() && self.committed.windows(2).all(|w| w[0] <= w[1])
    }

    /// Take the recorded trace, leaving an empty one in place.
    pub fn take_trace(&mut self) -> Vec<Step> {
        self.trace.as_mut().map(std::mem::take).unwrap_or_default()
    }

    /// Copy out everything a renderer needs.
    pub fn snapshot(&self, phase: RunPhase) -> BoardSnapshot<V> {
        BoardSnapshot {
            values: self.displayed.clone(),
            states: self.states.states(),
            layout: self.layout,
            flash: self.flash,
            phase,
        }
    }

    // ── Engine-side mutation ──────────────────────────────────────────────

    pub(crate) fn check(&self, index: usize) -> StepResult<()> {
        let len = self.committed.len();
        if len == 0 {
            Err(StepError::EmptyBoard)
        } else if index >= len {
            Err(StepError::OutOfBounds { index, len })
        } else {
            Ok(())
        }
    }

    pub(crate) fn check_all(&self, indices: &[usize]) -> StepResult<()> {
        indices.iter().try_for_each(|&i| self.check(i))
    }

    pub(crate) fn states_mut(&mut self) -> &mut ElementStates {
        &mut self.states
    }

    pub(crate) fn displayed_mut(&mut self) -> &mut [V] {
        &mut self.displayed
    }

    pub(crate) fn committed_mut(&mut self) -> &mut [V] {
        &mut self.committed
    }

    pub(crate) fn set_flash(&mut self, flash: Option<FlashState>) {
        self.flash = flash;
    }

    pub(crate) fn record(&mut self, step: Step) {
        tracing::trace!(?step, "primitive");
        if let Some(trace) = &mut self.trace {
            trace.push(step);
        }
    }
}

/// Owned copy of a board for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardSnapshot<V: BarValue = u32> {
    /// Displayed values, in index order.
    pub values: Vec<V>,
    pub states: Vec<ElementState>,
    pub layout: Option<Layout>,
    pub flash: Option<FlashState>,
    pub phase: RunPhase,
}

impl<V: BarValue> BoardSnapshot<V> {
    /// Renderable attributes for every bar; empty when there is no layout.
    pub fn bars(&self) -> Vec<BarAppearance> {
        let Some(layout) = &self.layout else {
            return Vec::new();
        };
        self.values
            .iter()
            .zip(&self.states)
            .enumerate()
            .map(|(index, (value, state))| {
                let flash = self
                    .flash
                    .filter(|flash| flash.index == index)
                    .map(|flash| flash.tone);
                appearance(index, value.magnitude(), *state, flash, layout)
            })
            .collect()
    }

    /// Number of positions in each visual state, in precedence order.
    pub fn tally(&self) -> [(VisualState, usize); 5] {
        let mut tally = [
            (VisualState::Special, 0),
            (VisualState::Comparing, 0),
            (VisualState::Sorted, 0),
            (VisualState::PartlySorted, 0),
            (VisualState::Idle, 0),
        ];
        for state in &self.states {
            let visual = state.visual();
            if let Some(slot) = tally.iter_mut().find(|(tone, _)| *tone == visual) {
                slot.1 += 1;
            }
        }
        tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(values: Vec<u32>) -> Board {
        Board::new(values, GeometryConfig::default(), Viewport::new(800.0, 1000.0))
    }

    #[test]
    fn new_board_has_layout_and_idle_states() {
        let b = board(vec![3, 1, 2]);
        assert_eq!(b.len(), 3);
        assert!(b.layout().is_some());
        assert!(b.states().states().iter().all(|s| *s == ElementState::default()));
        assert_eq!(b.committed(), b.displayed());
    }

    #[test]
    fn empty_board_has_no_layout() {
        let b = board(Vec::new());
        assert!(b.layout().is_none());
        assert_eq!(b.check(0), Err(StepError::EmptyBoard));
        assert!(b.snapshot(RunPhase::Idle).bars().is_empty());
    }

    #[test]
    fn bounds_are_checked() {
        let b = board(vec![1, 2]);
        assert!(b.check(1).is_ok());
        assert_eq!(b.check(2), Err(StepError::OutOfBounds { index: 2, len: 2 }));
        assert!(b.check_all(&[0, 5]).is_err());
    }

    #[test]
    fn resize_keeps_states() {
        let mut b = board(vec![1, 2, 3]);
        b.states_mut().set_comparing(&[1]);
        b.states_mut().mark_sorted(2);
        let before = b.states().states();
        let old = b.layout().copied();
        b.set_viewport(Viewport::new(400.0, 2000.0));
        assert_eq!(b.states().states(), before);
        assert_ne!(b.layout().copied(), old);
    }

    #[test]
    fn prepare_run_resyncs_displayed_values() {
        let mut b = board(vec![1, 2, 3]);
        b.displayed_mut().swap(0, 2);
        b.states_mut().mark_sorted(0);
        b.set_flash(Some(FlashState {
            index: 0,
            tone: VisualState::Special,
        }));
        b.prepare_run();
        assert_eq!(b.displayed(), &[1, 2, 3]);
        assert!(!b.states().is_sorted(0));
        assert!(b.flash().is_none());
    }

    #[test]
    fn fully_sorted_requires_order_and_marks() {
        let mut b = board(vec![2, 1]);
        b.states_mut().mark_sorted(0);
        b.states_mut().mark_sorted(1);
        assert!(!b.is_fully_sorted());
        b.reset(vec![1, 2]);
        assert!(!b.is_fully_sorted());
        b.states_mut().mark_sorted(0);
        b.states_mut().mark_sorted(1);
        assert!(b.is_fully_sorted());
    }

    #[test]
    fn trace_is_opt_in() {
        let mut plain = board(vec![1]);
        plain.record(Step::MarkSorted(0));
        assert!(plain.take_trace().is_empty());

        let mut traced = board(vec![1]).with_trace();
        traced.record(Step::MarkSorted(0));
        assert_eq!(traced.take_trace(), vec![Step::MarkSorted(0)]);
        assert!(traced.take_trace().is_empty());
    }

    #[test]
    fn snapshot_applies_flash_to_one_bar() {
        let mut b = board(vec![1, 2, 3]);
        b.set_flash(Some(FlashState {
            index: 1,
            tone: VisualState::Special,
        }));
        let bars = b.snapshot(RunPhase::Running).bars();
        assert_eq!(bars.len(), 3);
        assert!(bars[1].flashing);
        assert!(!bars[0].flashing && !bars[2].flashing);
    }

    #[test]
    fn tally_counts_resolved_tones() {
        let mut b = board(vec![1, 2, 3, 4]);
        b.states_mut().set_comparing(&[0]);
        b.states_mut().mark_sorted(3);
        let tally = b.snapshot(RunPhase::Idle).tally();
        assert_eq!(tally[1], (VisualState::Comparing, 1));
        assert_eq!(tally[2], (VisualState::Sorted, 1));
        assert_eq!(tally[4], (VisualState::Idle, 2));
    }
}
