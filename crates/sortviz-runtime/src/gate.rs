// SPDX-License-Identifier: MIT
//! Cooperative pause/cancel gate for algorithm runs.
//!
//! [`ControlGate`] is the orchestrator's handle: it moves the run phase and
//! raises cancellation. [`GateProbe`] is the read-only view handed to the
//! engine; every animation primitive consults it before and after its timed
//! wait. Nothing on the probe side can change the phase.
//!
//! # State machine
//!
//! ```text
//! Idle --begin--> Running --pause--> Paused
//!                    ^                  |
//!                    +-----resume-------+
//! Running|Paused --settle--> Idle        (cancellation flag cleared)
//! ```
//!
//! `cancel()` overlays a flag on `Running` or `Paused` and is ignored in
//! `Idle`. A cancelled gate never blocks: paused waiters and timed waits
//! wake immediately and the next [`GateProbe::checkpoint`] fails.
//!
//! # Example
//!
//! ```
//! use sortviz_runtime::gate::{ControlGate, RunPhase};
//! use std::time::Duration;
//!
//! let gate = ControlGate::new();
//! let probe = gate.probe();
//! assert!(gate.begin());
//!
//! let worker = std::thread::spawn(move || {
//!     while probe.checkpoint().is_ok() {
//!         probe.wait_timeout(Duration::from_millis(5));
//!     }
//! });
//!
//! gate.cancel();
//! worker.join().unwrap();
//! gate.settle();
//! assert_eq!(gate.phase(), RunPhase::Idle);
//! ```

#![forbid(unsafe_code)]

use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use web_time::{Duration, Instant};

use crate::error::{StepError, StepResult};

/// Run phase of the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunPhase {
    #[default]
    Idle,
    Running,
    Paused,
}

impl RunPhase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
        }
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Default)]
struct GateState {
    phase: RunPhase,
    cancelled: bool,
}

#[derive(Default)]
struct GateInner {
    state: Mutex<GateState>,
    wake: Condvar,
}

impl GateInner {
    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Orchestrator-side handle that drives the run phase.
///
/// One gate is created per orchestration session and reused across runs.
/// Dropping the gate does **not** cancel outstanding probes.
pub struct ControlGate {
    inner: Arc<GateInner>,
}

/// Engine-side, read-only view of a [`ControlGate`].
///
/// Cheap to clone and safe to move onto the driver thread.
#[derive(Clone)]
pub struct GateProbe {
    inner: Arc<GateInner>,
}

impl ControlGate {
    /// Create an idle gate with cancellation cleared.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(GateInner::default()),
        }
    }

    /// Obtain a probe observing this gate.
    pub fn probe(&self) -> GateProbe {
        GateProbe {
            inner: Arc::clone(&self.inner),
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.inner.lock().phase
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.lock().cancelled
    }

    /// `Idle -> Running`. Returns `false` (and changes nothing) from any
    /// other phase.
    pub fn begin(&self) -> bool {
        let mut state = self.inner.lock();
        if state.phase != RunPhase::Idle {
            return false;
        }
        state.phase = RunPhase::Running;
        state.cancelled = false;
        tracing::debug!(phase = "running", "gate begin");
        true
    }

    /// `Running -> Paused`. Returns whether the phase changed.
    pub fn pause(&self) -> bool {
        let mut state = self.inner.lock();
        if state.phase != RunPhase::Running {
            return false;
        }
        state.phase = RunPhase::Paused;
        tracing::debug!(phase = "paused", "gate pause");
        true
    }

    /// `Paused -> Running`, waking every paused waiter.
    pub fn resume(&self) -> bool {
        let mut state = self.inner.lock();
        if state.phase != RunPhase::Paused {
            return false;
        }
        state.phase = RunPhase::Running;
        self.inner.wake.notify_all();
        tracing::debug!(phase = "running", "gate resume");
        true
    }

    /// Raise cancellation and wake every waiter, paused or timed.
    ///
    /// Ignored while idle. Returns whether the flag was newly raised.
    pub fn cancel(&self) -> bool {
        let mut state = self.inner.lock();
        if state.phase == RunPhase::Idle || state.cancelled {
            return false;
        }
        state.cancelled = true;
        self.inner.wake.notify_all();
        tracing::debug!(phase = %state.phase, "gate cancel");
        true
    }

    /// Return to `Idle` with cancellation cleared.
    pub fn settle(&self) {
        let mut state = self.inner.lock();
        state.phase = RunPhase::Idle;
        state.cancelled = false;
        self.inner.wake.notify_all();
        tracing::debug!(phase = "idle", "gate settle");
    }
}

impl Default for ControlGate {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ControlGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("ControlGate")
            .field("phase", &state.phase)
            .field("cancelled", &state.cancelled)
            .finish()
    }
}

impl GateProbe {
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.inner.lock().cancelled
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.inner.lock().phase == RunPhase::Paused
    }

    pub fn phase(&self) -> RunPhase {
        self.inner.lock().phase
    }

    /// Block while the gate is paused.
    ///
    /// Returns immediately when cancellation is set; the caller must then
    /// observe it (see [`checkpoint`](Self::checkpoint)).
    pub fn await_if_paused(&self) {
        let mut state = self.inner.lock();
        while !state.cancelled && state.phase == RunPhase::Paused {
            state = self
                .inner
                .wake
                .wait(state)
                .unwrap_or_else(|e| e.into_inner());
        }
    }

    /// The suspension-point check: wait out a pause, then fail with
    /// [`StepError::Cancelled`] if cancellation was raised.
    pub fn checkpoint(&self) -> StepResult<()> {
        self.await_if_paused();
        if self.is_cancelled() {
            return Err(StepError::Cancelled);
        }
        Ok(())
    }

    /// Block until either cancellation is raised or `duration` elapses.
    ///
    /// Returns `true` if cancelled, `false` if the full duration passed.
    /// Pause and resume do not cut the wait short.
    pub fn wait_timeout(&self, duration: Duration) -> bool {
        let start = Instant::now();
        let mut state = self.inner.lock();
        loop {
            if state.cancelled {
                return true;
            }
            let elapsed = start.elapsed();
            if elapsed >= duration {
                return false;
            }
            let (next, _) = self
                .inner
                .wake
                .wait_timeout(state, duration - elapsed)
                .unwrap_or_else(|e| e.into_inner());
            state = next;
        }
    }
}

impl fmt::Debug for GateProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("GateProbe")
            .field("phase", &state.phase)
            .field("cancelled", &state.cancelled)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    #[test]
    fn gate_starts_idle() {
        let gate = ControlGate::new();
        assert_eq!(gate.phase(), RunPhase::Idle);
        assert!(!gate.is_cancelled());
    }

    #[test]
    fn begin_only_from_idle() {
        let gate = ControlGate::new();
        assert!(gate.begin());
        assert!(!gate.begin());
        gate.pause();
        assert!(!gate.begin());
    }

    #[test]
    fn pause_and_resume_transitions() {
        let gate = ControlGate::new();
        assert!(!gate.pause());
        gate.begin();
        assert!(gate.pause());
        assert!(!gate.pause());
        assert_eq!(gate.phase(), RunPhase::Paused);
        assert!(gate.resume());
        assert!(!gate.resume());
        assert_eq!(gate.phase(), RunPhase::Running);
    }

    #[test]
    fn cancel_ignored_when_idle() {
        let gate = ControlGate::new();
        assert!(!gate.cancel());
        assert!(!gate.is_cancelled());
    }

    #[test]
    fn cancel_propagates_to_probes() {
        let gate = ControlGate::new();
        let p1 = gate.probe();
        let p2 = p1.clone();
        gate.begin();
        gate.cancel();
        assert!(p1.is_cancelled());
        assert!(p2.is_cancelled());
        assert_eq!(p1.checkpoint(), Err(StepError::Cancelled));
    }

    #[test]
    fn cancel_is_idempotent() {
        let gate = ControlGate::new();
        gate.begin();
        assert!(gate.cancel());
        assert!(!gate.cancel());
        assert!(gate.is_cancelled());
    }

    #[test]
    fn settle_clears_cancellation() {
        let gate = ControlGate::new();
        gate.begin();
        gate.cancel();
        gate.settle();
        assert_eq!(gate.phase(), RunPhase::Idle);
        assert!(!gate.is_cancelled());
        assert!(gate.probe().checkpoint().is_ok());
    }

    #[test]
    fn drop_gate_does_not_cancel() {
        let gate = ControlGate::new();
        let probe = gate.probe();
        gate.begin();
        drop(gate);
        assert!(!probe.is_cancelled());
    }

    #[test]
    fn wait_timeout_returns_true_when_already_cancelled() {
        let gate = ControlGate::new();
        let probe = gate.probe();
        gate.begin();
        gate.cancel();
        assert!(probe.wait_timeout(Duration::from_secs(10)));
    }

    #[test]
    fn wait_timeout_returns_false_on_timeout() {
        let gate = ControlGate::new();
        gate.begin();
        assert!(!gate.probe().wait_timeout(Duration::from_millis(10)));
    }

    #[test]
    fn wait_timeout_wakes_on_cancel() {
        let gate = ControlGate::new();
        let probe = gate.probe();
        gate.begin();

        let handle = thread::spawn(move || probe.wait_timeout(Duration::from_secs(10)));

        thread::sleep(Duration::from_millis(20));
        gate.cancel();

        assert!(handle.join().unwrap());
    }

    #[test]
    fn paused_probe_blocks_until_resume() {
        let gate = ControlGate::new();
        let probe = gate.probe();
        gate.begin();
        gate.pause();

        let passed = Arc::new(AtomicBool::new(false));
        let passed_clone = passed.clone();
        let handle = thread::spawn(move || {
            let result = probe.checkpoint();
            passed_clone.store(true, Ordering::SeqCst);
            result
        });

        thread::sleep(Duration::from_millis(30));
        assert!(!passed.load(Ordering::SeqCst));
        gate.resume();
        assert!(handle.join().unwrap().is_ok());
        assert!(passed.load(Ordering::SeqCst));
    }

    #[test]
    fn cancel_releases_paused_probe() {
        let gate = ControlGate::new();
        let probe = gate.probe();
        gate.begin();
        gate.pause();

        let handle = thread::spawn(move || probe.checkpoint());

        thread::sleep(Duration::from_millis(20));
        gate.cancel();
        assert_eq!(handle.join().unwrap(), Err(StepError::Cancelled));
    }

    #[test]
    fn independent_gates_do_not_interfere() {
        let a = ControlGate::new();
        let b = ControlGate::new();
        a.begin();
        b.begin();
        a.cancel();
        assert!(a.probe().is_cancelled());
        assert!(!b.probe().is_cancelled());
    }
}
