#![forbid(unsafe_code)]

//! Timed waits between animation steps.
//!
//! The engine never sleeps directly; it asks a [`Pacer`] to wait out an
//! effective duration. [`ThreadPacer`] blocks the driver thread on the
//! gate's interruptible wait. [`VirtualPacer`] only records what was asked
//! for, which makes runs deterministic and instant for tests and headless
//! use.

use std::sync::{Arc, Mutex};
use web_time::Duration;

use crate::gate::GateProbe;

/// Strategy for suspending the driver thread.
pub trait Pacer: Send + Sync {
    /// Wait for `duration`, returning early if the gate is cancelled.
    ///
    /// Implementations must not observe pause; the engine checks the gate
    /// before and after every wait.
    fn wait(&self, probe: &GateProbe, duration: Duration);
}

/// Real-time pacing on the gate's condition variable.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn wait(&self, probe: &GateProbe, duration: Duration) {
        let _ = probe.wait_timeout(duration);
    }
}

/// Records requested durations and returns immediately.
#[derive(Debug, Clone, Default)]
pub struct VirtualPacer {
    waits: Arc<Mutex<Vec<Duration>>>,
}

impl VirtualPacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every duration requested so far, in order.
    pub fn waits(&self) -> Vec<Duration> {
        self.lock().clone()
    }

    /// Sum of every requested duration: the wall time a real run would take.
    pub fn total(&self) -> Duration {
        self.lock().iter().sum()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Duration>> {
        self.waits.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Pacer for VirtualPacer {
    fn wait(&self, _probe: &GateProbe, duration: Duration) {
        self.lock().push(duration);
    }
}
