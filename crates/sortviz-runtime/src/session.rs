#![forbid(unsafe_code)]

//! Run orchestration.
//!
//! A [`Session`] owns one board, one control gate, and at most one driver
//! thread. It is the only place where cancellation is swallowed: whatever a
//! run ends with, the session joins the thread, settles the gate back to
//! `Idle` with the flag cleared, and reports a [`RunOutcome`].
//!
//! # Lifecycle
//!
//! ```text
//! reset ──> start ──> (pause ⇄ resume)* ──> finish | cancel ──> Idle
//! ```
//!
//! `reset`, `set_size`, and a fresh `start` all cancel or refuse any run in
//! progress; `resize` only relayouts and is safe at any time.

use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use rand::SeedableRng;
use rand::rngs::SmallRng;
use sortviz_core::{SpeedDial, Viewport};
use web_time::Instant;

use crate::board::{Board, BoardSnapshot, SharedBoard, lock_board};
use crate::config::{ConfigError, MAX_SIZE, SessionConfig};
use crate::dataset::random_values;
use crate::driver::Driver;
use crate::engine::Engine;
use crate::error::{SessionError, StepError, StepResult};
use crate::gate::{ControlGate, RunPhase};
use crate::pacer::{Pacer, ThreadPacer};
use crate::trace::Step;

/// Viewport assumed until the first [`Session::resize`].
pub const DEFAULT_VIEWPORT: Viewport = Viewport::new(1280.0, 900.0);

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The driver returned normally.
    Completed,
    /// The run was cancelled; not a fault.
    Cancelled,
    /// The driver failed or panicked.
    Failed(StepError),
}

impl RunOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => f.write_str("completed"),
            Self::Cancelled => f.write_str("cancelled"),
            Self::Failed(e) => write!(f, "failed: {e}"),
        }
    }
}

struct Worker {
    algorithm: &'static str,
    handle: JoinHandle<StepResult<()>>,
    started: Instant,
}

/// One board, one gate, at most one running driver.
pub struct Session {
    config: SessionConfig,
    board: SharedBoard<u32>,
    gate: ControlGate,
    speed: SpeedDial,
    pacer: Arc<dyn Pacer>,
    rng: SmallRng,
    worker: Option<Worker>,
    last_outcome: Option<RunOutcome>,
}

impl Session {
    /// Validate `config` and generate the first array.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        let config = config.validated()?;
        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        let values = random_values(config.size, &mut rng);
        let mut board = Board::new(values, config.geometry.clone(), DEFAULT_VIEWPORT);
        if config.trace {
            board = board.with_trace();
        }
        Ok(Self {
            speed: SpeedDial::new(Some(config.speed)),
            board: board.shared(),
            gate: ControlGate::new(),
            pacer: Arc::new(ThreadPacer),
            rng,
            worker: None,
            last_outcome: None,
            config,
        })
    }

    /// Replace the pacer used by subsequent runs.
    pub fn with_pacer(mut self, pacer: impl Pacer + 'static) -> Self {
        self.pacer = Arc::new(pacer);
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn phase(&self) -> RunPhase {
        self.gate.phase()
    }

    /// `true` while a driver thread exists (running, paused, or finished but
    /// not yet reaped).
    pub fn has_worker(&self) -> bool {
        self.worker.is_some()
    }

    /// Name of the driver currently attached, if any.
    pub fn running_algorithm(&self) -> Option<&'static str> {
        self.worker.as_ref().map(|w| w.algorithm)
    }

    /// Outcome of the most recently reaped run.
    pub fn last_outcome(&self) -> Option<&RunOutcome> {
        self.last_outcome.as_ref()
    }

    // ── Board ─────────────────────────────────────────────────────────────

    /// Cancel any run, then regenerate the array and clear every state.
    pub fn reset(&mut self) {
        self.cancel();
        let values = random_values(self.config.size, &mut self.rng);
        tracing::debug!(size = values.len(), "session reset");
        lock_board(&self.board).reset(values);
        self.last_outcome = None;
    }

    /// Change the array size (capped at [`MAX_SIZE`]) and reset.
    pub fn set_size(&mut self, size: usize) {
        self.config.size = size.min(MAX_SIZE);
        self.reset();
    }

    pub fn size(&self) -> usize {
        self.config.size
    }

    /// Recompute the layout for a new viewport. Safe during a run.
    pub fn resize(&self, viewport: Viewport) {
        lock_board(&self.board).set_viewport(viewport);
    }

    /// Move the speed slider; takes effect at the next step.
    ///
    /// Values above 1 are clamped to 1. Non-finite or non-positive values are
    /// rejected and the slider keeps its position. Returns whether the slider
    /// was updated.
    pub fn set_speed(&mut self, speed: f64) -> bool {
        if !(speed.is_finite() && speed > 0.0) {
            tracing::warn!(speed, "ignoring speed outside (0, 1]");
            return false;
        }
        let speed = speed.min(1.0);
        self.config.speed = speed;
        self.speed.set(speed);
        true
    }

    pub fn speed(&self) -> f64 {
        self.config.speed
    }

    /// Committed values.
    pub fn values(&self) -> Vec<u32> {
        lock_board(&self.board).committed().to_vec()
    }

    pub fn snapshot(&self) -> BoardSnapshot<u32> {
        let phase = self.gate.phase();
        lock_board(&self.board).snapshot(phase)
    }

    pub fn is_fully_sorted(&self) -> bool {
        lock_board(&self.board).is_fully_sorted()
    }

    /// Take the recorded steps; empty unless tracing is enabled.
    pub fn take_trace(&self) -> Vec<Step> {
        lock_board(&self.board).take_trace()
    }

    // ── Runs ──────────────────────────────────────────────────────────────

    /// Run `driver` on a dedicated thread.
    ///
    /// Refused with [`SessionError::Busy`] while another run is attached.
    /// The board's states are cleared first; its values are kept.
    pub fn start<D: Driver + 'static>(&mut self, driver: D) -> Result<(), SessionError> {
        if self.worker.is_some() && self.poll().is_none() {
            return Err(SessionError::Busy);
        }
        if !self.gate.begin() {
            return Err(SessionError::Busy);
        }

        let len = {
            let mut board = lock_board(&self.board);
            board.prepare_run();
            board.len()
        };
        let engine = Engine::new(
            Arc::clone(&self.board),
            self.gate.probe(),
            Arc::clone(&self.pacer),
            self.speed.clone(),
            self.config.pacing,
        );
        let algorithm = driver.name();
        let spawned = thread::Builder::new()
            .name(format!("sortviz-{algorithm}"))
            .spawn(move || driver.run(&engine));
        let handle = match spawned {
            Ok(handle) => handle,
            Err(e) => {
                self.gate.settle();
                return Err(SessionError::Spawn(e));
            }
        };

        tracing::debug!(algorithm, len, "run started");
        self.last_outcome = None;
        self.worker = Some(Worker {
            algorithm,
            handle,
            started: Instant::now(),
        });
        Ok(())
    }

    /// `Running -> Paused`. Returns whether the phase changed.
    pub fn pause(&self) -> bool {
        self.gate.pause()
    }

    /// `Paused -> Running`. Returns whether the phase changed.
    pub fn resume(&self) -> bool {
        self.gate.resume()
    }

    /// Play button: start when idle, otherwise flip pause.
    ///
    /// `driver` is only used when a new run starts. Returns the new phase.
    pub fn toggle<D: Driver + 'static>(&mut self, driver: D) -> Result<RunPhase, SessionError> {
        self.poll();
        match self.gate.phase() {
            RunPhase::Idle => self.start(driver)?,
            RunPhase::Running => {
                self.pause();
            }
            RunPhase::Paused => {
                self.resume();
            }
        }
        Ok(self.gate.phase())
    }

    /// Cancel the attached run and wait for it to unwind.
    ///
    /// Returns `None` when no run is attached.
    pub fn cancel(&mut self) -> Option<RunOutcome> {
        let worker = self.worker.take()?;
        if self.gate.cancel() {
            tracing::debug!(algorithm = worker.algorithm, "run cancel requested");
        }
        Some(self.reap(worker))
    }

    /// Reap the attached run if its thread has finished.
    pub fn poll(&mut self) -> Option<RunOutcome> {
        if !self.worker.as_ref()?.handle.is_finished() {
            return None;
        }
        let worker = self.worker.take()?;
        Some(self.reap(worker))
    }

    /// Block until the attached run finishes.
    ///
    /// A paused run never finishes on its own; resume or cancel it from
    /// another thread first.
    pub fn wait(&mut self) -> Option<RunOutcome> {
        let worker = self.worker.take()?;
        Some(self.reap(worker))
    }

    fn reap(&mut self, worker: Worker) -> RunOutcome {
        let algorithm = worker.algorithm;
        let outcome = match worker.handle.join() {
            Ok(Ok(())) => RunOutcome::Completed,
            Ok(Err(e)) if e.is_cancellation() => RunOutcome::Cancelled,
            Ok(Err(e)) => {
                tracing::warn!(algorithm, error = %e, "driver failed");
                RunOutcome::Failed(e)
            }
            Err(_) => {
                tracing::warn!(algorithm, "driver panicked");
                RunOutcome::Failed(StepError::Driver("driver panicked".to_string()))
            }
        };
        self.gate.settle();

        {
            let mut board = lock_board(&self.board);
            board.clear_flash();
            if outcome.is_completed() && !board.is_fully_sorted() {
                tracing::warn!(algorithm, "driver completed without sorting every position");
            }
        }

        tracing::debug!(
            algorithm,
            %outcome,
            elapsed_ms = worker.started.elapsed().as_millis() as u64,
            "run finished"
        );
        self.last_outcome = Some(outcome.clone());
        outcome
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("gate", &self.gate)
            .field("running", &self.running_algorithm())
            .field("last_outcome", &self.last_outcome)
            .finish()
    }
}
