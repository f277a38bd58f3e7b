#![forbid(unsafe_code)]

//! Error taxonomy for animation steps and runs.

use thiserror::Error;

/// Result alias for primitives and drivers.
pub type StepResult<T> = Result<T, StepError>;

/// Why an animation step did not complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepError {
    /// The control gate was cancelled. Expected; the session turns this into
    /// a normal return to idle.
    #[error("run cancelled")]
    Cancelled,
    /// A primitive was handed an index outside the array.
    #[error("index {index} out of bounds for array of length {len}")]
    OutOfBounds { index: usize, len: usize },
    /// A primitive that needs values ran against an empty board.
    #[error("board has no values")]
    EmptyBoard,
    /// Any other driver failure.
    #[error("driver failed: {0}")]
    Driver(String),
}

impl StepError {
    /// `true` for the expected cancellation signal.
    #[inline]
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Orchestration-level refusals.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A run is already in progress (running or paused).
    #[error("a run is already in progress")]
    Busy,
    /// The driver thread could not be started.
    #[error("failed to spawn driver thread: {0}")]
    Spawn(#[from] std::io::Error),
}
