#![forbid(unsafe_code)]

//! Runtime: control gate, animation primitives, and run orchestration.
//!
//! # Role in sortviz
//! `sortviz-runtime` turns the pure data of `sortviz-core` into a running
//! animation. Drivers (see `sortviz-algorithms`) execute on one dedicated
//! thread per run and talk only to an [`Engine`]; the orchestrator (a UI
//! loop, a test, a headless runner) talks only to a [`Session`].
//!
//! # Primary responsibilities
//! - **Control gate**: `Idle / Running / Paused` plus a cancellation flag,
//!   consulted at every suspension point.
//! - **Engine**: the primitive toolbox (highlight, mark, swap, overwrite,
//!   rotate, flash, sleep) with gate checks around every timed wait.
//! - **Session**: start / pause / resume / cancel, reaping the driver thread
//!   and swallowing cancellation.
//! - **Board**: committed and displayed values, element states, layout, and
//!   an optional step trace, shared behind one lock.
//!
//! # Threading
//! The board lock is held only for constant-time mutations and snapshots,
//! never across a wait. Timed waits go through a [`Pacer`]; the default
//! [`ThreadPacer`] wakes immediately on cancellation.

pub mod board;
pub mod config;
pub mod dataset;
pub mod driver;
pub mod engine;
pub mod error;
pub mod gate;
pub mod pacer;
pub mod session;
pub mod trace;

pub use board::{Board, BoardSnapshot, FlashState, SharedBoard};
pub use config::{ConfigError, SessionConfig};
pub use driver::{Driver, FnDriver};
pub use engine::{Engine, FlashOptions, Settle};
pub use error::{SessionError, StepError, StepResult};
pub use gate::{ControlGate, GateProbe, RunPhase};
pub use pacer::{Pacer, ThreadPacer, VirtualPacer};
pub use session::{RunOutcome, Session};
pub use trace::Step;
