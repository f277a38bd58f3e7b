#![forbid(unsafe_code)]

//! Core: geometry, element state, pacing math, and renderable attributes.
//!
//! # Role in sortviz
//! `sortviz-core` holds the pure, thread-agnostic pieces of the animation
//! engine. Nothing in here sleeps, locks, or touches a terminal; the runtime
//! (`sortviz-runtime`) wraps these types behind the control gate and the
//! animation primitives that drivers call.
//!
//! # Primary responsibilities
//! - **Geometry**: value-to-extent scaling, element width, raise offsets.
//! - **Element states**: the layered `comparing` / `special` /
//!   `partly_sorted` / `sorted` model and its precedence rules.
//! - **Timing**: the speed-slider curve and effective step durations.
//! - **Appearance**: `state -> renderable attributes` for presentation
//!   adapters.

pub mod appearance;
pub mod element;
pub mod geometry;
pub mod timing;
pub mod value;

pub use appearance::{BarAppearance, appearance};
pub use element::{ElementState, ElementStates, VisualState};
pub use geometry::{GeometryConfig, Layout, Sides, Viewport};
pub use timing::{Pacing, SpeedDial, speed_factor};
pub use value::BarValue;
