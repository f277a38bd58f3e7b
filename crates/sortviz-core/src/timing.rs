#![forbid(unsafe_code)]

//! Speed curve and effective step durations.
//!
//! Every timed suspension in the engine is built from one formula:
//!
//! ```text
//! factor(v)  = 0.3 + 0.85 * v^2          (v in (0, 1]; otherwise 1)
//! effective  = max(floor, (base + additive) / factor)
//! ```
//!
//! The additive term slows short steps more than long ones; the floor keeps
//! the fastest setting visible.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Factor at the bottom of the curve.
pub const SPEED_BASE: f64 = 0.3;
/// Quadratic gain of the curve.
pub const SPEED_GAIN: f64 = 0.85;

/// Map a normalized slider value to a speed factor.
///
/// Missing, non-finite, or non-positive input yields `1.0`.
pub fn speed_factor(slider: Option<f64>) -> f64 {
    match slider {
        Some(v) if v.is_finite() && v > 0.0 => SPEED_BASE + SPEED_GAIN * v * v,
        _ => 1.0,
    }
}

/// Floor and additive constants for effective durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Pacing {
    /// Shortest effective duration, in milliseconds.
    pub floor_ms: u64,
    /// Added to every base duration before scaling, in milliseconds.
    pub additive_ms: u64,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            floor_ms: 24,
            additive_ms: 80,
        }
    }
}

impl Pacing {
    /// Effective duration of a step with `base` duration at `factor`.
    pub fn effective(&self, base: Duration, factor: f64) -> Duration {
        let factor = if factor.is_finite() && factor > 0.0 {
            factor
        } else {
            1.0
        };
        let base_ms = base.as_secs_f64() * 1000.0 + self.additive_ms as f64;
        let ms = (base_ms / factor).max(self.floor_ms as f64);
        Duration::from_nanos((ms * 1_000_000.0).round() as u64)
    }
}

/// Shared slider position, readable from the driver thread while the
/// orchestrator moves it.
#[derive(Debug, Clone)]
pub struct SpeedDial {
    bits: Arc<AtomicU64>,
}

impl SpeedDial {
    /// Create a dial at `slider`; `None` means "no slider" (factor 1).
    pub fn new(slider: Option<f64>) -> Self {
        Self {
            bits: Arc::new(AtomicU64::new(slider.unwrap_or(f64::NAN).to_bits())),
        }
    }

    /// Move the slider.
    pub fn set(&self, slider: f64) {
        self.bits.store(slider.to_bits(), Ordering::Release);
    }

    /// Detach the slider; the factor falls back to 1.
    pub fn clear(&self) {
        self.bits.store(f64::NAN.to_bits(), Ordering::Release);
    }

    /// Current slider position, if one is set.
    pub fn value(&self) -> Option<f64> {
        let v = f64::from_bits(self.bits.load(Ordering::Acquire));
        v.is_finite().then_some(v)
    }

    /// Current speed factor.
    pub fn factor(&self) -> f64 {
        speed_factor(self.value())
    }
}

impl Default for SpeedDial {
    fn default() -> Self {
        Self::new(None)
    }
}
