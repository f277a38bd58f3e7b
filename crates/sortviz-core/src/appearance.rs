#![forbid(unsafe_code)]

//! `state -> renderable attributes`.
//!
//! Presentation adapters never look at element layers or geometry constants
//! directly; they draw [`BarAppearance`] values.

use crate::element::{ElementState, VisualState};
use crate::geometry::Layout;

/// Everything a renderer needs to draw one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarAppearance {
    pub index: usize,
    /// Left edge, relative to the container's inner area.
    pub x: f64,
    pub width: f64,
    /// Bar height.
    pub extent: f64,
    /// Distance the bar's bottom is lifted above the baseline.
    pub lift: f64,
    /// Colour class after precedence and any transient flash.
    pub tone: VisualState,
    /// `true` while a flash overrides the tone.
    pub flashing: bool,
}

/// Compute the appearance of the bar at `index`.
///
/// `flash` is a transient tone override; it does not reflect tracked state.
pub fn appearance(
    index: usize,
    magnitude: u32,
    state: ElementState,
    flash: Option<VisualState>,
    layout: &Layout,
) -> BarAppearance {
    let lift = if state.is_raised() {
        layout.raise(magnitude)
    } else {
        0.0
    };
    BarAppearance {
        index,
        x: layout.x_offset(index),
        width: layout.element_width,
        extent: layout.extent(magnitude),
        lift,
        tone: flash.unwrap_or_else(|| state.visual()),
        flashing: flash.is_some(),
    }
}
