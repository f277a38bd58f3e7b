#![forbid(unsafe_code)]

//! Geometry engine: value-to-extent scaling and bar placement.
//!
//! All quantities are in abstract display units (pixels for a browser-like
//! surface, cells for a terminal). A [`Layout`] is derived from the current
//! magnitudes and the [`Viewport`]; it is recomputed on reset, on resize, and
//! whenever an overwrite could change the maximum value.
//!
//! # Invariants
//!
//! 1. `scale * max(magnitude) == inner_height / ratio` (before rounding), so
//!    the tallest bar always leaves headroom for raised comparisons.
//! 2. `element_width >= min_width` for every element count.
//! 3. A raised bar's top edge never leaves the container:
//!    `raise(m) + extent(m) <= inner_height - edge_margin`, unless that would
//!    push the raise below `raise_gap`.
//!
//! # Failure Modes
//!
//! - Empty value set: [`GeometryConfig::layout`] returns `None`; there is no
//!   meaningful scale for zero bars.
//! - All magnitudes zero: the maximum is treated as 1 to avoid dividing by
//!   zero; every bar then renders at the 1-unit minimum extent.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Padding around the bar area, one value per edge.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sides {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Sides {
    /// Create new sides with equal values.
    pub const fn all(val: f64) -> Self {
        Self {
            top: val,
            right: val,
            bottom: val,
            left: val,
        }
    }

    /// Create new sides with specific values.
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Sum of left and right.
    #[inline]
    pub fn horizontal_sum(&self) -> f64 {
        self.left + self.right
    }

    /// Sum of top and bottom.
    #[inline]
    pub fn vertical_sum(&self) -> f64 {
        self.top + self.bottom
    }
}

/// Space offered to the bar container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Outer width of the bar container.
    pub width: f64,
    /// Height available in the surrounding viewport; the container takes a
    /// clamped fraction of it.
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Tunable constants for the geometry engine.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GeometryConfig {
    /// `inner_height / tallest_bar`. Values above 2 leave room above the
    /// tallest bar for a raised bar of the same height.
    pub ratio: f64,
    /// Lower clamp for the container height.
    pub min_extent: f64,
    /// Upper clamp for the container height.
    pub max_extent: f64,
    /// Share of the viewport height the container aims for.
    pub viewport_fraction: f64,
    /// Container padding.
    pub padding: Sides,
    /// Horizontal space between adjacent bars.
    pub gap: f64,
    /// Narrowest bar ever drawn.
    pub min_width: f64,
    /// Space between the tallest bar and the bottom of a raised bar.
    pub raise_gap: f64,
    /// Space kept between a raised bar's top edge and the container edge.
    pub edge_margin: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            ratio: 2.2,
            min_extent: 300.0,
            max_extent: 1500.0,
            viewport_fraction: 0.7,
            padding: Sides::all(12.0),
            gap: 4.0,
            min_width: 3.0,
            raise_gap: 8.0,
            edge_margin: 2.0,
        }
    }
}

impl GeometryConfig {
    /// Profile for character-cell surfaces, where one unit is one cell.
    pub fn terminal() -> Self {
        Self {
            ratio: 2.2,
            min_extent: 8.0,
            max_extent: 400.0,
            viewport_fraction: 1.0,
            padding: Sides::new(0.0, 1.0, 0.0, 1.0),
            gap: 1.0,
            min_width: 1.0,
            raise_gap: 1.0,
            edge_margin: 0.0,
        }
    }

    /// Container height for a viewport height, clamped to
    /// `[min_extent, max_extent]`.
    pub fn container_height(&self, viewport_height: f64) -> f64 {
        (viewport_height * self.viewport_fraction)
            .round()
            .clamp(self.min_extent, self.max_extent)
    }

    /// Derive the layout for `magnitudes` inside `viewport`.
    ///
    /// Returns `None` for an empty value set.
    pub fn layout(&self, magnitudes: &[u32], viewport: Viewport) -> Option<Layout> {
        let max = magnitudes.iter().copied().max()?;
        let count = magnitudes.len();

        let container_height = self.container_height(viewport.height);
        let inner_height = (container_height - self.padding.vertical_sum()).max(0.0);
        let inner_width = (viewport.width - self.padding.horizontal_sum()).max(0.0);

        let baseline_top = inner_height / self.ratio;
        let scale = baseline_top / f64::from(max.max(1));

        let total_gap = self.gap * (count as f64 - 1.0);
        let element_width = ((inner_width - total_gap) / count as f64)
            .floor()
            .max(self.min_width);

        Some(Layout {
            count,
            scale,
            element_width,
            gap: self.gap,
            baseline_top,
            container_height,
            inner_height,
            inner_width,
            raise_gap: self.raise_gap,
            edge_margin: self.edge_margin,
        })
    }

    /// Human-readable problems with this configuration, empty when valid.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if !(self.ratio.is_finite() && self.ratio > 1.0) {
            problems.push(format!("geometry.ratio must be > 1, got {}", self.ratio));
        }
        if !(self.min_extent > 0.0 && self.min_extent <= self.max_extent) {
            problems.push(format!(
                "geometry extents must satisfy 0 < min_extent <= max_extent, got {}..{}",
                self.min_extent, self.max_extent
            ));
        }
        if !(self.viewport_fraction > 0.0 && self.viewport_fraction <= 1.0) {
            problems.push(format!(
                "geometry.viewport_fraction must be in (0, 1], got {}",
                self.viewport_fraction
            ));
        }
        if self.min_width <= 0.0 {
            problems.push(format!(
                "geometry.min_width must be positive, got {}",
                self.min_width
            ));
        }
        if self.gap < 0.0 || self.raise_gap < 0.0 || self.edge_margin < 0.0 {
            problems.push("geometry gaps and margins must be non-negative".to_string());
        }
        problems
    }
}

/// Derived layout state for one value set and one viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    /// Number of bars this layout was computed for.
    pub count: usize,
    /// Magnitude-to-extent multiplier.
    pub scale: f64,
    /// Width of every bar.
    pub element_width: f64,
    /// Horizontal gap between bars.
    pub gap: f64,
    /// Extent of the tallest value: the top of the baseline band.
    pub baseline_top: f64,
    /// Clamped outer container height.
    pub container_height: f64,
    /// Container height minus vertical padding.
    pub inner_height: f64,
    /// Container width minus horizontal padding.
    pub inner_width: f64,
    raise_gap: f64,
    edge_margin: f64,
}

impl Layout {
    /// Rendered extent of a magnitude, never below one unit.
    #[inline]
    pub fn extent(&self, magnitude: u32) -> f64 {
        (f64::from(magnitude) * self.scale).round().max(1.0)
    }

    /// Offset a raised bar of `magnitude` is lifted by.
    ///
    /// The bar's bottom sits `raise_gap` above the tallest bar, unless its top
    /// would then leave the container.
    pub fn raise(&self, magnitude: u32) -> f64 {
        let raise = self.baseline_top + self.raise_gap;
        let max_raise = self.inner_height - self.edge_margin - self.extent(magnitude);
        if raise > max_raise {
            max_raise.max(self.raise_gap).round()
        } else {
            raise.round()
        }
    }

    /// Left edge of the bar at `index`, relative to the inner area.
    #[inline]
    pub fn x_offset(&self, index: usize) -> f64 {
        index as f64 * (self.element_width + self.gap)
    }
}
