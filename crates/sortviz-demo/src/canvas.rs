#![forbid(unsafe_code)]

//! Cell grid for the bar chart.
//!
//! [`compose`] is pure: snapshot in, grid out. Flushing the grid to the
//! terminal happens in the app loop, so everything here is testable without
//! a tty.

use sortviz_core::{GeometryConfig, VisualState};
use sortviz_runtime::BoardSnapshot;

/// Glyph for a steady bar cell.
pub const BAR: char = '█';
/// Glyph for a bar cell while it flashes.
pub const FLASH: char = '▓';

/// One painted cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paint {
    pub glyph: char,
    pub tone: VisualState,
}

/// A `width x height` grid of optional paints, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u16,
    height: u16,
    cells: Vec<Option<Paint>>,
}

impl Canvas {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![None; usize::from(width) * usize::from(height)],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Paint> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells[self.offset(x, y)]
    }

    /// Cells of row `y`; empty past the bottom edge.
    pub fn row(&self, y: u16) -> &[Option<Paint>] {
        if y >= self.height {
            return &[];
        }
        let start = self.offset(0, y);
        &self.cells[start..start + usize::from(self.width)]
    }

    /// Row `y` as plain text, blanks for unpainted cells.
    pub fn row_text(&self, y: u16) -> String {
        self.row(y)
            .iter()
            .map(|cell| cell.map_or(' ', |p| p.glyph))
            .collect()
    }

    fn offset(&self, x: u16, y: u16) -> usize {
        usize::from(y) * usize::from(self.width) + usize::from(x)
    }

    /// Paint the clipped rectangle `[x0, x1) x [y0, y1)`.
    fn fill(&mut self, x0: i64, x1: i64, y0: i64, y1: i64, paint: Paint) {
        let clip_x = |v: i64| v.clamp(0, i64::from(self.width)) as u16;
        let clip_y = |v: i64| v.clamp(0, i64::from(self.height)) as u16;
        let (x0, x1, y0, y1) = (clip_x(x0), clip_x(x1), clip_y(y0), clip_y(y1));
        for y in y0..y1 {
            for x in x0..x1 {
                let i = self.offset(x, y);
                self.cells[i] = Some(paint);
            }
        }
    }
}

/// Draw `snapshot` into a `width x height` canvas using the padding of
/// `geometry`.
///
/// The floor is the bottom of the container's inner area; raised bars float
/// above it by their lift. Anything outside the canvas is clipped.
pub fn compose<V: sortviz_core::BarValue>(
    snapshot: &BoardSnapshot<V>,
    geometry: &GeometryConfig,
    width: u16,
    height: u16,
) -> Canvas {
    let mut canvas = Canvas::new(width, height);
    let Some(layout) = &snapshot.layout else {
        return canvas;
    };
    let floor = geometry.padding.top + layout.inner_height;

    for bar in snapshot.bars() {
        let left = (geometry.padding.left + bar.x).round() as i64;
        let right = left + (bar.width.round() as i64).max(1);
        let bottom = (floor - bar.lift).round() as i64;
        let top = bottom - bar.extent.round() as i64;
        let paint = Paint {
            glyph: if bar.flashing { FLASH } else { BAR },
            tone: bar.tone,
        };
        canvas.fill(left, right, top, bottom, paint);
    }
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use sortviz_core::Viewport;
    use sortviz_runtime::{Board, RunPhase};

    fn snapshot(values: Vec<u32>, width: u16, height: u16) -> (BoardSnapshot, GeometryConfig) {
        let geometry = GeometryConfig::terminal();
        let board = Board::new(
            values,
            geometry.clone(),
            Viewport::new(f64::from(width), f64::from(height)),
        );
        (board.snapshot(RunPhase::Idle), geometry)
    }

    fn column_height(canvas: &Canvas, x: u16) -> usize {
        (0..canvas.height())
            .filter(|&y| canvas.get(x, y).is_some())
            .count()
    }

    #[test]
    fn empty_board_draws_nothing() {
        let (snap, geometry) = snapshot(Vec::new(), 20, 10);
        let canvas = compose(&snap, &geometry, 20, 10);
        assert!((0..10).all(|y| canvas.row_text(y).trim().is_empty()));
    }

    #[test]
    fn taller_values_draw_taller_columns() {
        let (snap, geometry) = snapshot(vec![1, 4, 2], 9, 22);
        let canvas = compose(&snap, &geometry, 9, 22);
        let layout = snap.layout.unwrap();
        let column = |i: usize| {
            let x = (geometry.padding.left + layout.x_offset(i)) as u16;
            column_height(&canvas, x)
        };
        assert!(column(1) > column(2));
        assert!(column(2) > column(0));
        assert!(column(0) >= 1);
    }

    #[test]
    fn bars_stand_on_the_floor() {
        let (snap, geometry) = snapshot(vec![3, 3], 6, 22);
        let canvas = compose(&snap, &geometry, 6, 22);
        let floor_row = (geometry.padding.top + snap.layout.unwrap().inner_height) as u16 - 1;
        assert!(canvas.row_text(floor_row).contains(BAR));
    }

    #[test]
    fn raised_bar_leaves_a_gap_below() {
        let geometry = GeometryConfig::terminal();
        let board = Board::new(vec![2u32, 4], geometry.clone(), Viewport::new(6.0, 22.0));
        let plain = compose(&board.snapshot(RunPhase::Idle), &geometry, 6, 22);

        let mut snap = board.snapshot(RunPhase::Running);
        snap.states[0].comparing = true;
        let raised = compose(&snap, &geometry, 6, 22);

        let layout = snap.layout.unwrap();
        let x = geometry.padding.left as u16;
        let floor = geometry.padding.top + layout.inner_height;
        let floor_row = floor as u16 - 1;
        assert!(plain.get(x, floor_row).is_some());
        assert!(raised.get(x, floor_row).is_none());

        // The whole raised bar sits above the tallest resting bar.
        let tallest_top = (floor - layout.baseline_top) as u16;
        let painted: Vec<u16> = (0..raised.height())
            .filter(|&y| raised.get(x, y).is_some())
            .collect();
        assert!(!painted.is_empty());
        assert!(painted.iter().all(|&y| y < tallest_top), "{painted:?}");
    }

    #[test]
    fn tones_follow_state_precedence() {
        let (mut snap, geometry) = snapshot(vec![2, 2, 2], 9, 22);
        snap.states[0].sorted = true;
        snap.states[1].partly_sorted = true;
        snap.states[1].sorted = true;
        snap.states[2].special = true;
        let canvas = compose(&snap, &geometry, 9, 22);
        let layout = snap.layout.unwrap();
        let tone_at = |i: usize| {
            let x = (geometry.padding.left + layout.x_offset(i)) as u16;
            (0..canvas.height())
                .find_map(|y| canvas.get(x, y))
                .map(|p| p.tone)
        };
        assert_eq!(tone_at(0), Some(VisualState::Sorted));
        assert_eq!(tone_at(1), Some(VisualState::Sorted));
        assert_eq!(tone_at(2), Some(VisualState::Special));
    }

    #[test]
    fn flashing_bar_uses_flash_glyph() {
        let (mut snap, geometry) = snapshot(vec![5, 5], 6, 22);
        snap.flash = Some(sortviz_runtime::FlashState {
            index: 1,
            tone: VisualState::Special,
        });
        let canvas = compose(&snap, &geometry, 6, 22);
        let layout = snap.layout.unwrap();
        let x = (geometry.padding.left + layout.x_offset(1)) as u16;
        let painted: Vec<Paint> = (0..canvas.height()).filter_map(|y| canvas.get(x, y)).collect();
        assert!(!painted.is_empty());
        assert!(painted.iter().all(|p| p.glyph == FLASH && p.tone == VisualState::Special));
    }

    #[test]
    fn drawing_is_clipped_to_the_canvas() {
        let (snap, geometry) = snapshot(vec![9, 1, 9, 1, 9], 30, 40);
        let canvas = compose(&snap, &geometry, 4, 3);
        assert_eq!(canvas.row(3), &[] as &[Option<Paint>]);
        assert_eq!(canvas.row_text(0).chars().count(), 4);
    }

    proptest! {
        #[test]
        fn compose_stays_inside_any_canvas(
            values in prop::collection::vec(1u32..300, 0..80),
            view in (1u16..200, 1u16..80),
            canvas in (0u16..120, 0u16..60),
        ) {
            let (snap, geometry) = snapshot(values, view.0, view.1);
            let drawn = compose(&snap, &geometry, canvas.0, canvas.1);
            prop_assert_eq!(drawn.width(), canvas.0);
            prop_assert_eq!(drawn.height(), canvas.1);
        }
    }
}
