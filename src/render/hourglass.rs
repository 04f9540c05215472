//! Procedural hourglass renderer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    geometry::{build_diamond_cells, order_cells, ChamberOrder, DiamondCell, GRID_SIZE},
    paint::{Color, LinearGradient, Paint},
    path::{Path, Point},
    surface::{Readout, Surface},
};
use crate::state::timer_state::format_readout;

pub const BACKGROUND_TOP: Color = Color::hex(0x2a1f88);
pub const BACKGROUND_BOTTOM: Color = Color::hex(0x13163f);
pub const CARD_FILL: Color = Color::hex(0x8d80f8).with_alpha(0x38);
pub const CARD_BORDER: Color = Color::hex(0xb2a7ff);
pub const SAND: Color = Color::hex(0xffe45a);
pub const TOP_EMPTY: Color = Color::hex(0x2c2f76);
pub const BOTTOM_EMPTY: Color = Color::hex(0x20275f);
pub const CELL_OUTLINE: Color = Color::hex(0x1a1f55);

const SURFACE_RADIUS: f32 = 20.0;
const CARD_WIDTH: f32 = 172.0;
const CARD_HEIGHT: f32 = 320.0;
const CARD_TOP: f32 = 92.0;
const NECK_HALF_WIDTH: f32 = 14.0;
const CARD_PAD: f32 = 8.0;
const MATRIX_SIZE: f32 = 116.0;
const MATRIX_INSET: f32 = 18.0;

const FLOW_DOTS: usize = 4;
const FLOW_DOT_RADIUS: f32 = 1.8;
/// Milliseconds per pixel of flow travel
const FLOW_MS_PER_PX: f64 = 80.0;
const DRIP_RADIUS: f32 = 3.2;

/// Inputs for a single frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameInput {
    pub remaining: f64,
    pub duration: u32,
    pub running: bool,
    /// Drives the neck animation phase only
    pub now: DateTime<Utc>,
}

/// How much sand each chamber shows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub top: f64,
    pub bottom: f64,
}

impl Progress {
    /// Fractions for `remaining` out of `duration`. A zero duration counts as
    /// empty at the top.
    pub fn new(remaining: f64, duration: u32) -> Self {
        let top = if duration == 0 {
            0.0
        } else {
            (remaining / f64::from(duration)).clamp(0.0, 1.0)
        };
        Self { top, bottom: 1.0 - top }
    }

    /// Lit cells for a chamber of `cells` cells
    pub fn lit(fraction: f64, cells: usize) -> usize {
        (cells as f64 * fraction).round() as usize
    }
}

/// What a render call drew.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameSummary {
    pub top_fraction: f64,
    pub bottom_fraction: f64,
    pub top_lit: usize,
    pub bottom_lit: usize,
    pub cell_count: usize,
    pub flowing: bool,
}

/// Pixel positions of the hourglass parts for a given surface width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub card_x: f32,
    pub card_y: f32,
    pub top_matrix: Point,
    pub bottom_matrix: Point,
    pub neck_x: f32,
    pub neck_top: f32,
    pub neck_bottom: f32,
    pub drip: Point,
}

impl Layout {
    pub fn for_width(width: f32) -> Self {
        let card_x = (width - CARD_WIDTH) / 2.0;
        let card_y = CARD_TOP;
        let matrix_x = card_x + (CARD_WIDTH - MATRIX_SIZE) / 2.0;
        let top_y = card_y + MATRIX_INSET;
        let bottom_y = card_y + CARD_HEIGHT - MATRIX_SIZE - MATRIX_INSET;
        let neck_x = card_x + CARD_WIDTH / 2.0;

        Self {
            card_x,
            card_y,
            top_matrix: Point::new(matrix_x, top_y),
            bottom_matrix: Point::new(matrix_x, bottom_y),
            neck_x,
            neck_top: top_y + MATRIX_SIZE - 4.0,
            neck_bottom: bottom_y + 4.0,
            drip: Point::new(neck_x, bottom_y + MATRIX_SIZE - 3.0),
        }
    }
}

/// Redraws the whole hourglass from timer values.
///
/// Holds only the diamond cell set, which is fixed once built.
#[derive(Debug, Clone)]
pub struct HourglassRenderer {
    grid_size: usize,
    cells: Vec<DiamondCell>,
}

impl Default for HourglassRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl HourglassRenderer {
    pub fn new() -> Self {
        Self::with_grid_size(GRID_SIZE)
    }

    pub fn with_grid_size(grid_size: usize) -> Self {
        Self {
            grid_size,
            cells: build_diamond_cells(grid_size),
        }
    }

    pub fn render<S, R>(&self, surface: &mut S, readout: &mut R, input: FrameInput) -> FrameSummary
    where
        S: Surface + ?Sized,
        R: Readout + ?Sized,
    {
        let progress = Progress::new(input.remaining, input.duration);
        readout.show(&format_readout(input.remaining));

        let (width, height) = surface.size();
        let layout = Layout::for_width(width);

        surface.clear();
        let background = LinearGradient::vertical(height, BACKGROUND_TOP, BACKGROUND_BOTTOM);
        surface.fill_path(
            &Path::rounded_rect(0.0, 0.0, width, height, SURFACE_RADIUS),
            &Paint::LinearGradient(background),
        );

        let card = card_path(layout.card_x, layout.card_y, CARD_WIDTH, CARD_HEIGHT);
        surface.fill_path(&card, &Paint::solid(CARD_FILL));
        surface.stroke_path(&card, CARD_BORDER, 2.0);

        let top_lit = Progress::lit(progress.top, self.cells.len());
        let bottom_lit = Progress::lit(progress.bottom, self.cells.len());
        self.draw_matrix(surface, layout.top_matrix, top_lit, TOP_EMPTY, ChamberOrder::Top);
        self.draw_matrix(surface, layout.bottom_matrix, bottom_lit, BOTTOM_EMPTY, ChamberOrder::Bottom);

        let flowing = input.running && input.remaining > 0.0;
        if flowing {
            draw_neck_flow(surface, &layout, input.now);
        }

        surface.fill_path(&Path::circle(layout.drip, DRIP_RADIUS), &Paint::solid(SAND));

        debug!("Rendered frame: top {}/{} bottom {}/{}", top_lit, self.cells.len(), bottom_lit, self.cells.len());
        FrameSummary {
            top_fraction: progress.top,
            bottom_fraction: progress.bottom,
            top_lit,
            bottom_lit,
            cell_count: self.cells.len(),
            flowing,
        }
    }

    fn draw_matrix<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        origin: Point,
        lit: usize,
        empty: Color,
        order: ChamberOrder,
    ) {
        let cell = MATRIX_SIZE / self.grid_size as f32;
        let pad = (cell * 0.07).max(0.6);
        let dot = cell - pad * 2.0;
        let radius = (dot / 2.0).max(1.8);

        for (i, c) in order_cells(&self.cells, self.grid_size, order).iter().enumerate() {
            let x = origin.x + c.col as f32 * cell + pad;
            let y = origin.y + c.row as f32 * cell + pad;
            let circle = Path::circle(Point::new(x + dot / 2.0, y + dot / 2.0), radius);

            let color = if i < lit { SAND } else { empty };
            surface.fill_path(&circle, &Paint::solid(color));
            surface.stroke_path(&circle, CELL_OUTLINE, 0.8);
        }
    }
}

/// Vertical offsets of the flow dots within the neck span at `now`.
pub fn neck_flow_offsets(span: f32, now: DateTime<Utc>) -> [f32; FLOW_DOTS] {
    let mut offsets = [0.0; FLOW_DOTS];
    if span <= 0.0 {
        return offsets;
    }

    let span = f64::from(span);
    let step = span / FLOW_DOTS as f64;
    let phase = now.timestamp_millis() as f64 / FLOW_MS_PER_PX;
    for (i, offset) in offsets.iter_mut().enumerate() {
        *offset = (phase + i as f64 * step).rem_euclid(span) as f32;
    }
    offsets
}

fn draw_neck_flow<S: Surface + ?Sized>(surface: &mut S, layout: &Layout, now: DateTime<Utc>) {
    let span = layout.neck_bottom - layout.neck_top;
    for offset in neck_flow_offsets(span, now) {
        let dot = Path::circle(Point::new(layout.neck_x, layout.neck_top + offset), FLOW_DOT_RADIUS);
        surface.fill_path(&dot, &Paint::solid(SAND));
    }
}

/// Card outline pinched to a neck at mid height.
fn card_path(x: f32, y: f32, w: f32, h: f32) -> Path {
    let cx = x + w / 2.0;
    let my = y + h / 2.0;
    let pad = CARD_PAD;
    let neck = NECK_HALF_WIDTH;

    Path::new()
        .move_to(cx - neck, my)
        .quad_to(x + 10.0, my - 24.0, x + 8.0, y + 30.0)
        .quad_to(x + 8.0, y + pad, x + 28.0, y + pad)
        .line_to(x + w - 28.0, y + pad)
        .quad_to(x + w - 8.0, y + pad, x + w - 8.0, y + 30.0)
        .quad_to(x + w - 10.0, my - 24.0, cx + neck, my)
        .quad_to(x + w - 10.0, my + 24.0, x + w - 8.0, y + h - 30.0)
        .quad_to(x + w - 8.0, y + h - pad, x + w - 28.0, y + h - pad)
        .line_to(x + 28.0, y + h - pad)
        .quad_to(x + 8.0, y + h - pad, x + 8.0, y + h - 30.0)
        .quad_to(x + 10.0, my + 24.0, cx - neck, my)
        .close()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::surface::{DisplayList, DrawOp};
    use chrono::TimeDelta;
    use proptest::prelude::*;

    fn frame(remaining: f64, duration: u32, running: bool) -> FrameInput {
        FrameInput {
            remaining,
            duration,
            running,
            now: DateTime::<Utc>::default() + TimeDelta::milliseconds(123_456),
        }
    }

    fn draw(input: FrameInput) -> (DisplayList, String, FrameSummary) {
        let renderer = HourglassRenderer::new();
        let mut surface = DisplayList::new(360.0, 520.0);
        let mut readout = String::new();
        let summary = renderer.render(&mut surface, &mut readout, input);
        (surface, readout, summary)
    }

    #[test]
    fn full_timer_lights_the_top_chamber() {
        let (surface, readout, summary) = draw(frame(1500.0, 1500, false));
        assert_eq!(readout, "25:00");
        assert_eq!(summary.top_lit, 61);
        assert_eq!(summary.bottom_lit, 0);
        assert!(!summary.flowing);
        // 61 top cells plus the drip accent
        assert_eq!(surface.filled_circles(SAND).count(), 62);
        assert_eq!(surface.filled_circles(TOP_EMPTY).count(), 0);
        assert_eq!(surface.filled_circles(BOTTOM_EMPTY).count(), 61);
    }

    #[test]
    fn expired_timer_fills_the_bottom_chamber() {
        let (surface, readout, summary) = draw(frame(0.0, 60, false));
        assert_eq!(readout, "00:00");
        assert_eq!(summary.top_fraction, 0.0);
        assert_eq!(summary.bottom_fraction, 1.0);
        assert_eq!(summary.bottom_lit, 61);
        assert_eq!(summary.top_lit, 0);
        assert_eq!(surface.filled_circles(TOP_EMPTY).count(), 61);
    }

    #[test]
    fn zero_duration_counts_as_empty() {
        let progress = Progress::new(10.0, 0);
        assert_eq!(progress.top, 0.0);
        assert_eq!(progress.bottom, 1.0);
    }

    #[test]
    fn layers_are_painted_in_order() {
        let (surface, _, _) = draw(frame(750.0, 1500, true));
        let ops = surface.ops();

        assert!(matches!(&ops[0], DrawOp::Fill { paint: Paint::LinearGradient(_), .. }));
        assert!(matches!(&ops[1], DrawOp::Fill { paint: Paint::Solid(c), .. } if *c == CARD_FILL));
        assert!(matches!(&ops[2], DrawOp::Stroke { color, .. } if *color == CARD_BORDER));

        // Two matrices of fill + outline per cell, then four flow dots, then the drip
        assert_eq!(ops.len(), 3 + 2 * 2 * 61 + FLOW_DOTS + 1);
        let drip = ops.last().and_then(|op| op.path().as_circle());
        let layout = Layout::for_width(360.0);
        assert_eq!(drip.map(|(_, r)| r), Some(DRIP_RADIUS));
        assert_eq!(drip.map(|(c, _)| c.y), Some(layout.drip.y));
    }

    #[test]
    fn neck_flow_only_while_running_with_time_left() {
        assert!(draw(frame(100.0, 1500, true)).2.flowing);
        assert!(!draw(frame(100.0, 1500, false)).2.flowing);
        assert!(!draw(frame(0.0, 1500, true)).2.flowing);

        let (paused, _, _) = draw(frame(100.0, 1500, false));
        assert_eq!(paused.len(), 3 + 2 * 2 * 61 + 1);
    }

    #[test]
    fn neck_flow_loops_within_span() {
        let at = |ms: i64| DateTime::<Utc>::default() + TimeDelta::milliseconds(ms);

        assert_eq!(neck_flow_offsets(40.0, at(0)), [0.0, 10.0, 20.0, 30.0]);
        // 80 ms moves every dot one pixel
        assert_eq!(neck_flow_offsets(40.0, at(800)), [10.0, 20.0, 30.0, 0.0]);
        assert_eq!(neck_flow_offsets(40.0, at(3_200)), neck_flow_offsets(40.0, at(0)));
        assert_eq!(neck_flow_offsets(0.0, at(800)), [0.0; FLOW_DOTS]);
    }

    #[test]
    fn layout_centres_the_card() {
        let layout = Layout::for_width(360.0);
        assert_eq!(layout.card_x, 94.0);
        assert_eq!(layout.neck_x, 180.0);
        assert_eq!(layout.top_matrix, Point::new(122.0, 110.0));
        assert_eq!(layout.bottom_matrix, Point::new(122.0, 278.0));
        assert_eq!(layout.neck_top, 222.0);
        assert_eq!(layout.neck_bottom, 282.0);
    }

    #[test]
    fn small_cells_keep_a_minimum_radius() {
        let renderer = HourglassRenderer::with_grid_size(101);
        let mut surface = DisplayList::new(360.0, 520.0);
        let mut readout = String::new();
        renderer.render(&mut surface, &mut readout, frame(30.0, 60, false));

        let smallest = surface
            .ops()
            .iter()
            .filter_map(|op| op.path().as_circle())
            .map(|(_, r)| r)
            .fold(f32::INFINITY, f32::min);
        assert_eq!(smallest, 1.8);
    }

    proptest! {
        #[test]
        fn chamber_fractions_are_complementary(duration in 60u32..=10_800, tenths in 0u32..=108_000) {
            let remaining = f64::from(tenths.min(duration * 10)) / 10.0;
            let (_, _, summary) = draw(frame(remaining, duration, true));

            prop_assert_eq!(summary.top_fraction + summary.bottom_fraction, 1.0);
            prop_assert!((0.0..=1.0).contains(&summary.top_fraction));
            prop_assert!(summary.top_lit <= 61 && summary.bottom_lit <= 61);
        }
    }
}
