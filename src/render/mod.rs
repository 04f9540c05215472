//! Hourglass rendering
//!
//! The renderer draws through the [`Surface`] port and writes the clock text
//! through the [`Readout`] port. [`DisplayList`] records a frame so it can be
//! served as JSON or replayed into SVG.

pub mod geometry;
pub mod hourglass;
pub mod paint;
pub mod path;
pub mod surface;
pub mod svg;

pub use geometry::{build_diamond_cells, order_cells, ChamberOrder, DiamondCell, GRID_SIZE};
pub use hourglass::{FrameInput, FrameSummary, HourglassRenderer, Layout, Progress};
pub use paint::{Color, ColorStop, LinearGradient, Paint};
pub use path::{Path, PathCmd, Point};
pub use surface::{DisplayList, DrawOp, Readout, Surface};
pub use svg::to_svg;
