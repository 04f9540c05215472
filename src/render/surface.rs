//! Drawing surface and readout ports, plus a recording surface

use serde::{Deserialize, Serialize};

use super::{
    paint::{Color, Paint},
    path::Path,
};

/// Immediate-mode 2D drawing target.
pub trait Surface {
    /// Width and height in pixels.
    fn size(&self) -> (f32, f32);
    fn clear(&mut self);
    fn fill_path(&mut self, path: &Path, paint: &Paint);
    fn stroke_path(&mut self, path: &Path, color: Color, width: f32);
}

/// Receives the formatted clock text on every render.
pub trait Readout {
    fn show(&mut self, text: &str);
}

impl Readout for String {
    fn show(&mut self, text: &str) {
        self.clear();
        self.push_str(text);
    }
}

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    Fill { path: Path, paint: Paint },
    Stroke { path: Path, color: Color, width: f32 },
}

impl DrawOp {
    pub fn path(&self) -> &Path {
        match self {
            DrawOp::Fill { path, .. } | DrawOp::Stroke { path, .. } => path,
        }
    }
}

/// Surface that records operations in paint order (back to front).
///
/// `clear` drops everything recorded so far but keeps the allocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayList {
    width: f32,
    height: f32,
    ops: Vec<DrawOp>,
}

impl DisplayList {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Circles filled with exactly `color`, in paint order.
    pub fn filled_circles(&self, color: Color) -> impl Iterator<Item = &Path> + '_ {
        self.ops.iter().filter_map(move |op| match op {
            DrawOp::Fill {
                path,
                paint: Paint::Solid(c),
            } if *c == color && path.as_circle().is_some() => Some(path),
            _ => None,
        })
    }
}

impl Surface for DisplayList {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.ops.clear();
    }

    fn fill_path(&mut self, path: &Path, paint: &Paint) {
        self.ops.push(DrawOp::Fill {
            path: path.clone(),
            paint: paint.clone(),
        });
    }

    fn stroke_path(&mut self, path: &Path, color: Color, width: f32) {
        self.ops.push(DrawOp::Stroke {
            path: path.clone(),
            color,
            width,
        });
    }
}
