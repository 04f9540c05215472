//! Vector path construction

use serde::{Deserialize, Serialize};

/// Position in surface pixels, y pointing down
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// One segment of a path outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PathCmd {
    MoveTo { to: Point },
    LineTo { to: Point },
    QuadTo { ctrl: Point, to: Point },
    /// Clockwise circular arc of `radius` ending at `to`
    ArcTo { radius: f32, to: Point },
    Close,
}

/// Closed or open outline made of [`PathCmd`]s.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Path {
    cmds: Vec<PathCmd>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cmds(&self) -> &[PathCmd] {
        &self.cmds
    }

    pub fn move_to(mut self, x: f32, y: f32) -> Self {
        self.cmds.push(PathCmd::MoveTo { to: Point::new(x, y) });
        self
    }

    pub fn line_to(mut self, x: f32, y: f32) -> Self {
        self.cmds.push(PathCmd::LineTo { to: Point::new(x, y) });
        self
    }

    pub fn quad_to(mut self, cx: f32, cy: f32, x: f32, y: f32) -> Self {
        self.cmds.push(PathCmd::QuadTo {
            ctrl: Point::new(cx, cy),
            to: Point::new(x, y),
        });
        self
    }

    pub fn arc_to(mut self, radius: f32, x: f32, y: f32) -> Self {
        self.cmds.push(PathCmd::ArcTo { radius, to: Point::new(x, y) });
        self
    }

    pub fn close(mut self) -> Self {
        self.cmds.push(PathCmd::Close);
        self
    }

    /// Rectangle with all four corners rounded by `radius`.
    ///
    /// The radius is clamped to half the shorter side.
    pub fn rounded_rect(x: f32, y: f32, w: f32, h: f32, radius: f32) -> Self {
        let r = radius.clamp(0.0, w.min(h) / 2.0);
        Self::new()
            .move_to(x + r, y)
            .line_to(x + w - r, y)
            .arc_to(r, x + w, y + r)
            .line_to(x + w, y + h - r)
            .arc_to(r, x + w - r, y + h)
            .line_to(x + r, y + h)
            .arc_to(r, x, y + h - r)
            .line_to(x, y + r)
            .arc_to(r, x + r, y)
            .close()
    }

    /// Full circle as two half arcs.
    pub fn circle(center: Point, radius: f32) -> Self {
        Self::new()
            .move_to(center.x + radius, center.y)
            .arc_to(radius, center.x - radius, center.y)
            .arc_to(radius, center.x + radius, center.y)
            .close()
    }

    /// Circle center and radius if this path was built by [`Path::circle`].
    pub fn as_circle(&self) -> Option<(Point, f32)> {
        match self.cmds.as_slice() {
            [PathCmd::MoveTo { to: start }, PathCmd::ArcTo { radius, to: mid }, PathCmd::ArcTo { to: end, .. }, PathCmd::Close]
                if start == end && start.y == mid.y =>
            {
                Some((Point::new((start.x + mid.x) / 2.0, start.y), *radius))
            }
            _ => None,
        }
    }
}
