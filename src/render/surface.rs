//! Drawing Surfaces
//!
//! Renderers produce a [`Scene`]: an ordered list of [`DrawOp`]s in pixel
//! coordinates. A scene is replayed onto any [`Surface`], so the same drawing
//! code targets the browser canvas, SVG files and test recorders.

use serde::Serialize;

/// Horizontal anchor of a text run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Dash pattern `[on, off]` in pixels
pub type Dash = [f64; 2];

/// A single drawing primitive
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    /// Wipe the whole surface
    Clear { width: f64, height: f64 },
    /// Stroked straight segment
    Line {
        from: (f64, f64),
        to: (f64, f64),
        color: &'static str,
        width: f64,
        dash: Option<Dash>,
    },
    /// Stroked open path through `points`
    Path {
        points: Vec<(f64, f64)>,
        color: &'static str,
        width: f64,
    },
    /// Filled circle
    Circle {
        center: (f64, f64),
        radius: f64,
        color: &'static str,
    },
    /// Filled axis-aligned rectangle
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: &'static str,
    },
    /// Text anchored at `(x, y)` on its baseline, rotated by `rotation`
    /// radians around the anchor
    Text {
        text: String,
        x: f64,
        y: f64,
        color: &'static str,
        font: &'static str,
        align: TextAlign,
        rotation: f64,
    },
}

/// Ordered drawing commands for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    ops: Vec<DrawOp>,
}

impl Scene {
    /// Empty scene; every frame starts with a clear
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ops: vec![DrawOp::Clear { width, height }],
        }
    }

    pub fn push(&mut self, op: DrawOp) {
        self.ops.push(op);
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Draw every op onto `surface`, in order
    pub fn replay<S: Surface + ?Sized>(&self, surface: &mut S) {
        for op in &self.ops {
            surface.draw(op);
        }
    }
}

/// Something a scene can be drawn onto
pub trait Surface {
    fn draw(&mut self, op: &DrawOp);
}

/// Keeps every op it is given
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Surface for RecordingSurface {
    fn draw(&mut self, op: &DrawOp) {
        if matches!(op, DrawOp::Clear { .. }) {
            self.ops.clear();
        }
        self.ops.push(op.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_starts_with_clear() {
        let scene = Scene::new(200.0, 100.0);
        assert_eq!(
            scene.ops(),
            &[DrawOp::Clear {
                width: 200.0,
                height: 100.0
            }]
        );
    }

    #[test]
    fn test_recording_surface_clears_between_frames() {
        let mut scene = Scene::new(10.0, 10.0);
        scene.push(DrawOp::Circle {
            center: (5.0, 5.0),
            radius: 2.0,
            color: "#4caf50",
        });

        let mut surface = RecordingSurface::new();
        scene.replay(&mut surface);
        scene.replay(&mut surface);

        assert_eq!(surface.ops.len(), 2);
    }
}
