//! Outlier Scatter Renderer
//!
//! Plots every patient as a dot at (index, length of stay), colored by the
//! server's outlier classification, with dashed lines at the mild and
//! extreme thresholds.
//!
//! ```text
//!  LOS ^                         [#] Normal
//!      |  - - - - - - - - - - -  [#] Mild Outliers (1.5×IQR)
//!      |      .   o              [#] Extreme Outliers (3×IQR)
//!      | . . .  .   .  .
//!      +-------------------------> Patient Index
//! ```

use super::surface::{DrawOp, Scene, Surface, TextAlign};
use crate::api::{OutlierPoint, OutlierSummary};

/// Canvas height used by the browser
pub const CANVAS_HEIGHT: f64 = 400.0;

/// Horizontal space left between the canvas and its container
pub const CONTAINER_INSET: f64 = 40.0;

pub const NORMAL_COLOR: &str = "#4caf50";
pub const MILD_COLOR: &str = "#ff9800";
pub const EXTREME_COLOR: &str = "#f44336";
const AXIS_COLOR: &str = "#333";

const THRESHOLD_DASH: [f64; 2] = [5.0, 5.0];

/// Plot-area margins in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

pub const PADDING: Padding = Padding {
    top: 40.0,
    right: 40.0,
    bottom: 60.0,
    left: 60.0,
};

/// Canvas size for a container of the given width
pub fn canvas_size(container_width: f64) -> (f64, f64) {
    ((container_width - CONTAINER_INSET).max(0.0), CANVAS_HEIGHT)
}

/// Data-to-pixel mapping for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterLayout {
    pub width: f64,
    pub height: f64,
    pub max_index: f64,
    pub max_los: f64,
}

impl ScatterLayout {
    /// Both maxima are floored at 1; the LOS range always reaches the mild
    /// threshold
    pub fn new(summary: &OutlierSummary, width: f64, height: f64) -> Self {
        let max_index = summary
            .all_points()
            .map(|p| p.index as f64)
            .fold(1.0, f64::max);
        let max_los = summary
            .all_points()
            .map(|p| p.los)
            .fold(summary.upper_bound.max(1.0), f64::max);

        Self {
            width,
            height,
            max_index,
            max_los,
        }
    }

    fn plot_width(&self) -> f64 {
        self.width - PADDING.left - PADDING.right
    }

    fn plot_height(&self) -> f64 {
        self.height - PADDING.top - PADDING.bottom
    }

    pub fn x(&self, index: f64) -> f64 {
        PADDING.left + (index / self.max_index) * self.plot_width()
    }

    /// Pixel rows grow downward, so larger stays sit higher
    pub fn y(&self, los: f64) -> f64 {
        PADDING.top + self.plot_height() - (los / self.max_los) * self.plot_height()
    }

    fn right_edge(&self) -> f64 {
        self.width - PADDING.right
    }

    fn bottom_edge(&self) -> f64 {
        self.height - PADDING.bottom
    }
}

/// Build the complete frame for `summary`
pub fn scatter_scene(summary: &OutlierSummary, width: f64, height: f64) -> Scene {
    let layout = ScatterLayout::new(summary, width, height);
    let mut scene = Scene::new(width, height);

    // Thresholds
    for (value, color) in [
        (summary.upper_bound, MILD_COLOR),
        (summary.extreme_upper, EXTREME_COLOR),
    ] {
        let y = layout.y(value);
        scene.push(DrawOp::Line {
            from: (PADDING.left, y),
            to: (layout.right_edge(), y),
            color,
            width: 2.0,
            dash: Some(THRESHOLD_DASH),
        });
    }

    // Points
    push_points(&mut scene, &layout, &summary.normal_points, 2.0, NORMAL_COLOR);
    push_points(&mut scene, &layout, &summary.mild_outlier_points, 3.0, MILD_COLOR);
    push_points(&mut scene, &layout, &summary.extreme_outlier_points, 4.0, EXTREME_COLOR);

    // Axes
    scene.push(DrawOp::Path {
        points: vec![
            (PADDING.left, PADDING.top),
            (PADDING.left, layout.bottom_edge()),
            (layout.right_edge(), layout.bottom_edge()),
        ],
        color: AXIS_COLOR,
        width: 1.0,
    });

    scene.push(DrawOp::Text {
        text: "Patient Index".to_string(),
        x: width / 2.0,
        y: height - 10.0,
        color: AXIS_COLOR,
        font: "12px Arial",
        align: TextAlign::Center,
        rotation: 0.0,
    });
    scene.push(DrawOp::Text {
        text: "Length of Stay (days)".to_string(),
        x: 20.0,
        y: height / 2.0,
        color: AXIS_COLOR,
        font: "12px Arial",
        align: TextAlign::Center,
        rotation: -std::f64::consts::FRAC_PI_2,
    });

    // Legend
    let legend_x = layout.right_edge() - 150.0;
    let legend_y = PADDING.top + 10.0;
    for (row, (color, caption)) in [
        (NORMAL_COLOR, "Normal"),
        (MILD_COLOR, "Mild Outliers (1.5×IQR)"),
        (EXTREME_COLOR, "Extreme Outliers (3×IQR)"),
    ]
    .into_iter()
    .enumerate()
    {
        let top = legend_y + 20.0 * row as f64;
        scene.push(DrawOp::Rect {
            x: legend_x,
            y: top,
            width: 12.0,
            height: 12.0,
            color,
        });
        scene.push(DrawOp::Text {
            text: caption.to_string(),
            x: legend_x + 15.0,
            y: top + 9.0,
            color: AXIS_COLOR,
            font: "11px Arial",
            align: TextAlign::Left,
            rotation: 0.0,
        });
    }

    // Threshold labels
    for (label, value, color) in [
        ("1.5×IQR", summary.upper_bound, MILD_COLOR),
        ("3×IQR", summary.extreme_upper, EXTREME_COLOR),
    ] {
        scene.push(DrawOp::Text {
            text: format!("{}: {:.1}", label, value),
            x: layout.right_edge(),
            y: layout.y(value) - 5.0,
            color,
            font: "10px Arial",
            align: TextAlign::Right,
            rotation: 0.0,
        });
    }

    scene
}

fn push_points(
    scene: &mut Scene,
    layout: &ScatterLayout,
    points: &[OutlierPoint],
    radius: f64,
    color: &'static str,
) {
    for point in points {
        scene.push(DrawOp::Circle {
            center: (layout.x(point.index as f64), layout.y(point.los)),
            radius,
            color,
        });
    }
}

/// Redraw the scatter onto `surface`. A missing surface is a no-op.
///
/// Returns whether anything was drawn.
pub fn draw_outlier_scatter<S: Surface + ?Sized>(
    surface: Option<&mut S>,
    summary: &OutlierSummary,
    width: f64,
    height: f64,
) -> bool {
    let Some(surface) = surface else {
        tracing::debug!("Outlier canvas missing; skipping scatter");
        return false;
    };
    scatter_scene(summary, width, height).replay(surface);
    true
}
