//! Rendering
//!
//! Everything between validated tab data and pixels:
//! - [`charts`]: bar-chart series and their Chart.js configuration
//! - [`scatter`]: the hand-drawn outlier scatter
//! - [`surface`] / [`svg`]: scene replay targets
//! - [`registry`]: one live chart per canvas
//! - [`format`]: headline text metrics

pub mod charts;
pub mod format;
pub mod registry;
pub mod scatter;
pub mod surface;
pub mod svg;

pub use charts::{charts_for, CanvasId, ChartSpec, Colors, Dataset, Orientation};
pub use format::{format_count, format_days, metrics_for, Metric};
pub use registry::{ChartHandle, ChartRegistry};
pub use scatter::{canvas_size, draw_outlier_scatter, scatter_scene, ScatterLayout};
pub use surface::{DrawOp, RecordingSurface, Scene, Surface, TextAlign};
pub use svg::{to_svg, SvgSurface};
