//! Canvas Charts
//!
//! Chart.js bindings for the bar charts and an HTML canvas [`Surface`] for
//! the outlier scatter.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use losight::api::OutlierSummary;
use losight::render::{
    canvas_size, draw_outlier_scatter, CanvasId, ChartHandle, ChartRegistry, ChartSpec, DrawOp,
    Surface, TextAlign,
};

#[wasm_bindgen]
extern "C" {
    /// `window.Chart`, loaded from the Chart.js CDN script
    type Chart;

    #[wasm_bindgen(constructor, catch)]
    fn new(canvas: &HtmlCanvasElement, config: &JsValue) -> Result<Chart, JsValue>;

    #[wasm_bindgen(method)]
    fn destroy(this: &Chart);
}

/// A live Chart.js instance
pub struct JsChart(Chart);

impl ChartHandle for JsChart {
    fn destroy(&mut self) {
        self.0.destroy();
    }
}

fn canvas_by_id(id: &str) -> Option<HtmlCanvasElement> {
    web_sys::window()?
        .document()?
        .get_element_by_id(id)?
        .dyn_into::<HtmlCanvasElement>()
        .ok()
}

/// Replace whatever chart is bound to `spec.canvas` with a new one
pub fn mount_chart(registry: &mut ChartRegistry<JsChart>, spec: &ChartSpec) -> Result<(), JsValue> {
    let Some(canvas) = canvas_by_id(spec.canvas.dom_id()) else {
        web_sys::console::warn_1(&format!("Canvas {} not found", spec.canvas).into());
        return Ok(());
    };

    let config = js_sys::JSON::parse(&spec.to_chartjs_config().to_string())?;
    registry.replace(spec.canvas, || Chart::new(&canvas, &config).map(JsChart))
}

/// Size the scatter canvas to its container and redraw it
pub fn draw_scatter(summary: &OutlierSummary) -> bool {
    let Some(canvas) = canvas_by_id(CanvasId::OutlierScatter.dom_id()) else {
        return draw_outlier_scatter::<CanvasSurface>(None, summary, 0.0, 0.0);
    };

    let container_width = canvas
        .parent_element()
        .map(|parent| parent.client_width() as f64)
        .unwrap_or(0.0);
    let (width, height) = canvas_size(container_width);
    canvas.set_width(width as u32);
    canvas.set_height(height as u32);

    let mut surface = CanvasSurface::for_canvas(&canvas);
    draw_outlier_scatter(surface.as_mut(), summary, width, height)
}

// ============ Surface ============

/// 2D context of a `<canvas>`
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn for_canvas(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { ctx })
    }

    fn set_dash(&self, dash: Option<[f64; 2]>) {
        let pattern = js_sys::Array::new();
        if let Some([on, off]) = dash {
            pattern.push(&on.into());
            pattern.push(&off.into());
        }
        let _ = self.ctx.set_line_dash(&pattern);
    }
}

impl Surface for CanvasSurface {
    fn draw(&mut self, op: &DrawOp) {
        let ctx = &self.ctx;
        match op {
            DrawOp::Clear { width, height } => ctx.clear_rect(0.0, 0.0, *width, *height),

            DrawOp::Line {
                from,
                to,
                color,
                width,
                dash,
            } => {
                ctx.set_stroke_style(&(*color).into());
                ctx.set_line_width(*width);
                self.set_dash(*dash);
                ctx.begin_path();
                ctx.move_to(from.0, from.1);
                ctx.line_to(to.0, to.1);
                ctx.stroke();
                self.set_dash(None);
            }

            DrawOp::Path {
                points,
                color,
                width,
            } => {
                let Some((first, rest)) = points.split_first() else {
                    return;
                };
                ctx.set_stroke_style(&(*color).into());
                ctx.set_line_width(*width);
                ctx.begin_path();
                ctx.move_to(first.0, first.1);
                for (x, y) in rest {
                    ctx.line_to(*x, *y);
                }
                ctx.stroke();
            }

            DrawOp::Circle {
                center,
                radius,
                color,
            } => {
                ctx.set_fill_style(&(*color).into());
                ctx.begin_path();
                let _ = ctx.arc(center.0, center.1, *radius, 0.0, std::f64::consts::PI * 2.0);
                ctx.fill();
            }

            DrawOp::Rect {
                x,
                y,
                width,
                height,
                color,
            } => {
                ctx.set_fill_style(&(*color).into());
                ctx.fill_rect(*x, *y, *width, *height);
            }

            DrawOp::Text {
                text,
                x,
                y,
                color,
                font,
                align,
                rotation,
            } => {
                ctx.save();
                ctx.set_fill_style(&(*color).into());
                ctx.set_font(font);
                ctx.set_text_align(match align {
                    TextAlign::Left => "left",
                    TextAlign::Center => "center",
                    TextAlign::Right => "right",
                });
                let _ = ctx.translate(*x, *y);
                let _ = ctx.rotate(*rotation);
                let _ = ctx.fill_text(text, 0.0, 0.0);
                ctx.restore();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use losight::api::OutlierPoint;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn summary() -> OutlierSummary {
        let point = |index, los| OutlierPoint { index, los };
        OutlierSummary {
            mild_outliers: 1,
            extreme_outliers: 1,
            upper_bound: 10.0,
            extreme_upper: 20.0,
            normal_points: vec![point(0, 3.0)],
            mild_outlier_points: vec![point(1, 14.0)],
            extreme_outlier_points: vec![point(2, 25.0)],
            q1: None,
            q3: None,
            iqr: None,
        }
    }

    #[wasm_bindgen_test]
    fn test_scatter_without_canvas_is_noop() {
        assert!(!draw_scatter(&summary()));
    }

    #[wasm_bindgen_test]
    fn test_scatter_sized_to_container() {
        let document = web_sys::window().unwrap().document().unwrap();
        let container = document.create_element("div").unwrap();
        container.set_attribute("style", "width: 540px").unwrap();
        let canvas = document.create_element("canvas").unwrap();
        canvas.set_id(CanvasId::OutlierScatter.dom_id());
        container.append_child(&canvas).unwrap();
        document.body().unwrap().append_child(&container).unwrap();

        assert!(draw_scatter(&summary()));

        let canvas: HtmlCanvasElement = canvas.dyn_into().unwrap();
        assert_eq!((canvas.width(), canvas.height()), (500, 400));
        container.remove();
    }
}
