//! SVG Surface
//!
//! Serializes a scene as a standalone SVG document. Used by the CLI to write
//! the outlier scatter next to its other outputs.

use std::fmt::Write;

use super::surface::{DrawOp, Scene, Surface, TextAlign};

/// Accumulates SVG elements
#[derive(Debug, Clone)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    body: String,
}

impl SvgSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            body: String::new(),
        }
    }

    /// Complete document
    pub fn finish(self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n{body}</svg>\n",
            w = num(self.width),
            h = num(self.height),
            body = self.body
        )
    }
}

/// Render `scene` to an SVG document
pub fn to_svg(scene: &Scene) -> String {
    let mut surface = SvgSurface::new(scene.width, scene.height);
    scene.replay(&mut surface);
    surface.finish()
}

impl Surface for SvgSurface {
    fn draw(&mut self, op: &DrawOp) {
        // Writing into a String cannot fail
        let _ = match op {
            DrawOp::Clear { width, height } => {
                self.body.clear();
                writeln!(
                    self.body,
                    "  <rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"#ffffff\"/>",
                    num(*width),
                    num(*height)
                )
            }
            DrawOp::Line {
                from,
                to,
                color,
                width,
                dash,
            } => {
                let dash = dash
                    .map(|[on, off]| format!(" stroke-dasharray=\"{},{}\"", num(on), num(off)))
                    .unwrap_or_default();
                writeln!(
                    self.body,
                    "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\"{}/>",
                    num(from.0),
                    num(from.1),
                    num(to.0),
                    num(to.1),
                    color,
                    num(*width),
                    dash
                )
            }
            DrawOp::Path {
                points,
                color,
                width,
            } => {
                let points: Vec<String> = points
                    .iter()
                    .map(|(x, y)| format!("{},{}", num(*x), num(*y)))
                    .collect();
                writeln!(
                    self.body,
                    "  <polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
                    points.join(" "),
                    color,
                    num(*width)
                )
            }
            DrawOp::Circle {
                center,
                radius,
                color,
            } => writeln!(
                self.body,
                "  <circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\"/>",
                num(center.0),
                num(center.1),
                num(*radius),
                color
            ),
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                color,
            } => writeln!(
                self.body,
                "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>",
                num(*x),
                num(*y),
                num(*width),
                num(*height),
                color
            ),
            DrawOp::Text {
                text,
                x,
                y,
                color,
                font,
                align,
                rotation,
            } => {
                let anchor = match align {
                    TextAlign::Left => "start",
                    TextAlign::Center => "middle",
                    TextAlign::Right => "end",
                };
                let (size, family) = font.split_once(' ').unwrap_or((*font, "sans-serif"));
                let transform = if *rotation != 0.0 {
                    format!(
                        " transform=\"rotate({} {} {})\"",
                        num(rotation.to_degrees()),
                        num(*x),
                        num(*y)
                    )
                } else {
                    String::new()
                };
                writeln!(
                    self.body,
                    "  <text x=\"{}\" y=\"{}\" fill=\"{}\" font-size=\"{}\" font-family=\"{}\" text-anchor=\"{}\"{}>{}</text>",
                    num(*x),
                    num(*y),
                    color,
                    size,
                    family,
                    anchor,
                    transform,
                    escape(text)
                )
            }
        };
    }
}

/// Two decimals, trailing zeros dropped
fn num(value: f64) -> String {
    let text = format!("{:.2}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{OutlierPoint, OutlierSummary};
    use crate::render::scatter::scatter_scene;

    #[test]
    fn test_num_formatting() {
        assert_eq!(num(40.0), "40");
        assert_eq!(num(12.5), "12.5");
        assert_eq!(num(-90.0), "-90");
        assert_eq!(num(1.0 / 3.0), "0.33");
        assert_eq!(num(-0.001), "0");
    }

    #[test]
    fn test_text_is_escaped() {
        let mut scene = Scene::new(100.0, 50.0);
        scene.push(DrawOp::Text {
            text: "Q1 < Q3 & more".to_string(),
            x: 10.0,
            y: 20.0,
            color: "#333",
            font: "12px Arial",
            align: TextAlign::Left,
            rotation: 0.0,
        });

        let svg = to_svg(&scene);
        assert!(svg.contains(">Q1 &lt; Q3 &amp; more</text>"));
        assert!(svg.contains("font-size=\"12px\" font-family=\"Arial\" text-anchor=\"start\""));
    }

    #[test]
    fn test_scatter_svg_is_deterministic() {
        let summary = OutlierSummary {
            mild_outliers: 1,
            extreme_outliers: 0,
            upper_bound: 10.0,
            extreme_upper: 20.0,
            normal_points: vec![OutlierPoint { index: 0, los: 2.0 }],
            mild_outlier_points: vec![OutlierPoint { index: 4, los: 12.0 }],
            extreme_outlier_points: vec![],
            q1: None,
            q3: None,
            iqr: None,
        };

        let first = to_svg(&scatter_scene(&summary, 960.0, 400.0));
        let second = to_svg(&scatter_scene(&summary, 960.0, 400.0));
        assert_eq!(first, second);

        assert!(first.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"960\""));
        assert_eq!(first.matches("<circle").count(), 2);
        assert_eq!(first.matches("stroke-dasharray=\"5,5\"").count(), 2);
        assert!(first.contains("transform=\"rotate(-90 20 200)\""));
        assert!(first.ends_with("</svg>\n"));
    }
}
