//! Plotters-powered SVG export of a projection bundle.
//!
//! The chart is drawn without text (no captions, no tick labels) so the SVG
//! backend works without any font dependency. Axes titles and legend entries
//! travel in the bundle's JSON export instead.
//!
//! Log axes are drawn in `log10` space on a plain cartesian chart, the same way
//! the terminal plot does it.

use plotters::prelude::*;

use crate::error::RenderError;
use crate::project::ProjectionBundle;

use super::RenderAdapter;
use super::ascii::{axis_value, range, to_plot_space};

/// Renders a bundle into an SVG document held in memory.
#[derive(Debug, Clone, Copy)]
pub struct SvgRenderer {
    pub width: u32,
    pub height: u32,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 700,
        }
    }
}

impl RenderAdapter for SvgRenderer {
    type Output = String;

    fn render(&self, bundle: &ProjectionBundle) -> Result<String, RenderError> {
        render_svg(bundle, self.width, self.height)
    }
}

fn backend<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::Backend(err.to_string())
}

pub fn render_svg(bundle: &ProjectionBundle, width: u32, height: u32) -> Result<String, RenderError> {
    let curve = to_plot_space(&bundle.modeled_points(), bundle.x_scale_kind, bundle.y_scale_kind);
    let points = to_plot_space(&bundle.observed_points(), bundle.x_scale_kind, bundle.y_scale_kind);

    let (x0, x1) = range(curve.iter().chain(&points).map(|p| p.0))
        .ok_or_else(|| RenderError::EmptyFigure(format!("{}: no drawable x values", bundle.labels.title)))?;
    let (y0, y1) = range(curve.iter().chain(&points).map(|p| p.1))
        .ok_or_else(|| RenderError::EmptyFigure(format!("{}: no drawable y values", bundle.labels.title)))?;

    let modeled_color = RGBColor(31, 119, 180);
    let observed_color = RGBColor(239, 85, 59);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (width.max(50), height.max(50))).into_drawing_area();
        root.fill(&WHITE).map_err(backend)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .build_cartesian_2d(x0..x1, y0..y1)
            .map_err(backend)?;

        for marker in &bundle.markers {
            let Some(x) = axis_value(marker.x.as_f64(), bundle.x_scale_kind) else {
                continue;
            };
            let bottom = axis_value(marker.y_from, bundle.y_scale_kind).unwrap_or(y0);
            let top = axis_value(marker.y_to, bundle.y_scale_kind).unwrap_or(y1);
            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(x, bottom), (x, top)],
                    BLACK.stroke_width(2),
                )))
                .map_err(backend)?;
        }

        chart
            .draw_series(LineSeries::new(curve.iter().copied(), modeled_color.stroke_width(3)))
            .map_err(backend)?;
        chart
            .draw_series(LineSeries::new(points.iter().copied(), observed_color.stroke_width(3)))
            .map_err(backend)?;
        chart
            .draw_series(points.iter().map(|&p| Circle::new(p, 4, observed_color.filled())))
            .map_err(backend)?;

        root.present().map_err(backend)?;
    }

    Ok(svg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ScaleKind;
    use crate::project::{Labels, Marker, MarkerKind, XValue};

    fn bundle() -> ProjectionBundle {
        ProjectionBundle {
            x_values: (1..=20).map(XValue::Day).collect(),
            y_modeled: (1..=20u32).map(|d| f64::from(d * d)).collect(),
            y_observed: vec![2.0, 5.0, 8.0],
            x_scale_kind: ScaleKind::Linear,
            y_scale_kind: ScaleKind::Log,
            markers: vec![Marker {
                kind: MarkerKind::ReferenceDate,
                x: XValue::Day(3),
                y_from: 1.0,
                y_to: 400.0,
            }],
            labels: Labels {
                title: "Active cases in Testland".to_string(),
                x_axis: "Days".to_string(),
                y_axis: "cases".to_string(),
                modeled: "model".to_string(),
                observed: "Active cases".to_string(),
            },
        }
    }

    #[test]
    fn renders_svg_document() {
        let svg = render_svg(&bundle(), 400, 300).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("</svg>"));
        assert!(svg.contains("<circle"));
    }

    #[test]
    fn empty_bundle_is_rejected() {
        let mut b = bundle();
        b.x_values.clear();
        assert!(matches!(render_svg(&b, 400, 300), Err(RenderError::EmptyFigure(_))));
    }
}
