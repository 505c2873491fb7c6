//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - modeled curve: `-` line
//! - observed cumulative active cases: `o`
//! - markers (peak / reference date): `|` vertical lines
//!
//! Log axes are drawn in `log10` space; non-positive values cannot be placed on
//! a log axis and are skipped.

use crate::domain::ScaleKind;
use crate::error::RenderError;
use crate::project::ProjectionBundle;

use super::RenderAdapter;

/// Fixed-size terminal renderer.
#[derive(Debug, Clone, Copy)]
pub struct AsciiRenderer {
    pub width: usize,
    pub height: usize,
}

impl Default for AsciiRenderer {
    fn default() -> Self {
        Self {
            width: 100,
            height: 25,
        }
    }
}

impl RenderAdapter for AsciiRenderer {
    type Output = String;

    fn render(&self, bundle: &ProjectionBundle) -> Result<String, RenderError> {
        render_ascii_plot(bundle, self.width, self.height)
    }
}

/// Render a plot for a projection bundle.
pub fn render_ascii_plot(bundle: &ProjectionBundle, width: usize, height: usize) -> Result<String, RenderError> {
    let width = width.max(10);
    let height = height.max(5);

    let curve = to_plot_space(&bundle.modeled_points(), bundle.x_scale_kind, bundle.y_scale_kind);
    let points = to_plot_space(&bundle.observed_points(), bundle.x_scale_kind, bundle.y_scale_kind);

    let (x_min, x_max) = range(curve.iter().chain(&points).map(|p| p.0))
        .ok_or_else(|| RenderError::EmptyFigure(format!("{}: no drawable x values", bundle.labels.title)))?;
    let (y_min, y_max) = range(curve.iter().chain(&points).map(|p| p.1))
        .ok_or_else(|| RenderError::EmptyFigure(format!("{}: no drawable y values", bundle.labels.title)))?;
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Markers first so the series draw over them.
    for marker in &bundle.markers {
        let Some(x) = axis_value(marker.x.as_f64(), bundle.x_scale_kind) else {
            continue;
        };
        let col = map_x(x, x_min, x_max, width);
        let top = axis_value(marker.y_to, bundle.y_scale_kind).map(|y| map_y(y, y_min, y_max, height));
        let bottom = axis_value(marker.y_from, bundle.y_scale_kind).map(|y| map_y(y, y_min, y_max, height));
        let (top, bottom) = (top.unwrap_or(0), bottom.unwrap_or(height - 1));
        for row in grid.iter_mut().take(bottom.max(top) + 1).skip(top.min(bottom)) {
            row[col] = '|';
        }
    }

    draw_curve(&mut grid, &curve, x_min, x_max, y_min, y_max);

    for &(x, y) in &points {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        grid[row][col] = 'o';
    }

    // Build final string. We include a small header with ranges.
    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {} | x={} | y={} [{:.1}, {:.1}]\n",
        bundle.labels.title,
        scale_name(bundle.x_scale_kind),
        scale_name(bundle.y_scale_kind),
        unmap(y_min, bundle.y_scale_kind),
        unmap(y_max, bundle.y_scale_kind),
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    Ok(out)
}

fn scale_name(scale: ScaleKind) -> &'static str {
    match scale {
        ScaleKind::Linear => "linear",
        ScaleKind::Log => "log",
    }
}

pub(crate) fn axis_value(v: f64, scale: ScaleKind) -> Option<f64> {
    match scale {
        ScaleKind::Linear if v.is_finite() => Some(v),
        ScaleKind::Log if v.is_finite() && v > 0.0 => Some(v.log10()),
        _ => None,
    }
}

fn unmap(v: f64, scale: ScaleKind) -> f64 {
    match scale {
        ScaleKind::Linear => v,
        ScaleKind::Log => 10f64.powf(v),
    }
}

pub(crate) fn to_plot_space(points: &[(f64, f64)], x_scale: ScaleKind, y_scale: ScaleKind) -> Vec<(f64, f64)> {
    points
        .iter()
        .filter_map(|&(x, y)| Some((axis_value(x, x_scale)?, axis_value(y, y_scale)?)))
        .collect()
}

pub(crate) fn range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if !(min.is_finite() && max.is_finite()) {
        return None;
    }
    if max > min {
        Some((min, max))
    } else {
        Some((min - 0.5, max + 0.5))
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        if let Some((c0, r0)) = prev {
            draw_line(grid, c0, r0, col, row, '-');
        } else {
            grid[row][col] = '-';
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0 && (y0 as usize) < grid.len() && x0 >= 0 && (x0 as usize) < grid[0].len() {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
