//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed points: `o`
//! - fitted line: `-`

use crate::domain::{CleanedDataset, FitResult};
use crate::models::model;

/// Render the cleaned points with the fitted line across the observed altitude range.
pub fn render_ascii_plot(data: &CleanedDataset, fit: &FitResult, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (h_min, h_max) = match data.altitude_range() {
        Some((lo, hi)) if hi > lo => (lo, hi),
        Some((lo, _)) => (lo - 0.5, lo + 0.5),
        None => (0.0, 1.0),
    };
    let line = sample_line(fit, h_min, h_max, width);
    let points: Vec<(f64, f64)> = data
        .points
        .iter()
        .map(|p| (p.altitude_km, p.temperature_k))
        .collect();

    let (t_min, t_max) = y_range(&points, &line).unwrap_or((0.0, 1.0));
    let (t_min, t_max) = pad_range(t_min, t_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Draw the line first so points overlay it.
    draw_line_series(&mut grid, &line, h_min, h_max, t_min, t_max);

    for &(h, t) in &points {
        let x = map_x(h, h_min, h_max, width);
        let y = map_y(t, t_min, t_max, height);
        grid[y][x] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: altitude=[{h_min:.3}, {h_max:.3}] km | temperature=[{t_min:.2}, {t_max:.2}] K\n"
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn sample_line(fit: &FitResult, h_min: f64, h_max: f64, n: usize) -> Vec<(f64, f64)> {
    let n = n.max(2);
    (0..n)
        .map(|i| {
            let u = i as f64 / (n as f64 - 1.0);
            let h = h_min + u * (h_max - h_min);
            (h, model(h, fit.r, fit.t0))
        })
        .collect()
}

fn y_range(points: &[(f64, f64)], line: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &(_, y) in points.iter().chain(line) {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else if min_y.is_finite() && max_y.is_finite() {
        Some((min_y - 0.5, max_y + 0.5))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(h: f64, h_min: f64, h_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((h - h_min) / (h_max - h_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(t: f64, t_min: f64, t_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    // Top row is the maximum.
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_line_series(grid: &mut [Vec<char>], line: &[(f64, f64)], h_min: f64, h_max: f64, t_min: f64, t_max: f64) {
    if line.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(h, t) in line {
        let x = map_x(h, h_min, h_max, width);
        let y = map_y(t, t_min, t_max, height);
        if let Some((x0, y0)) = prev {
            draw_segment(grid, x0, y0, x, y, '-');
        } else {
            grid[y][x] = '-';
        }
        prev = Some((x, y));
    }
}

/// Integer line drawing (Bresenham).
fn draw_segment(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
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
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
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
