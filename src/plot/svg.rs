//! SVG chart export via Plotters.
//!
//! Draws the cleaned observations as a scatter with the fitted line overlaid,
//! plus axis labels, a legend and a title.

use std::error::Error;
use std::path::Path;

use plotters::prelude::*;

use crate::domain::{CleanedDataset, FitResult};
use crate::error::AppError;
use crate::models::model;

const CHART_SIZE: (u32, u32) = (800, 600);
const LINE_SAMPLES: usize = 100;

/// Write the data + fit chart to `path` as SVG.
pub fn write_svg_plot(path: &Path, data: &CleanedDataset, fit: &FitResult) -> Result<(), AppError> {
    draw_chart(path, data, fit)
        .map_err(|e| AppError::Output(format!("Failed to render SVG '{}': {e}", path.display())))
}

fn draw_chart(path: &Path, data: &CleanedDataset, fit: &FitResult) -> Result<(), Box<dyn Error>> {
    let (x0, x1) = match data.altitude_range() {
        Some((lo, hi)) if hi > lo => (lo, hi),
        Some((lo, _)) => (lo - 0.5, lo + 0.5),
        None => return Err("no data points to plot".into()),
    };

    let line: Vec<(f64, f64)> = (0..LINE_SAMPLES)
        .map(|i| {
            let u = i as f64 / (LINE_SAMPLES as f64 - 1.0);
            let h = x0 + u * (x1 - x0);
            (h, model(h, fit.r, fit.t0))
        })
        .collect();
    let points: Vec<(f64, f64)> = data
        .points
        .iter()
        .map(|p| (p.altitude_km, p.temperature_k))
        .collect();

    let (y0, y1) = y_bounds(points.iter().chain(&line).map(|&(_, y)| y));
    let x_pad = (x1 - x0) * 0.05;

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Temperature vs Altitude", ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((x0 - x_pad)..(x1 + x_pad), y0..y1)?;

    chart
        .configure_mesh()
        .x_desc("Altitude (km)")
        .y_desc("Temperature (K)")
        .draw()?;

    chart
        .draw_series(points.iter().map(|&(x, y)| Circle::new((x, y), 3, BLUE.filled())))?
        .label("Data")
        .legend(|(x, y)| Circle::new((x, y), 3, BLUE.filled()));

    chart
        .draw_series(LineSeries::new(line, RED.stroke_width(2)))?
        .label(format!("Fit: T = -{:.3}·h + {:.2}", fit.r, fit.t0))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn y_bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !(lo.is_finite() && hi.is_finite()) {
        return (0.0, 1.0);
    }
    let pad = ((hi - lo) * 0.05).max(0.5);
    (lo - pad, hi + pad)
}
