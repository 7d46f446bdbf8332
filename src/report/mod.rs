//! Reporting utilities: residuals and formatted terminal output.

pub mod format;

pub use format::*;

use crate::domain::{CleanedDataset, FitResult, PointResidual};
use crate::error::AppError;
use crate::models::model;

/// Compute fitted values and residuals for each cleaned point.
pub fn compute_residuals(data: &CleanedDataset, fit: &FitResult) -> Result<Vec<PointResidual>, AppError> {
    let mut out = Vec::with_capacity(data.len());
    for p in &data.points {
        let fitted_k = model(p.altitude_km, fit.r, fit.t0);
        if !fitted_k.is_finite() {
            return Err(AppError::Convergence(
                "Non-finite model prediction during residual computation.".into(),
            ));
        }
        out.push(PointResidual {
            altitude_km: p.altitude_km,
            temperature_k: p.temperature_k,
            fitted_k,
            residual: p.temperature_k - fitted_k,
        });
    }
    Ok(out)
}
