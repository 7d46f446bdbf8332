//! Shared "fit pipeline" logic.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load -> clean -> fit
//!
//! Every call builds its own `Dataset` and `FitResult`; nothing is shared
//! between runs. Any failing stage aborts the run with no partial result.

use std::path::Path;

use tracing::{info, warn};

use crate::data::clean;
use crate::domain::{CleanedDataset, Dataset, FitConfig, FitResult, FitSummary, SolverOptions};
use crate::error::AppError;
use crate::fit::fit;
use crate::io::load;

/// All computed outputs of a single `lapse fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub dataset: Dataset,
    pub cleaned: CleanedDataset,
    pub fit: FitResult,
}

/// Load, clean and fit a CSV, returning `{r, r_error, T0, T0_error}`.
pub fn summarize(path: &Path) -> Result<FitSummary, AppError> {
    run_pipeline(path, &SolverOptions::default()).map(|run| run.fit.summary())
}

/// Execute the full pipeline for a resolved config.
pub fn run_fit(config: &FitConfig) -> Result<RunOutput, AppError> {
    run_pipeline(&config.csv_path, &config.solver)
}

fn run_pipeline(path: &Path, solver: &SolverOptions) -> Result<RunOutput, AppError> {
    // 1) Load raw rows.
    let dataset = load(path)?;

    // 2) Convert to Kelvin and drop incomplete rows.
    let cleaned = clean(&dataset);
    if cleaned.rows_dropped > 0 {
        warn!(
            dropped = cleaned.rows_dropped,
            read = dataset.len(),
            "dropped rows with missing altitude or temperature"
        );
    }

    // 3) Fit.
    let fit = fit(&cleaned, solver)?;
    info!(
        r = fit.r,
        r_error = fit.r_error,
        t0 = fit.t0,
        t0_error = fit.t0_error,
        n = fit.n_points,
        "fit complete"
    );

    Ok(RunOutput {
        dataset,
        cleaned,
        fit,
    })
}
