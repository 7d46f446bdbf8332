//! Result exports.
//!
//! - fit summary as JSON (`r`, `r_error`, `T0`, `T0_error`)
//! - per-point fitted values and residuals as CSV
//!
//! Both are meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::path::Path;

use crate::domain::{FitSummary, PointResidual};
use crate::error::AppError;

/// Write the fit summary as pretty-printed JSON.
pub fn write_summary_json(path: &Path, summary: &FitSummary) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::Output(format!("Failed to create summary JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, summary)
        .map_err(|e| AppError::Output(format!("Failed to write summary JSON: {e}")))?;

    Ok(())
}

/// Write per-point results to a CSV file.
pub fn write_fitted_csv(path: &Path, residuals: &[PointResidual]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::Output(format!("Failed to create export CSV '{}': {e}", path.display())))?;

    for r in residuals {
        writer
            .serialize(r)
            .map_err(|e| AppError::Output(format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::Output(format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::clean;
    use crate::domain::{Dataset, Measurement, SolverOptions};
    use crate::fit::fit;

    #[test]
    fn summary_json_round_trips() {
        let summary = FitSummary {
            r: 6.5,
            r_error: 0.02,
            t0: 288.15,
            t0_error: 0.1,
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        write_summary_json(&path, &summary).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"T0_error\""));
        let back: FitSummary = serde_json::from_str(&text).unwrap();
        assert_eq!(back, summary);
    }

    #[test]
    fn two_point_summary_round_trips_with_infinite_errors() {
        let ds = Dataset::new(vec![Measurement::new(0.0, 15.0), Measurement::new(2.0, 2.0)]);
        let fit = fit(&clean(&ds), &SolverOptions::default()).unwrap();
        let summary = fit.summary();
        assert!(summary.r_error.is_infinite());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        write_summary_json(&path, &summary).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"r_error\": \"inf\""), "{text}");
        let back: FitSummary = serde_json::from_str(&text).unwrap();
        assert_eq!(back, summary);
    }

    #[test]
    fn fitted_csv_has_header_and_rows() {
        let rows = vec![
            PointResidual {
                altitude_km: 0.0,
                temperature_k: 288.0,
                fitted_k: 288.15,
                residual: -0.15,
            },
            PointResidual {
                altitude_km: 1.0,
                temperature_k: 282.0,
                fitted_k: 281.65,
                residual: 0.35,
            },
        ];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fitted.csv");
        write_fitted_csv(&path, &rows).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("altitude_km,temperature_k,fitted_k,residual"));
        assert_eq!(lines.count(), 2);
    }

    #[test]
    fn unwritable_path_is_output_error() {
        let summary = FitSummary {
            r: 1.0,
            r_error: 0.0,
            t0: 1.0,
            t0_error: 0.0,
        };
        let err = write_summary_json(Path::new("/no/such/dir/summary.json"), &summary).unwrap_err();
        assert_eq!(err.exit_code(), 5);
    }
}
