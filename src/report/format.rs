//! Formatted terminal output.
//!
//! Formatting lives in one place so the fitting code stays free of
//! presentation concerns and output changes stay localized.

use crate::domain::{CleanedDataset, FitResult, KELVIN_OFFSET, PointResidual};

/// Format the full run summary (dataset counts + fitted parameters + fit quality).
pub fn format_run_summary(rows_read: usize, data: &CleanedDataset, fit: &FitResult) -> String {
    let mut out = String::new();

    out.push_str("=== lapse - Temperature vs Altitude Fit ===\n");
    out.push_str(&format!(
        "Rows: read={rows_read} | dropped={} | used={}\n",
        data.rows_dropped,
        data.len()
    ));
    if let Some((lo, hi)) = data.altitude_range() {
        out.push_str(&format!("Altitude: [{lo:.3}, {hi:.3}] km\n"));
    }

    out.push_str("\nModel: T(h) = -r * h + T0\n");
    out.push_str(&format!("- r  = {} ± {} K/km\n", fmt_num(fit.r), fmt_num(fit.r_error)));
    out.push_str(&format!(
        "- T0 = {} ± {} K ({} °C)\n",
        fmt_num(fit.t0),
        fmt_num(fit.t0_error),
        fmt_num(fit.t0 - KELVIN_OFFSET)
    ));
    match fit.correlation() {
        Some(rho) => out.push_str(&format!("- corr(r, T0) = {rho:.4}\n")),
        None => out.push_str("- corr(r, T0) = n/a\n"),
    }

    out.push_str(&format!(
        "\nSSE={:.6} RMSE={:.6}K iterations={}\n",
        fit.sse, fit.rmse, fit.iterations
    ));

    out
}

/// Format per-point fitted values and residuals.
pub fn format_residual_table(rows: &[PointResidual]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>12} {:>12} {:>12} {:>12}\n",
        "altitude_km", "observed_K", "fitted_K", "residual"
    ));
    out.push_str(&format!("{:-<12} {:-<12} {:-<12} {:-<12}\n", "", "", "", ""));

    for r in rows {
        out.push_str(&format!(
            "{:>12.3} {:>12.3} {:>12.3} {:>12.4}\n",
            r.altitude_km, r.temperature_k, r.fitted_k, r.residual
        ));
    }

    out
}

fn fmt_num(v: f64) -> String {
    if v.is_finite() {
        format!("{v:.6}")
    } else {
        "inf".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::compute_residuals;
    use crate::report::test_support::{sample_data, sample_fit};

    #[test]
    fn summary_lists_counts_and_parameters() {
        let txt = format_run_summary(4, &sample_data(), &sample_fit());
        assert!(txt.contains("Rows: read=4 | dropped=1 | used=3"), "{txt}");
        assert!(txt.contains("Altitude: [0.000, 2.000] km"), "{txt}");
        assert!(txt.contains("- r  = 6.500000 ± 0.250000 K/km"), "{txt}");
        assert!(txt.contains("- T0 = 288.150000 ± 0.500000 K (15.000000 °C)"), "{txt}");
        assert!(txt.contains("- corr(r, T0) = 0.8000"), "{txt}");
    }

    #[test]
    fn infinite_errors_are_printed_as_inf() {
        let mut fit = sample_fit();
        fit.r_error = f64::INFINITY;
        fit.t0_error = f64::INFINITY;
        fit.covariance = [[f64::INFINITY; 2]; 2];
        let txt = format_run_summary(2, &sample_data(), &fit);
        assert!(txt.contains("± inf K/km"), "{txt}");
        assert!(txt.contains("corr(r, T0) = n/a"), "{txt}");
    }

    #[test]
    fn residual_table_has_one_row_per_point() {
        let rows = compute_residuals(&sample_data(), &sample_fit()).unwrap();
        let txt = format_residual_table(&rows);
        assert_eq!(txt.lines().count(), 2 + rows.len());
        assert!(txt.lines().nth(3).unwrap().trim_end().ends_with("0.5000"), "{txt}");
    }
}
