//! Shared domain types.
//!
//! These types are kept lightweight so they can be:
//!
//! - passed between pipeline stages by reference (each stage owns its output)
//! - exported to JSON/CSV
//! - rebuilt from scratch on every run (no process-wide state)

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Offset between the Celsius and Kelvin scales.
pub const KELVIN_OFFSET: f64 = 273.15;

/// CSV header for the altitude column.
pub const ALTITUDE_COLUMN: &str = "Altitude (km)";

/// CSV header for the temperature column.
pub const TEMPERATURE_COLUMN: &str = "Temperature (C)";

/// One input row, exactly as read from the source.
///
/// Either field may be missing (an empty or NA cell).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Measurement {
    pub altitude_km: Option<f64>,
    pub temperature_c: Option<f64>,
}

impl Measurement {
    pub fn new(altitude_km: f64, temperature_c: f64) -> Self {
        Self {
            altitude_km: Some(altitude_km),
            temperature_c: Some(temperature_c),
        }
    }
}

/// Raw measurements in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub measurements: Vec<Measurement>,
}

impl Dataset {
    pub fn new(measurements: Vec<Measurement>) -> Self {
        Self { measurements }
    }

    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    /// Altitude column view.
    pub fn altitudes(&self) -> Vec<Option<f64>> {
        self.measurements.iter().map(|m| m.altitude_km).collect()
    }

    /// Temperature (°C) column view.
    pub fn temperatures_c(&self) -> Vec<Option<f64>> {
        self.measurements.iter().map(|m| m.temperature_c).collect()
    }
}

/// A complete row that survived cleaning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CleanPoint {
    pub altitude_km: f64,
    pub temperature_c: f64,
    pub temperature_k: f64,
}

/// Output of the cleaning step: complete rows only, input order preserved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanedDataset {
    pub points: Vec<CleanPoint>,
    /// Number of input rows removed because a field was missing.
    pub rows_dropped: usize,
}

impl CleanedDataset {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn altitudes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.altitude_km).collect()
    }

    pub fn temperatures_k(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.temperature_k).collect()
    }

    /// Observed altitude range, or `None` for an empty dataset.
    pub fn altitude_range(&self) -> Option<(f64, f64)> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for p in &self.points {
            lo = lo.min(p.altitude_km);
            hi = hi.max(p.altitude_km);
        }
        if lo.is_finite() && hi.is_finite() {
            Some((lo, hi))
        } else {
            None
        }
    }
}

/// Fitted lapse-rate model with uncertainties.
///
/// `r` is the lapse rate in K/km (positive when temperature falls with
/// altitude) and `t0` the extrapolated temperature at zero altitude in K.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitResult {
    pub r: f64,
    pub t0: f64,
    pub r_error: f64,
    pub t0_error: f64,
    /// Parameter covariance, ordered `[r, t0]`.
    pub covariance: [[f64; 2]; 2],
    pub sse: f64,
    pub rmse: f64,
    pub n_points: usize,
    pub iterations: usize,
}

impl FitResult {
    /// Correlation between `r` and `t0` implied by the covariance matrix.
    ///
    /// `None` when either variance is zero or not finite.
    pub fn correlation(&self) -> Option<f64> {
        let denom = (self.covariance[0][0] * self.covariance[1][1]).sqrt();
        if denom.is_finite() && denom > 0.0 {
            Some(self.covariance[0][1] / denom)
        } else {
            None
        }
    }

    pub fn summary(&self) -> FitSummary {
        FitSummary {
            r: self.r,
            r_error: self.r_error,
            t0: self.t0,
            t0_error: self.t0_error,
        }
    }
}

/// The four-number result handed back to callers of `summarize`.
///
/// Standard errors are `+inf` when the fit has no residual degrees of
/// freedom; in JSON they are then written as the string `"inf"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitSummary {
    pub r: f64,
    #[serde(with = "float_or_token")]
    pub r_error: f64,
    #[serde(rename = "T0")]
    pub t0: f64,
    #[serde(rename = "T0_error", with = "float_or_token")]
    pub t0_error: f64,
}

/// JSON has no encoding for non-finite floats (serde_json writes `null`), so
/// they go out as `"inf"`, `"-inf"` or `"NaN"` and come back through `f64::from_str`.
mod float_or_token {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if value.is_sign_positive() {
            serializer.serialize_str("inf")
        } else {
            serializer.serialize_str("-inf")
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Token(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(v) => Ok(v),
            Repr::Token(t) => t
                .parse::<f64>()
                .map_err(|_| D::Error::custom(format!("expected a number or \"inf\", got \"{t}\""))),
        }
    }
}

/// Fitted value and residual for one cleaned point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointResidual {
    pub altitude_km: f64,
    pub temperature_k: f64,
    pub fitted_k: f64,
    pub residual: f64,
}

/// Options for the iterative least-squares solver.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOptions {
    /// Starting point `[r, t0]`.
    pub initial: [f64; 2],
    /// Relative reduction in the sum of squares below which the solve stops.
    pub ftol: f64,
    /// Relative step size below which the solve stops.
    pub xtol: f64,
    /// Maximum number of residual evaluations.
    pub max_evals: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            initial: [1.0, 1.0],
            ftol: 1.49012e-8,
            xtol: 1.49012e-8,
            max_evals: 200 * (2 + 1),
        }
    }
}

/// Fully-resolved configuration for a `lapse fit` run.
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub csv_path: PathBuf,
    pub solver: SolverOptions,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub residuals: bool,
    pub svg_path: Option<PathBuf>,

    pub json: bool,
    pub export_summary: Option<PathBuf>,
    pub export_fitted: Option<PathBuf>,
}
