//! Lapse-rate fit for a cleaned dataset.
//!
//! Given:
//! - altitudes `h_i` (km)
//! - observed temperatures `T_i` (K)
//!
//! we minimize `Σ (model(h_i, r, T0) - T_i)²` over `(r, T0)` with
//! Levenberg–Marquardt, then estimate the parameter covariance from the
//! Jacobian at the solution:
//!
//! ```text
//! cov = (JᵀJ)⁻¹ · SSE / (n - 2)
//! ```
//!
//! Standard errors are the square roots of the diagonal.

use nalgebra::{DMatrix, DVector, Matrix2, Vector2};
use tracing::{debug, warn};

use crate::domain::{CleanedDataset, FitResult, SolverOptions};
use crate::error::AppError;
use crate::math::{LeastSquaresProblem, levenberg_marquardt};
use crate::models::{PARAM_COUNT, jacobian_row, model};

/// Largest acceptable ratio between the singular values of the column-scaled `JᵀJ`.
const MAX_CONDITION: f64 = 1e12;

/// Residuals `model(h_i) - T_i` over a cleaned dataset.
struct LapseProblem {
    altitudes: Vec<f64>,
    temperatures_k: Vec<f64>,
}

impl LeastSquaresProblem for LapseProblem {
    fn residual_count(&self) -> usize {
        self.altitudes.len()
    }

    fn residuals(&self, params: &DVector<f64>) -> DVector<f64> {
        DVector::from_iterator(
            self.altitudes.len(),
            self.altitudes
                .iter()
                .zip(&self.temperatures_k)
                .map(|(&h, &t)| model(h, params[0], params[1]) - t),
        )
    }

    fn jacobian(&self, _params: &DVector<f64>) -> DMatrix<f64> {
        let mut j = DMatrix::zeros(self.altitudes.len(), PARAM_COUNT);
        for (i, &h) in self.altitudes.iter().enumerate() {
            let row = jacobian_row(h);
            j[(i, 0)] = row[0];
            j[(i, 1)] = row[1];
        }
        j
    }
}

/// Fit `T = -r·h + T0` to a cleaned dataset.
pub fn fit(data: &CleanedDataset, options: &SolverOptions) -> Result<FitResult, AppError> {
    let n = data.len();
    if n < PARAM_COUNT {
        return Err(AppError::Data(format!(
            "{n} usable row(s) after cleaning; at least {PARAM_COUNT} are required"
        )));
    }

    let problem = LapseProblem {
        altitudes: data.altitudes(),
        temperatures_k: data.temperatures_k(),
    };
    ensure_altitude_spread(&problem.altitudes)?;

    let outcome = levenberg_marquardt(
        &problem,
        DVector::from_row_slice(&options.initial),
        options,
    )?;
    debug!(
        iterations = outcome.iterations,
        evaluations = outcome.evaluations,
        sse = outcome.cost,
        "solver finished"
    );

    let covariance = parameter_covariance(&outcome.jacobian, outcome.cost, n)?;

    Ok(FitResult {
        r: outcome.params[0],
        t0: outcome.params[1],
        r_error: covariance[(0, 0)].sqrt(),
        t0_error: covariance[(1, 1)].sqrt(),
        covariance: [
            [covariance[(0, 0)], covariance[(0, 1)]],
            [covariance[(1, 0)], covariance[(1, 1)]],
        ],
        sse: outcome.cost,
        rmse: (outcome.cost / n as f64).sqrt(),
        n_points: n,
        iterations: outcome.iterations,
    })
}

fn ensure_altitude_spread(altitudes: &[f64]) -> Result<(), AppError> {
    let lo = altitudes.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = altitudes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if hi - lo <= f64::EPSILON * hi.abs().max(lo.abs()).max(1.0) {
        return Err(AppError::Convergence(format!(
            "all altitudes equal {lo}; slope is not identifiable"
        )));
    }
    Ok(())
}

fn parameter_covariance(jacobian: &DMatrix<f64>, sse: f64, n: usize) -> Result<Matrix2<f64>, AppError> {
    let singular =
        || AppError::Convergence("Jacobian is singular at the solution; covariance is undefined".into());

    let jtj = jacobian.transpose() * jacobian;
    let jtj = Matrix2::new(jtj[(0, 0)], jtj[(0, 1)], jtj[(1, 0)], jtj[(1, 1)]);

    // Condition is judged on unit-diagonal JᵀJ so that the altitude units and
    // offset do not count against it.
    let scale = Vector2::new(jtj[(0, 0)].sqrt().recip(), jtj[(1, 1)].sqrt().recip());
    if !scale.iter().all(|s| s.is_finite()) {
        return Err(singular());
    }
    let scale = Matrix2::from_diagonal(&scale);
    let scaled = scale * jtj * scale;

    let sv = scaled.singular_values();
    let (sv_max, sv_min) = (sv.max(), sv.min());
    if !(sv_min > 0.0 && sv_max / sv_min < MAX_CONDITION) {
        return Err(singular());
    }
    let inverse = scale * scaled.try_inverse().ok_or_else(singular)? * scale;

    let dof = n - PARAM_COUNT;
    if dof == 0 {
        warn!("{n} points for {PARAM_COUNT} parameters: covariance cannot be estimated");
        return Ok(Matrix2::repeat(f64::INFINITY));
    }

    Ok(inverse * (sse / dof as f64))
}
