//! Levenberg–Marquardt nonlinear least squares.
//!
//! Minimizes `Σ r_i(p)²` for a problem that can evaluate its residual vector
//! `r(p)` and Jacobian `J(p) = ∂r/∂p`.
//!
//! Each iteration solves the damped Gauss–Newton step
//!
//! ```text
//! minimize ‖J δ + r‖² + λ ‖D δ‖²
//! ```
//!
//! as a stacked linear least-squares problem (`solve_least_squares`), where `D`
//! holds the running maximum of the Jacobian column norms (Marquardt scaling).
//! Successful steps shrink `λ`, rejected steps grow it.
//!
//! Stopping rules follow MINPACK's `lmder`:
//! - `ftol`: relative reduction of the sum of squares in an accepted step
//! - `xtol`: relative size of the step compared to the parameter vector
//! - `max_evals`: residual evaluation budget (exhausting it is a failure)

use nalgebra::{DMatrix, DVector};
use tracing::trace;

use crate::domain::SolverOptions;
use crate::error::AppError;
use crate::math::solve_least_squares;

const LAMBDA_INIT: f64 = 1e-3;
const LAMBDA_UP: f64 = 10.0;
const LAMBDA_DOWN: f64 = 10.0;
const LAMBDA_MAX: f64 = 1e16;

/// A nonlinear least squares problem.
pub trait LeastSquaresProblem {
    /// Number of residuals (observations).
    fn residual_count(&self) -> usize;

    /// Residual vector `r(p)`, length `residual_count()`.
    fn residuals(&self, params: &DVector<f64>) -> DVector<f64>;

    /// Jacobian `∂r/∂p`, shape `residual_count() × params.len()`.
    fn jacobian(&self, params: &DVector<f64>) -> DMatrix<f64>;
}

/// Solver output at the accepted minimum.
#[derive(Debug, Clone)]
pub struct LmOutcome {
    pub params: DVector<f64>,
    pub residuals: DVector<f64>,
    /// Jacobian evaluated at `params`.
    pub jacobian: DMatrix<f64>,
    /// Sum of squared residuals at `params`.
    pub cost: f64,
    pub iterations: usize,
    pub evaluations: usize,
}

/// Run Levenberg–Marquardt from `initial`.
pub fn levenberg_marquardt<P: LeastSquaresProblem>(
    problem: &P,
    initial: DVector<f64>,
    options: &SolverOptions,
) -> Result<LmOutcome, AppError> {
    let m = problem.residual_count();
    let n = initial.len();
    if n == 0 {
        return Err(AppError::Convergence("no parameters to solve for".into()));
    }
    if m < n {
        return Err(AppError::Convergence(format!(
            "{m} residuals cannot determine {n} parameters"
        )));
    }

    let mut params = initial;
    let mut residuals = problem.residuals(&params);
    let mut evaluations = 1usize;
    let mut cost = residuals.norm_squared();
    if !cost.is_finite() {
        return Err(AppError::Convergence(
            "residuals are not finite at the initial guess".into(),
        ));
    }

    let mut jacobian = problem.jacobian(&params);
    let mut scale = DVector::<f64>::zeros(n);
    let mut lambda = LAMBDA_INIT;
    let mut iterations = 0usize;

    loop {
        if cost == 0.0 {
            break;
        }
        if jacobian.iter().any(|v| !v.is_finite()) {
            return Err(AppError::Convergence("Jacobian is not finite".into()));
        }
        update_scale(&mut scale, &jacobian);

        let step = damped_step(&jacobian, &residuals, &scale, lambda).ok_or_else(|| {
            AppError::Convergence("damped Gauss-Newton step is singular".into())
        })?;

        if evaluations >= options.max_evals {
            return Err(AppError::Convergence(format!(
                "evaluation budget of {} exhausted (sum of squares {cost:.6e})",
                options.max_evals
            )));
        }

        let candidate = &params + &step;
        let candidate_residuals = problem.residuals(&candidate);
        evaluations += 1;
        let candidate_cost = candidate_residuals.norm_squared();

        let small_step = step.norm() <= options.xtol * (params.norm() + options.xtol);

        if candidate_cost.is_finite() && candidate_cost < cost {
            let reduction = (cost - candidate_cost) / cost;
            trace!(iterations, cost = candidate_cost, lambda, "accepted step");

            params = candidate;
            residuals = candidate_residuals;
            cost = candidate_cost;
            jacobian = problem.jacobian(&params);
            lambda = (lambda / LAMBDA_DOWN).max(f64::MIN_POSITIVE);
            iterations += 1;

            if reduction <= options.ftol || small_step {
                break;
            }
        } else {
            trace!(iterations, cost, lambda, "rejected step");
            // The remaining improvement is below what the parameters can resolve.
            if small_step {
                break;
            }
            lambda *= LAMBDA_UP;
            if lambda > LAMBDA_MAX {
                return Err(AppError::Convergence(format!(
                    "unable to reduce sum of squares below {cost:.6e}"
                )));
            }
        }
    }

    Ok(LmOutcome {
        params,
        residuals,
        jacobian,
        cost,
        iterations,
        evaluations,
    })
}

fn update_scale(scale: &mut DVector<f64>, jacobian: &DMatrix<f64>) {
    for (j, col) in jacobian.column_iter().enumerate() {
        scale[j] = scale[j].max(col.norm());
    }
    for s in scale.iter_mut() {
        if *s == 0.0 {
            *s = 1.0;
        }
    }
}

/// Solve `[J; √λ·D] δ = [-r; 0]` in the least-squares sense.
fn damped_step(
    jacobian: &DMatrix<f64>,
    residuals: &DVector<f64>,
    scale: &DVector<f64>,
    lambda: f64,
) -> Option<DVector<f64>> {
    let (m, n) = jacobian.shape();
    let mut a = DMatrix::<f64>::zeros(m + n, n);
    let mut b = DVector::<f64>::zeros(m + n);

    a.rows_mut(0, m).copy_from(jacobian);
    b.rows_mut(0, m).copy_from(&(-residuals));

    let sqrt_lambda = lambda.sqrt();
    for j in 0..n {
        a[(m + j, j)] = sqrt_lambda * scale[j];
    }

    solve_least_squares(&a, &b)
}
