//! Linear lapse-rate model.
//!
//! ```text
//! T(h) = -r * h + T0
//! ```
//!
//! with `h` in km, `T` in K, `r` the lapse rate (K/km) and `T0` the temperature
//! at zero altitude.
//!
//! The fitter relies on two primitive operations:
//! - predict `T(h)` for given parameters (residuals, plots)
//! - the partial derivatives of `T(h)` w.r.t. `[r, T0]` (Jacobian rows)

/// Number of free parameters (`r`, `T0`).
pub const PARAM_COUNT: usize = 2;

/// Predicted temperature in K at `altitude` km.
pub fn model(altitude: f64, r: f64, t0: f64) -> f64 {
    -r * altitude + t0
}

/// Partial derivatives `[∂T/∂r, ∂T/∂T0]` at `altitude`.
pub fn jacobian_row(altitude: f64) -> [f64; PARAM_COUNT] {
    [-altitude, 1.0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_value_is_t0() {
        assert_eq!(model(0.0, 6.5, 288.15), 288.15);
    }

    #[test]
    fn differences_are_linear_in_altitude() {
        let (r, t0) = (6.5, 288.15);
        for &(a1, a2) in &[(0.0, 1.0), (2.5, 11.0), (-0.3, 7.25), (15.0, 15.0)] {
            let lhs = model(a1, r, t0) - model(a2, r, t0);
            let rhs = -r * (a1 - a2);
            assert!((lhs - rhs).abs() < 1e-9, "a1={a1} a2={a2}");
        }
    }

    #[test]
    fn jacobian_matches_finite_difference() {
        let (h, r, t0, eps) = (3.2, 6.0, 290.0, 1e-6);
        let row = jacobian_row(h);
        let d_r = (model(h, r + eps, t0) - model(h, r - eps, t0)) / (2.0 * eps);
        let d_t0 = (model(h, r, t0 + eps) - model(h, r, t0 - eps)) / (2.0 * eps);
        assert!((row[0] - d_r).abs() < 1e-6);
        assert!((row[1] - d_t0).abs() < 1e-6);
    }
}
