//! Model fitting.
//!
//! Responsibilities:
//!
//! - reject datasets too small to determine two parameters
//! - run the nonlinear least-squares solve
//! - turn the solver's Jacobian into a parameter covariance and standard errors

pub mod fitter;

pub use fitter::*;
