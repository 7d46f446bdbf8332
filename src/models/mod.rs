//! Physical model for temperature as a function of altitude.
//!
//! The model is a small, pure function so the fitting code can stay generic
//! over the residual/Jacobian interface.

pub mod model;

pub use model::*;
