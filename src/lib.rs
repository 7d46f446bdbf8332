//! `lapse-fit` library crate.
//!
//! Fits the linear lapse-rate model `T(h) = -r * h + T0` to altitude/temperature
//! measurements and reports both parameters with standard errors.
//!
//! The binary (`lapse`) is a thin wrapper around this library so that the core
//! logic is testable without spawning processes. The single end-to-end entry
//! point is [`app::pipeline::summarize`].

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod logging;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;

pub use app::pipeline::summarize;
