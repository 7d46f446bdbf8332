//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw input rows (`Measurement`, `Dataset`)
//! - cleaned, Kelvin-converted points (`CleanPoint`, `CleanedDataset`)
//! - fit outputs (`FitResult`, `FitSummary`, `PointResidual`)
//! - run configuration (`FitConfig`, `SolverOptions`)

pub mod types;

pub use types::*;
