//! Application error type.
//!
//! Every failure in the pipeline is surfaced as an `AppError`. Each variant maps
//! to a process exit code so the binary can report *which* stage failed:
//!
//! - `2`: the input could not be read or does not match the expected schema
//! - `3`: too few usable rows remain after cleaning
//! - `4`: the least-squares solver did not converge
//! - `5`: an output artifact (plot, export) could not be written

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Missing required column: `{0}`")]
    Schema(String),

    #[error("Insufficient data: {0}")]
    Data(String),

    #[error("Fit did not converge: {0}")]
    Convergence(String),

    #[error("Failed to write output: {0}")]
    Output(String),
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Io { .. } | AppError::Input(_) | AppError::Schema(_) => 2,
            AppError::Data(_) => 3,
            AppError::Convergence(_) => 4,
            AppError::Output(_) => 5,
        }
    }
}
