//! Input/output helpers.
//!
//! - CSV ingest + schema validation (`ingest`)
//! - result exports (JSON/CSV) (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
