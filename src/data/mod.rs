//! Dataset preparation: cleaning real inputs and generating synthetic ones.

pub mod clean;
pub mod synth;

pub use clean::{celsius_to_kelvin, clean};
pub use synth::{SynthConfig, generate_profile, write_dataset_csv};
