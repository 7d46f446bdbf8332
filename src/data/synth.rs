//! Synthetic altitude/temperature profiles.
//!
//! Profiles follow the linear lapse-rate law with Gaussian noise on the
//! temperature, and optionally blank out a fraction of temperatures so the
//! cleaning step has something to drop. Generation is fully determined by the
//! seed.

use std::path::Path;

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::data::clean::celsius_to_kelvin;
use crate::domain::{ALTITUDE_COLUMN, Dataset, KELVIN_OFFSET, Measurement, TEMPERATURE_COLUMN};
use crate::error::AppError;
use crate::models::model;

/// Parameters for a synthetic profile.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthConfig {
    pub n: usize,
    pub altitude_min: f64,
    pub altitude_max: f64,
    /// True lapse rate `r0` in K/km.
    pub lapse_rate: f64,
    /// True surface temperature `T0` in K.
    pub t0_k: f64,
    /// Standard deviation of the temperature noise in K.
    pub noise_k: f64,
    /// Probability that a row's temperature is left blank.
    pub missing_fraction: f64,
    pub seed: u64,
}

impl Default for SynthConfig {
    /// International Standard Atmosphere troposphere: 6.5 K/km from 288.15 K.
    fn default() -> Self {
        Self {
            n: 50,
            altitude_min: 0.0,
            altitude_max: 11.0,
            lapse_rate: 6.5,
            t0_k: 288.15,
            noise_k: 0.5,
            missing_fraction: 0.0,
            seed: 42,
        }
    }
}

impl SynthConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.n == 0 {
            return Err(AppError::Input("Sample count must be > 0.".into()));
        }
        if !(self.altitude_min.is_finite()
            && self.altitude_max.is_finite()
            && self.altitude_max >= self.altitude_min)
        {
            return Err(AppError::Input("Invalid altitude range for sample generation.".into()));
        }
        if !(self.noise_k.is_finite() && self.noise_k >= 0.0) {
            return Err(AppError::Input("Noise must be a finite value >= 0.".into()));
        }
        if !(0.0..=1.0).contains(&self.missing_fraction) {
            return Err(AppError::Input("Missing fraction must be within [0, 1].".into()));
        }
        Ok(())
    }
}

/// Generate a profile with evenly spaced altitudes.
pub fn generate_profile(config: &SynthConfig) -> Result<Dataset, AppError> {
    config.validate()?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(0.0, config.noise_k)
        .map_err(|e| AppError::Input(format!("Noise distribution error: {e}")))?;

    let span = config.altitude_max - config.altitude_min;
    let measurements = (0..config.n)
        .map(|i| {
            let u = if config.n > 1 {
                i as f64 / (config.n as f64 - 1.0)
            } else {
                0.0
            };
            let altitude = config.altitude_min + u * span;
            let temperature_k = model(altitude, config.lapse_rate, config.t0_k) + normal.sample(&mut rng);
            let blank = rng.gen_bool(config.missing_fraction);
            Measurement {
                altitude_km: Some(altitude),
                temperature_c: (!blank).then_some(temperature_k - KELVIN_OFFSET),
            }
        })
        .collect();

    Ok(Dataset::new(measurements))
}

/// Write a dataset in the input CSV schema. Missing values are written as
/// empty cells.
pub fn write_dataset_csv(path: &Path, dataset: &Dataset) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::Output(format!("Failed to create CSV '{}': {e}", path.display())))?;

    writer
        .write_record([ALTITUDE_COLUMN, TEMPERATURE_COLUMN])
        .map_err(|e| AppError::Output(format!("Failed to write CSV header: {e}")))?;

    for m in &dataset.measurements {
        writer
            .write_record([fmt_cell(m.altitude_km), fmt_cell(m.temperature_c)])
            .map_err(|e| AppError::Output(format!("Failed to write CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::Output(format!("Failed to flush CSV: {e}")))?;
    Ok(())
}

fn fmt_cell(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.6}")).unwrap_or_default()
}

/// Mean temperature in K over rows that have one.
pub fn mean_temperature_k(dataset: &Dataset) -> Option<f64> {
    let temps: Vec<f64> = dataset
        .measurements
        .iter()
        .filter_map(|m| m.temperature_c.map(celsius_to_kelvin))
        .collect();
    if temps.is_empty() {
        None
    } else {
        Some(temps.iter().sum::<f64>() / temps.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noiseless_profile_lies_on_the_line() {
        let config = SynthConfig {
            n: 12,
            noise_k: 0.0,
            ..SynthConfig::default()
        };
        let ds = generate_profile(&config).unwrap();
        assert_eq!(ds.len(), 12);
        for m in &ds.measurements {
            let alt = m.altitude_km.unwrap();
            let expected_c = 15.0 - 6.5 * alt;
            assert!((m.temperature_c.unwrap() - expected_c).abs() < 1e-9);
        }
        assert_eq!(ds.measurements[0].altitude_km, Some(0.0));
        assert_eq!(ds.measurements[11].altitude_km, Some(11.0));
    }

    #[test]
    fn same_seed_same_profile() {
        let config = SynthConfig {
            missing_fraction: 0.2,
            ..SynthConfig::default()
        };
        let a = generate_profile(&config).unwrap();
        let b = generate_profile(&config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn missing_fraction_one_blanks_every_temperature() {
        let config = SynthConfig {
            n: 8,
            missing_fraction: 1.0,
            ..SynthConfig::default()
        };
        let ds = generate_profile(&config).unwrap();
        assert!(ds.measurements.iter().all(|m| m.temperature_c.is_none()));
        assert!(mean_temperature_k(&ds).is_none());
    }

    #[test]
    fn rejects_invalid_config() {
        let bad = [
            SynthConfig { n: 0, ..SynthConfig::default() },
            SynthConfig { noise_k: -1.0, ..SynthConfig::default() },
            SynthConfig { missing_fraction: 1.5, ..SynthConfig::default() },
            SynthConfig { altitude_min: 5.0, altitude_max: 1.0, ..SynthConfig::default() },
        ];
        for config in bad {
            let err = generate_profile(&config).unwrap_err();
            assert_eq!(err.exit_code(), 2, "{config:?}");
        }
    }

    #[test]
    fn written_csv_loads_back() {
        let config = SynthConfig {
            n: 10,
            missing_fraction: 0.3,
            seed: 7,
            ..SynthConfig::default()
        };
        let ds = generate_profile(&config).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.csv");
        write_dataset_csv(&path, &ds).unwrap();

        let loaded = crate::io::load(&path).unwrap();
        assert_eq!(loaded.len(), ds.len());
        let blanks = |d: &Dataset| d.temperatures_c().iter().filter(|t| t.is_none()).count();
        assert_eq!(blanks(&loaded), blanks(&ds));
    }
}
