//! Row cleaning and unit conversion.
//!
//! `clean` is the only place rows are dropped. It never touches its input: the
//! raw `Dataset` stays available for reporting how many rows were read.

use tracing::debug;

use crate::domain::{CleanPoint, CleanedDataset, Dataset, KELVIN_OFFSET};

/// Convert a Celsius temperature to Kelvin.
pub fn celsius_to_kelvin(celsius: f64) -> f64 {
    celsius + KELVIN_OFFSET
}

/// Convert to Kelvin, then keep only rows with both an altitude and a
/// temperature. Order of retained rows matches the input.
///
/// An empty result is valid here; the fit step decides whether it is enough.
pub fn clean(dataset: &Dataset) -> CleanedDataset {
    let points: Vec<CleanPoint> = dataset
        .measurements
        .iter()
        .filter_map(|m| {
            let temperature_c = m.temperature_c.filter(|v| v.is_finite())?;
            let temperature_k = celsius_to_kelvin(temperature_c);
            let altitude_km = m.altitude_km.filter(|v| v.is_finite())?;
            Some(CleanPoint {
                altitude_km,
                temperature_c,
                temperature_k,
            })
        })
        .collect();

    let rows_dropped = dataset.len() - points.len();
    debug!(kept = points.len(), dropped = rows_dropped, "cleaned dataset");

    CleanedDataset {
        points,
        rows_dropped,
    }
}
