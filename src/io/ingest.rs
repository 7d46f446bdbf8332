//! CSV ingest.
//!
//! Turns an altitude/temperature CSV into a `Dataset` of raw `Measurement`s.
//!
//! Design goals:
//! - **Strict schema**: both required columns must exist (clear error, exit code 2)
//! - **Strict typing**: a non-empty cell that is not a number is an input error,
//!   reported with its line number
//! - **Empty is not invalid**: a source with no rows (or no header line)
//!   loads as an empty dataset; the fit step rejects it
//! - **Missing is not invalid**: empty/NA cells load as `None` and are left for
//!   the cleaning step to drop
//! - no unit conversion or filtering here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::debug;

use crate::domain::{ALTITUDE_COLUMN, Dataset, Measurement, TEMPERATURE_COLUMN};
use crate::error::AppError;

/// Cell values treated as missing, in addition to the empty string.
const NA_TOKENS: [&str; 6] = ["NA", "N/A", "NaN", "nan", "null", "NULL"];

/// Load a dataset from a CSV file on disk.
pub fn load(path: &Path) -> Result<Dataset, AppError> {
    let file = File::open(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = load_from_reader(file)?;
    debug!(path = %path.display(), rows = dataset.len(), "loaded CSV");
    Ok(dataset)
}

/// Load a dataset from any CSV byte source.
pub fn load_from_reader<R: Read>(source: R) -> Result<Dataset, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| AppError::Input(format!("Failed to read CSV headers: {e}")))?
        .clone();

    // A source with no header line at all holds zero rows, not a malformed table.
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Ok(Dataset::default());
    }

    let header_map = build_header_map(&headers);
    let altitude_idx = required_column(&header_map, ALTITUDE_COLUMN)?;
    let temperature_idx = required_column(&header_map, TEMPERATURE_COLUMN)?;

    let mut measurements = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // Header is line 1, first record is line 2.
        let line = idx + 2;
        let record = result.map_err(|e| AppError::Input(format!("line {line}: {e}")))?;

        measurements.push(Measurement {
            altitude_km: parse_cell(&record, altitude_idx, ALTITUDE_COLUMN, line)?,
            temperature_c: parse_cell(&record, temperature_idx, TEMPERATURE_COLUMN, line)?,
        });
    }

    Ok(Dataset::new(measurements))
}

/// Map header names to column indices. A repeated name resolves to its first column.
fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    let mut map = HashMap::with_capacity(headers.len());
    for (idx, name) in headers.iter().enumerate() {
        map.entry(normalize_header_name(name)).or_insert(idx);
    }
    map
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

fn required_column(header_map: &HashMap<String, usize>, name: &str) -> Result<usize, AppError> {
    header_map
        .get(name)
        .copied()
        .ok_or_else(|| AppError::Schema(name.to_string()))
}

fn parse_cell(
    record: &StringRecord,
    idx: usize,
    column: &str,
    line: usize,
) -> Result<Option<f64>, AppError> {
    let Some(raw) = record.get(idx).map(str::trim) else {
        return Ok(None);
    };
    if is_missing(raw) {
        return Ok(None);
    }
    raw.parse::<f64>().map(Some).map_err(|_| {
        AppError::Input(format!(
            "line {line}: column `{column}` has non-numeric value '{raw}'"
        ))
    })
}

fn is_missing(raw: &str) -> bool {
    raw.is_empty() || NA_TOKENS.contains(&raw)
}
