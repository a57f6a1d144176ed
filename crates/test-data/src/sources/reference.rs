//! Reference coordinates for camera placement.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("No coordinates found in reference data")]
    Empty,
}

/// One surveyed camera position.
///
/// Headers may be English or the locale names used by the city's open-data
/// export; any other columns are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GeoPoint {
    #[serde(alias = "Широта", alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "Долгота", alias = "lon")]
    pub longitude: f64,
}

/// Loads reference coordinates from delimited text.
pub struct ReferenceLoader;

impl ReferenceLoader {
    /// Loads every coordinate from a CSV file with a header row.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Vec<GeoPoint>, ReferenceError> {
        let reader = csv::Reader::from_path(path)?;
        Self::collect(reader)
    }

    /// Loads coordinates from CSV data in memory.
    pub fn load_bytes(data: &[u8]) -> Result<Vec<GeoPoint>, ReferenceError> {
        Self::collect(csv::Reader::from_reader(data))
    }

    fn collect<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<GeoPoint>, ReferenceError> {
        let points = reader
            .deserialize()
            .collect::<Result<Vec<GeoPoint>, csv::Error>>()?;

        if points.is_empty() {
            return Err(ReferenceError::Empty);
        }

        Ok(points)
    }
}
