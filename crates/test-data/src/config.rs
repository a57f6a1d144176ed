//! Configuration types for data generation and loading.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reference coordinates shipped with the crate.
pub const DEFAULT_CAMERA_LOCATIONS: &str =
    concat!(env!("CARGO_MANIFEST_DIR"), "/data/camera_locations.csv");

/// Directory the generator writes to and the loader reads from.
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Rows per database append.
pub const LOAD_BATCH_SIZE: usize = 1000;

/// Environment variable holding the PostgreSQL connection string.
pub const DATABASE_URL_ENV: &str = "POSTGRES_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Configuration for one generation run.
///
/// Every field has a default, so a JSON file only needs the keys it changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Number of platform accounts.
    pub user_count: usize,

    /// Number of vehicle owners.
    pub owner_count: usize,

    /// Number of vehicles.
    pub vehicle_count: usize,

    /// Upper bound on STS records; capped by the vehicles available.
    pub registration_count: usize,

    /// Upper bound on PTS records; capped by the STS records available.
    pub title_count: usize,

    /// Number of cameras; must not exceed the reference coordinates.
    pub camera_count: usize,

    /// Number of camera snapshots.
    pub snapshot_count: usize,

    /// Number of operator track lookups.
    pub track_info_count: usize,

    /// Probability that an owner reuses a platform account's identity.
    pub user_match_rate: f64,

    /// CSV of reference camera coordinates.
    pub camera_locations: PathBuf,

    /// Output directory for the generated CSV files.
    pub output_dir: PathBuf,

    /// RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            user_count: 200,
            owner_count: 1000,
            vehicle_count: 2000,
            registration_count: 2000,
            title_count: 2000,
            camera_count: 50,
            snapshot_count: 200,
            track_info_count: 100,
            user_match_rate: 0.6,
            camera_locations: PathBuf::from(DEFAULT_CAMERA_LOCATIONS),
            output_dir: PathBuf::from(DEFAULT_DATA_DIR),
            seed: None,
        }
    }
}

impl GenerationConfig {
    /// Reads a JSON config file; missing keys keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}
