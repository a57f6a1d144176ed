//! CSV artifacts shared by the generator and the loader.

use std::fs;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

pub const USERS_FILE: &str = "users.csv";
pub const OWNERS_FILE: &str = "owners.csv";
pub const VEHICLES_FILE: &str = "cars.csv";
pub const REGISTRATIONS_FILE: &str = "stss.csv";
pub const TITLES_FILE: &str = "ptss.csv";
pub const CAMERAS_FILE: &str = "cameras.csv";
pub const SNAPSHOTS_FILE: &str = "snaps.csv";
pub const TRACK_INFO_FILE: &str = "track_info.csv";
pub const OWNERSHIP_HISTORY_FILE: &str = "ownership_history.csv";
pub const OWNERSHIP_HISTORY_OWNER_FILE: &str = "ownership_history_owner.csv";

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Writes `rows` to `path` with a header row, replacing any existing file.
///
/// The header comes from the first record, so an empty table yields an
/// empty file.
pub fn write_table<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
