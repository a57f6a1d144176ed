//! Camera snapshot generation.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use autotrack_models::camera::ROAD_LINES;
use autotrack_models::{Camera, NewSnapshot, RegistrationRecord, RowId, Snapshot};
use rand::Rng;
use time::{Duration, PrimitiveDateTime};

use super::{GenerateError, pick, random_datetime, require_config, require_rows};

/// Configuration for snapshot generation.
#[derive(Debug, Clone)]
pub struct SnapshotGenConfig {
    /// Measured speed in km/h.
    pub speed_range: RangeInclusive<u16>,
    /// How far back from `now` snapshots are kept.
    pub retention_days: i64,
}

impl Default for SnapshotGenConfig {
    fn default() -> Self {
        Self {
            speed_range: 20..=180,
            retention_days: 365,
        }
    }
}

/// Generates plate observations for registered vehicles.
pub struct SnapshotGenerator {
    config: SnapshotGenConfig,
}

impl SnapshotGenerator {
    /// Creates a new snapshot generator with default configuration.
    pub fn new() -> Self {
        Self {
            config: SnapshotGenConfig::default(),
        }
    }

    /// Creates a generator with custom configuration.
    pub fn with_config(config: SnapshotGenConfig) -> Self {
        Self { config }
    }

    /// Generates `count` snapshots.
    ///
    /// Each snapshot picks a camera installed by `now` and a registered plate
    /// uniformly, and a timestamp in `[max(install day, now - retention), now]`.
    /// Cameras installed after `now` never record anything.
    pub fn generate_batch(
        &self,
        count: usize,
        cameras: &[Camera],
        registrations: &[RegistrationRecord],
        now: PrimitiveDateTime,
        rng: &mut impl Rng,
    ) -> Result<Vec<Snapshot>, GenerateError> {
        require_rows(cameras, "cameras")?;
        require_rows(registrations, "registration records")?;
        require_config(self.config.speed_range.is_empty(), "speed_range")?;

        let installed: Vec<&Camera> = cameras
            .iter()
            .filter(|c| c.installed_at() <= now)
            .collect();
        if installed.is_empty() {
            return Err(GenerateError::NoInstalledCameras(now));
        }

        let plates: Vec<&str> = registrations
            .iter()
            .map(|r| r.gos_num.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let retention_start = now - Duration::days(self.config.retention_days);

        (0..count)
            .map(|i| {
                let camera = pick(&installed, rng);
                let start = camera.installed_at().max(retention_start);

                let new = NewSnapshot {
                    camera_id: camera.id,
                    gos_num: pick(&plates, rng).to_string(),
                    road_line: rng.gen_range(ROAD_LINES),
                    speed: rng.gen_range(self.config.speed_range.clone()),
                    snap_datetime: random_datetime(start, now, rng),
                };

                Ok(Snapshot::new(i as RowId + 1, new)?)
            })
            .collect()
    }
}

impl Default for SnapshotGenerator {
    fn default() -> Self {
        Self::new()
    }
}
