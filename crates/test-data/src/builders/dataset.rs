//! Fluent builder for a complete registry dataset.

use std::path::{Path, PathBuf};
use std::time::Instant;

use autotrack_models::{
    Camera, Owner, RegistrationRecord, Snapshot, TitleRecord, TrackInfo, User, Vehicle,
};
use rand::Rng;
use time::PrimitiveDateTime;
use tracing::{info, warn};

use crate::config::{DEFAULT_CAMERA_LOCATIONS, GenerationConfig};
use crate::documents::DocumentRegistry;
use crate::generators::{
    CameraGenerator, GenerateError, OwnerGenConfig, OwnerGenerator, RegistrationGenerator,
    SnapshotGenerator, TitleGenerator, TrackInfoGenerator, UserGenConfig, UserGenerator,
    VehicleGenerator,
};
use crate::output::{
    self, CAMERAS_FILE, OWNERS_FILE, OutputError, REGISTRATIONS_FILE, SNAPSHOTS_FILE,
    TITLES_FILE, TRACK_INFO_FILE, USERS_FILE, VEHICLES_FILE,
};
use crate::sources::{GeoPoint, ReferenceLoader};

/// Every generated table, in dependency order.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub users: Vec<User>,
    pub owners: Vec<Owner>,
    pub vehicles: Vec<Vehicle>,
    pub registrations: Vec<RegistrationRecord>,
    pub titles: Vec<TitleRecord>,
    pub cameras: Vec<Camera>,
    pub snapshots: Vec<Snapshot>,
    pub track_infos: Vec<TrackInfo>,
    /// Metrics from generation (populated if metrics tracking enabled).
    pub metrics: Option<DatasetMetrics>,
}

/// Timing and row counts from one generation run.
#[derive(Debug, Clone)]
pub struct DatasetMetrics {
    /// Time spent generating data (milliseconds).
    pub generation_time_ms: u64,
    pub user_count: usize,
    pub owner_count: usize,
    pub vehicle_count: usize,
    pub registration_count: usize,
    pub title_count: usize,
    pub camera_count: usize,
    pub snapshot_count: usize,
    pub track_info_count: usize,
}

/// Where camera coordinates come from.
#[derive(Debug, Clone)]
enum LocationSource {
    File(PathBuf),
    Points(Vec<GeoPoint>),
}

/// Builder for a full dataset.
///
/// # Example
///
/// ```rust,ignore
/// let dataset = DatasetBuilder::new()
///     .with_users(50)
///     .with_owners(200)
///     .with_vehicles(400)
///     .with_metrics(true)
///     .build_data(&mut rng, now)?;
/// dataset.write_csv("./data")?;
/// ```
pub struct DatasetBuilder {
    user_count: usize,
    user_config: UserGenConfig,

    owner_count: usize,
    owner_config: OwnerGenConfig,

    vehicle_count: usize,
    registration_count: usize,
    title_count: usize,

    camera_count: usize,
    locations: LocationSource,

    snapshot_count: usize,
    track_info_count: usize,

    track_metrics: bool,
}

impl Default for DatasetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetBuilder {
    /// Creates a builder with the default table sizes.
    pub fn new() -> Self {
        Self::from_config(&GenerationConfig::default())
    }

    /// Creates a builder from a loaded generation config.
    pub fn from_config(config: &GenerationConfig) -> Self {
        Self {
            user_count: config.user_count,
            user_config: UserGenConfig::default(),
            owner_count: config.owner_count,
            owner_config: OwnerGenConfig {
                user_match_rate: config.user_match_rate,
                ..Default::default()
            },
            vehicle_count: config.vehicle_count,
            registration_count: config.registration_count,
            title_count: config.title_count,
            camera_count: config.camera_count,
            locations: LocationSource::File(config.camera_locations.clone()),
            snapshot_count: config.snapshot_count,
            track_info_count: config.track_info_count,
            track_metrics: false,
        }
    }

    /// Small dataset for quick checks against a scratch database.
    pub fn smoke_test() -> Self {
        Self::new()
            .with_users(50)
            .with_owners(100)
            .with_vehicles(150)
            .with_registrations(150)
            .with_titles(150)
            .with_cameras(10)
            .with_snapshots(100)
            .with_track_infos(20)
            .with_camera_locations(DEFAULT_CAMERA_LOCATIONS)
    }

    pub fn with_users(mut self, count: usize) -> Self {
        self.user_count = count;
        self
    }

    /// Sets the user generation configuration.
    pub fn with_user_config(mut self, config: UserGenConfig) -> Self {
        self.user_config = config;
        self
    }

    pub fn with_owners(mut self, count: usize) -> Self {
        self.owner_count = count;
        self
    }

    /// Sets the probability that an owner reuses a platform account's identity.
    pub fn with_user_match_rate(mut self, rate: f64) -> Self {
        self.owner_config.user_match_rate = rate;
        self
    }

    pub fn with_vehicles(mut self, count: usize) -> Self {
        self.vehicle_count = count;
        self
    }

    /// Sets the upper bound on STS records.
    pub fn with_registrations(mut self, count: usize) -> Self {
        self.registration_count = count;
        self
    }

    /// Sets the upper bound on PTS records.
    pub fn with_titles(mut self, count: usize) -> Self {
        self.title_count = count;
        self
    }

    pub fn with_cameras(mut self, count: usize) -> Self {
        self.camera_count = count;
        self
    }

    /// Reads camera coordinates from a CSV file at build time.
    pub fn with_camera_locations(mut self, path: impl Into<PathBuf>) -> Self {
        self.locations = LocationSource::File(path.into());
        self
    }

    /// Uses in-memory camera coordinates instead of a file.
    pub fn with_locations(mut self, points: Vec<GeoPoint>) -> Self {
        self.locations = LocationSource::Points(points);
        self
    }

    pub fn with_snapshots(mut self, count: usize) -> Self {
        self.snapshot_count = count;
        self
    }

    pub fn with_track_infos(mut self, count: usize) -> Self {
        self.track_info_count = count;
        self
    }

    /// Enables timing and count metrics on the result.
    pub fn with_metrics(mut self, enabled: bool) -> Self {
        self.track_metrics = enabled;
        self
    }

    /// Generates every table in dependency order.
    ///
    /// `now` anchors all relative dates, so a fixed `now` and seeded `rng`
    /// reproduce the same dataset.
    pub fn build_data(
        &self,
        rng: &mut impl Rng,
        now: PrimitiveDateTime,
    ) -> Result<Dataset, GenerateError> {
        let start_time = if self.track_metrics {
            Some(Instant::now())
        } else {
            None
        };
        let today = now.date();

        // Each table that carries documents has its own registry
        let mut user_passports = DocumentRegistry::new();
        let mut owner_passports = DocumentRegistry::new();
        let mut licenses = DocumentRegistry::new();
        let mut sts_numbers = DocumentRegistry::new();
        let mut pts_numbers = DocumentRegistry::new();

        let users = UserGenerator::with_config(self.user_config.clone()).generate_batch(
            self.user_count,
            &mut user_passports,
            rng,
        )?;
        info!("Generated {} users", users.len());

        let owners = OwnerGenerator::with_config(self.owner_config.clone()).generate_batch(
            self.owner_count,
            &users,
            &mut owner_passports,
            &mut licenses,
            rng,
        )?;
        info!("Generated {} owners", owners.len());

        let vehicles = VehicleGenerator::new().generate_batch(self.vehicle_count, &owners, rng)?;
        info!("Generated {} vehicles", vehicles.len());

        let registrations = RegistrationGenerator::new().generate_batch(
            self.registration_count,
            &vehicles,
            &owners,
            &mut sts_numbers,
            today,
            rng,
        )?;
        info!("Generated {} registration records", registrations.len());

        let titles = TitleGenerator::new().generate_batch(
            self.title_count,
            &registrations,
            &mut pts_numbers,
            rng,
        )?;
        info!("Generated {} title records", titles.len());

        let camera_gen = CameraGenerator::new();
        let cameras = match &self.locations {
            LocationSource::File(path) => {
                let points = ReferenceLoader::load_file(path)?;
                camera_gen.generate_batch(self.camera_count, &points, rng)?
            }
            LocationSource::Points(points) => {
                camera_gen.generate_batch(self.camera_count, points, rng)?
            }
        };
        info!("Generated {} cameras", cameras.len());

        let snapshots = SnapshotGenerator::new().generate_batch(
            self.snapshot_count,
            &cameras,
            &registrations,
            now,
            rng,
        )?;
        info!("Generated {} snapshots", snapshots.len());

        let track_infos = self.track_infos(&users, &registrations, now, rng)?;
        info!("Generated {} track lookups", track_infos.len());

        let metrics = start_time.map(|start| DatasetMetrics {
            generation_time_ms: start.elapsed().as_millis() as u64,
            user_count: users.len(),
            owner_count: owners.len(),
            vehicle_count: vehicles.len(),
            registration_count: registrations.len(),
            title_count: titles.len(),
            camera_count: cameras.len(),
            snapshot_count: snapshots.len(),
            track_info_count: track_infos.len(),
        });

        Ok(Dataset {
            users,
            owners,
            vehicles,
            registrations,
            titles,
            cameras,
            snapshots,
            track_infos,
            metrics,
        })
    }
}

impl DatasetBuilder {
    /// Runs the track lookup stage, which is skipped rather than failing the
    /// run when nothing is requested or no user can perform lookups.
    fn track_infos(
        &self,
        users: &[User],
        registrations: &[RegistrationRecord],
        now: PrimitiveDateTime,
        rng: &mut impl Rng,
    ) -> Result<Vec<TrackInfo>, GenerateError> {
        if self.track_info_count == 0 {
            return Ok(Vec::new());
        }

        match TrackInfoGenerator::new().generate_batch(
            self.track_info_count,
            users,
            registrations,
            now,
            rng,
        ) {
            Err(GenerateError::NoEligibleUsers | GenerateError::EmptyTable("users")) => {
                warn!(
                    "Skipping {} track lookups: no operator or admin users",
                    self.track_info_count
                );
                Ok(Vec::new())
            }
            result => result,
        }
    }
}

impl Dataset {
    /// Writes one CSV per table into `dir`, creating it if needed.
    pub fn write_csv(&self, dir: impl AsRef<Path>) -> Result<(), OutputError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        write_logged(dir, USERS_FILE, &self.users)?;
        write_logged(dir, OWNERS_FILE, &self.owners)?;
        write_logged(dir, VEHICLES_FILE, &self.vehicles)?;
        write_logged(dir, REGISTRATIONS_FILE, &self.registrations)?;
        write_logged(dir, TITLES_FILE, &self.titles)?;
        write_logged(dir, CAMERAS_FILE, &self.cameras)?;
        write_logged(dir, SNAPSHOTS_FILE, &self.snapshots)?;
        write_logged(dir, TRACK_INFO_FILE, &self.track_infos)?;

        Ok(())
    }
}

fn write_logged<T: serde::Serialize>(
    dir: &Path,
    file: &str,
    rows: &[T],
) -> Result<(), OutputError> {
    let path = dir.join(file);
    output::write_table(&path, rows)?;
    info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use super::*;
    use autotrack_models::RowId;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use time::Duration;
    use time::macros::datetime;

    const NOW: PrimitiveDateTime = datetime!(2024 - 06 - 15 12:00:00);

    fn points(n: usize) -> Vec<GeoPoint> {
        (0..n)
            .map(|i| GeoPoint {
                latitude: 55.6 + i as f64 * 0.005,
                longitude: 37.4 + i as f64 * 0.005,
            })
            .collect()
    }

    fn small() -> DatasetBuilder {
        DatasetBuilder::new()
            .with_users(60)
            .with_owners(80)
            .with_vehicles(120)
            .with_registrations(100)
            .with_titles(200)
            .with_cameras(12)
            .with_locations(points(20))
            .with_snapshots(150)
            .with_track_infos(30)
    }

    #[test]
    fn test_referential_closure() {
        let mut rng = StdRng::seed_from_u64(91);
        let data = small().build_data(&mut rng, NOW).unwrap();

        assert_eq!(data.users.len(), 60);
        assert_eq!(data.owners.len(), 80);
        assert_eq!(data.vehicles.len(), 120);
        assert_eq!(data.registrations.len(), 100);
        // Titles are capped by the registrations available
        assert_eq!(data.titles.len(), 100);
        assert_eq!(data.cameras.len(), 12);

        let owner_ids: HashSet<RowId> = data.owners.iter().map(|o| o.id).collect();
        let vehicle_ids: HashSet<RowId> = data.vehicles.iter().map(|v| v.id).collect();
        let sts_ids: HashSet<RowId> = data.registrations.iter().map(|r| r.id).collect();
        let registered_cars: HashSet<RowId> =
            data.registrations.iter().map(|r| r.car_id).collect();
        let plates: HashSet<&str> = data
            .registrations
            .iter()
            .map(|r| r.gos_num.as_str())
            .collect();
        let cameras: HashMap<RowId, &Camera> = data.cameras.iter().map(|c| (c.id, c)).collect();
        let users: HashMap<RowId, &User> = data.users.iter().map(|u| (u.id, u)).collect();

        assert!(data.vehicles.iter().all(|v| owner_ids.contains(&v.owner_id)));
        for r in &data.registrations {
            assert!(vehicle_ids.contains(&r.car_id));
            assert!(owner_ids.contains(&r.owner_id));
        }
        assert_eq!(registered_cars.len(), data.registrations.len());
        assert!(data.titles.iter().all(|t| sts_ids.contains(&t.sts_id)));

        for s in &data.snapshots {
            let camera = cameras[&s.camera_id];
            assert!(plates.contains(s.gos_num.as_str()));
            assert!(s.snap_datetime >= camera.installed_at());
            assert!(s.snap_datetime >= NOW - Duration::days(365));
            assert!(s.snap_datetime <= NOW);
        }
        for t in &data.track_infos {
            assert!(users[&t.user_id].role.is_elevated());
            assert!(registered_cars.contains(&t.car_id));
        }
    }

    #[test]
    fn test_same_seed_same_dataset() {
        let builder = small();
        let a = builder
            .build_data(&mut StdRng::seed_from_u64(92), NOW)
            .unwrap();
        let b = builder
            .build_data(&mut StdRng::seed_from_u64(92), NOW)
            .unwrap();

        assert_eq!(
            serde_json::to_string(&a.owners).unwrap(),
            serde_json::to_string(&b.owners).unwrap()
        );
        assert_eq!(a.snapshots, b.snapshots);
        assert_eq!(a.track_infos, b.track_infos);
    }

    #[test]
    fn test_empty_parent_fails_before_children() {
        let mut rng = StdRng::seed_from_u64(93);
        let result = small().with_vehicles(0).build_data(&mut rng, NOW);
        assert!(matches!(result, Err(GenerateError::EmptyTable("vehicles"))));

        let result = small().with_owners(0).build_data(&mut rng, NOW);
        assert!(matches!(result, Err(GenerateError::EmptyTable("owners"))));
    }

    #[test]
    fn test_without_users() {
        let mut rng = StdRng::seed_from_u64(98);
        let data = small()
            .with_users(0)
            .with_track_infos(0)
            .build_data(&mut rng, NOW)
            .unwrap();

        assert!(data.users.is_empty());
        assert!(data.track_infos.is_empty());
        assert_eq!(data.owners.len(), 80);
        assert_eq!(data.registrations.len(), 100);

        // Lookups requested without anyone to perform them are skipped
        let data = small().with_users(0).build_data(&mut rng, NOW).unwrap();
        assert!(data.track_infos.is_empty());
    }

    #[test]
    fn test_no_operators_skips_lookups() {
        let mut rng = StdRng::seed_from_u64(99);
        let data = small()
            .with_user_config(UserGenConfig {
                role_distribution: [1.0, 0.0, 0.0],
                ..Default::default()
            })
            .build_data(&mut rng, NOW)
            .unwrap();

        assert_eq!(data.users.len(), 60);
        assert!(data.track_infos.is_empty());
        assert_eq!(data.snapshots.len(), 150);
    }

    #[test]
    fn test_too_few_locations() {
        let mut rng = StdRng::seed_from_u64(94);
        let result = small()
            .with_cameras(30)
            .with_locations(points(20))
            .build_data(&mut rng, NOW);
        assert!(matches!(
            result,
            Err(GenerateError::NotEnoughReferenceRows { requested: 30, .. })
        ));
    }

    #[test]
    fn test_metrics_tracking() {
        let mut rng = StdRng::seed_from_u64(95);
        let data = small().build_data(&mut rng, NOW).unwrap();
        assert!(data.metrics.is_none());

        let data = small().with_metrics(true).build_data(&mut rng, NOW).unwrap();
        let metrics = data.metrics.unwrap();
        assert_eq!(metrics.user_count, 60);
        assert_eq!(metrics.title_count, data.titles.len());
        assert_eq!(metrics.snapshot_count, 150);
        assert_eq!(metrics.track_info_count, 30);
    }

    #[test]
    fn test_smoke_preset_uses_bundled_locations() {
        let mut rng = StdRng::seed_from_u64(96);
        let data = DatasetBuilder::smoke_test()
            .build_data(&mut rng, NOW)
            .unwrap();
        assert_eq!(data.cameras.len(), 10);
        assert_eq!(data.track_infos.len(), 20);
    }

    #[test]
    fn test_write_csv() {
        let mut rng = StdRng::seed_from_u64(97);
        let data = small().build_data(&mut rng, NOW).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("data");

        data.write_csv(&out).unwrap();

        for (file, rows) in [
            (USERS_FILE, data.users.len()),
            (OWNERS_FILE, data.owners.len()),
            (VEHICLES_FILE, data.vehicles.len()),
            (REGISTRATIONS_FILE, data.registrations.len()),
            (TITLES_FILE, data.titles.len()),
            (CAMERAS_FILE, data.cameras.len()),
            (SNAPSHOTS_FILE, data.snapshots.len()),
            (TRACK_INFO_FILE, data.track_infos.len()),
        ] {
            let mut reader = csv::Reader::from_path(out.join(file)).unwrap();
            assert_eq!(&reader.headers().unwrap()[0], "id", "{file}");
            assert_eq!(reader.records().count(), rows, "{file}");
        }

        let mut reader = csv::Reader::from_path(out.join(SNAPSHOTS_FILE)).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            ["id", "camera_id", "gos_num", "road_line", "speed", "snap_datetime"]
        );
    }
}
