//! Traffic camera generation at surveyed reference coordinates.

use std::path::Path;

use autotrack_models::{Camera, RowId};
use rand::Rng;
use rand::seq::index;
use time::Date;
use time::macros::date;

use super::{GenerateError, random_date};
use crate::sources::{GeoPoint, ReferenceLoader};

/// Configuration for camera generation.
#[derive(Debug, Clone)]
pub struct CameraGenConfig {
    /// Earliest installation date.
    pub installed_from: Date,
    /// Latest installation date.
    pub installed_until: Date,
    /// Probability that a camera can measure speed.
    pub radar_probability: f64,
}

impl Default for CameraGenConfig {
    fn default() -> Self {
        Self {
            installed_from: date!(2018 - 01 - 01),
            installed_until: date!(2022 - 12 - 31),
            radar_probability: 0.5,
        }
    }
}

/// Places cameras at reference coordinates.
pub struct CameraGenerator {
    config: CameraGenConfig,
}

impl CameraGenerator {
    /// Creates a new camera generator with default configuration.
    pub fn new() -> Self {
        Self {
            config: CameraGenConfig::default(),
        }
    }

    /// Creates a generator with custom configuration.
    pub fn with_config(config: CameraGenConfig) -> Self {
        Self { config }
    }

    /// Generates `count` cameras at distinct coordinates sampled from `locations`.
    pub fn generate_batch(
        &self,
        count: usize,
        locations: &[GeoPoint],
        rng: &mut impl Rng,
    ) -> Result<Vec<Camera>, GenerateError> {
        if count > locations.len() {
            return Err(GenerateError::NotEnoughReferenceRows {
                table: "camera locations",
                requested: count,
                available: locations.len(),
            });
        }

        let sampled = index::sample(rng, locations.len(), count);
        let cameras = sampled
            .iter()
            .enumerate()
            .map(|(i, idx)| {
                let location = locations[idx];
                Camera {
                    id: i as RowId + 1,
                    longitude: location.longitude,
                    latitude: location.latitude,
                    install_date: random_date(
                        self.config.installed_from,
                        self.config.installed_until,
                        rng,
                    ),
                    is_radar: rng.r#gen::<f64>() < self.config.radar_probability,
                }
            })
            .collect();

        Ok(cameras)
    }

    /// Loads reference coordinates from `path` and generates `count` cameras.
    pub fn generate_from_file(
        &self,
        count: usize,
        path: impl AsRef<Path>,
        rng: &mut impl Rng,
    ) -> Result<Vec<Camera>, GenerateError> {
        let locations = ReferenceLoader::load_file(path)?;
        self.generate_batch(count, &locations, rng)
    }
}

impl Default for CameraGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CAMERA_LOCATIONS;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn grid(n: usize) -> Vec<GeoPoint> {
        (0..n)
            .map(|i| GeoPoint {
                latitude: 55.0 + i as f64 * 0.01,
                longitude: 37.0 + i as f64 * 0.01,
            })
            .collect()
    }

    #[test]
    fn test_locations_sampled_without_replacement() {
        let mut rng = StdRng::seed_from_u64(61);
        let locations = grid(30);
        let cameras = CameraGenerator::new()
            .generate_batch(30, &locations, &mut rng)
            .unwrap();

        assert_eq!(cameras.len(), 30);
        let mut latitudes: Vec<f64> = cameras.iter().map(|c| c.latitude).collect();
        latitudes.sort_by(|a, b| a.partial_cmp(b).unwrap());
        latitudes.dedup();
        assert_eq!(latitudes.len(), 30);

        for camera in &cameras {
            assert!(camera.install_date >= date!(2018 - 01 - 01));
            assert!(camera.install_date <= date!(2022 - 12 - 31));
        }
    }

    #[test]
    fn test_coordinates_come_from_reference() {
        let mut rng = StdRng::seed_from_u64(62);
        let locations = grid(10);
        let cameras = CameraGenerator::new()
            .generate_batch(4, &locations, &mut rng)
            .unwrap();

        for camera in &cameras {
            assert!(locations.iter().any(|l| l.latitude == camera.latitude
                && l.longitude == camera.longitude));
        }
    }

    #[test]
    fn test_too_many_cameras_requested() {
        let mut rng = StdRng::seed_from_u64(63);
        let result = CameraGenerator::new().generate_batch(11, &grid(10), &mut rng);
        assert!(matches!(
            result,
            Err(GenerateError::NotEnoughReferenceRows {
                requested: 11,
                available: 10,
                ..
            })
        ));
    }

    #[test]
    fn test_generate_from_bundled_file() {
        let mut rng = StdRng::seed_from_u64(64);
        let cameras = CameraGenerator::new()
            .generate_from_file(50, DEFAULT_CAMERA_LOCATIONS, &mut rng)
            .unwrap();
        assert_eq!(cameras.len(), 50);
        assert!(cameras.iter().any(|c| c.is_radar));
        assert!(cameras.iter().any(|c| !c.is_radar));
    }
}
