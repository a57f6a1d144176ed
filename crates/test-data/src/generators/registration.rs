//! Registration certificate (STS) generation.

use std::collections::HashSet;
use std::ops::RangeInclusive;

use autotrack_models::{
    CarClass, EngineType, NewRegistration, Owner, RegistrationRecord, RowId, Vehicle,
};
use rand::Rng;
use rand::seq::SliceRandom;
use time::{Date, Duration};
use tracing::debug;

use super::{GenerateError, pick, random_date, require_config, require_rows};
use crate::documents::DocumentRegistry;

/// Letters that look the same in Cyrillic and Latin, as used on plates.
const PLATE_LETTERS: [char; 12] = ['А', 'В', 'Е', 'К', 'М', 'Н', 'О', 'Р', 'С', 'Т', 'У', 'Х'];

/// Configuration for registration generation.
#[derive(Debug, Clone)]
pub struct RegistrationGenConfig {
    pub horse_power_range: RangeInclusive<u16>,
    /// Curb weight in kilograms.
    pub weight_range: RangeInclusive<u16>,
    /// Oldest release date, in days before today.
    pub max_vehicle_age_days: i64,
}

impl Default for RegistrationGenConfig {
    fn default() -> Self {
        Self {
            horse_power_range: 60..=800,
            weight_range: 800..=3500,
            max_vehicle_age_days: 20 * 365,
        }
    }
}

/// Generates STS certificates binding vehicles to owners.
pub struct RegistrationGenerator {
    config: RegistrationGenConfig,
}

impl RegistrationGenerator {
    /// Creates a new registration generator with default configuration.
    pub fn new() -> Self {
        Self {
            config: RegistrationGenConfig::default(),
        }
    }

    /// Creates a generator with custom configuration.
    pub fn with_config(config: RegistrationGenConfig) -> Self {
        Self { config }
    }

    /// Generates up to `count` registrations, each for a distinct vehicle.
    ///
    /// Vehicles are visited in random order and each is consumed at most once,
    /// so asking for more registrations than there are vehicles yields one per
    /// vehicle rather than an error. The registered owner is the vehicle's own
    /// owner when it exists in `owners`, otherwise a random owner.
    pub fn generate_batch(
        &self,
        count: usize,
        vehicles: &[Vehicle],
        owners: &[Owner],
        documents: &mut DocumentRegistry,
        today: Date,
        rng: &mut impl Rng,
    ) -> Result<Vec<RegistrationRecord>, GenerateError> {
        require_rows(vehicles, "vehicles")?;
        require_rows(owners, "owners")?;
        require_config(self.config.horse_power_range.is_empty(), "horse_power_range")?;
        require_config(self.config.weight_range.is_empty(), "weight_range")?;

        let owner_ids: HashSet<RowId> = owners.iter().map(|o| o.id).collect();

        let mut order: Vec<&Vehicle> = vehicles.iter().collect();
        order.shuffle(rng);

        let mut used_car_ids = HashSet::new();
        let mut records = Vec::with_capacity(count.min(vehicles.len()));

        for vehicle in order {
            if records.len() == count {
                break;
            }
            if !used_car_ids.insert(vehicle.id) {
                continue;
            }

            let owner_id = if owner_ids.contains(&vehicle.owner_id) {
                vehicle.owner_id
            } else {
                pick(owners, rng).id
            };

            let release_date = random_date(
                today - Duration::days(self.config.max_vehicle_age_days),
                today,
                rng,
            );
            let reg_date = random_date(release_date, today, rng);

            let new = NewRegistration {
                owner_id,
                gos_num: generate_plate(rng),
                horse_power: rng.gen_range(self.config.horse_power_range.clone()),
                car_weight: rng.gen_range(self.config.weight_range.clone()),
                document: documents.mint(rng),
                engine_type: *pick(&EngineType::ALL, rng),
                car_class: *pick(&CarClass::ALL, rng),
                release_date,
                reg_date,
            };

            let id = records.len() as RowId + 1;
            records.push(RegistrationRecord::new(id, vehicle, new)?);
        }

        if records.len() < count {
            debug!(
                "Requested {} registrations, {} vehicles available",
                count,
                records.len()
            );
        }

        Ok(records)
    }
}

impl Default for RegistrationGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Generates a plate number such as `А123ВС77`.
pub fn generate_plate(rng: &mut impl Rng) -> String {
    let mut plate = String::with_capacity(16);
    plate.push(*pick(&PLATE_LETTERS, rng));
    for _ in 0..3 {
        plate.push(char::from(b'0' + rng.gen_range(0..10u8)));
    }
    for _ in 0..2 {
        plate.push(*pick(&PLATE_LETTERS, rng));
    }
    for _ in 0..2 {
        plate.push(char::from(b'0' + rng.gen_range(0..10u8)));
    }
    plate
}
