//! Vehicle generation.

use std::ops::RangeInclusive;

use autotrack_models::{CAR_MAKES, NewVehicle, Owner, RecordError, RowId, Vehicle, models_for};
use rand::Rng;

use super::{GenerateError, pick, require_config, require_rows};

const VIN_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Configuration for vehicle generation.
#[derive(Debug, Clone)]
pub struct VehicleGenConfig {
    /// Odometer readings, inclusive.
    pub mileage_range: RangeInclusive<u32>,
    /// Body colors.
    pub colors: Vec<String>,
}

impl Default for VehicleGenConfig {
    fn default() -> Self {
        Self {
            mileage_range: 0..=300_000,
            colors: ["Black", "White", "Silver", "Gray", "Red", "Blue", "Green", "Yellow"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Generates vehicles owned by existing owners.
pub struct VehicleGenerator {
    config: VehicleGenConfig,
}

impl VehicleGenerator {
    /// Creates a new vehicle generator with default configuration.
    pub fn new() -> Self {
        Self {
            config: VehicleGenConfig::default(),
        }
    }

    /// Creates a generator with custom configuration.
    pub fn with_config(config: VehicleGenConfig) -> Self {
        Self { config }
    }

    /// Generates a single vehicle for `owner_id`.
    pub fn generate(
        &self,
        id: RowId,
        owner_id: RowId,
        rng: &mut impl Rng,
    ) -> Result<Vehicle, RecordError> {
        let mark = *pick(CAR_MAKES, rng);
        let models = models_for(mark).ok_or_else(|| RecordError::UnknownMake(mark.to_string()))?;
        let model = *pick(models, rng);

        Vehicle::new(
            id,
            NewVehicle {
                owner_id,
                mark: mark.to_string(),
                model: model.to_string(),
                vin: Self::generate_vin(rng),
                mileage: rng.gen_range(self.config.mileage_range.clone()),
                color: pick(&self.config.colors, rng).clone(),
            },
        )
    }

    /// Generates `count` vehicles, each owned by a uniformly chosen owner.
    pub fn generate_batch(
        &self,
        count: usize,
        owners: &[Owner],
        rng: &mut impl Rng,
    ) -> Result<Vec<Vehicle>, GenerateError> {
        require_rows(owners, "owners")?;
        require_config(self.config.mileage_range.is_empty(), "mileage_range")?;
        require_config(self.config.colors.is_empty(), "colors")?;

        (0..count)
            .map(|i| {
                let owner = pick(owners, rng);
                Ok(self.generate(i as RowId + 1, owner.id, rng)?)
            })
            .collect()
    }

    fn generate_vin(rng: &mut impl Rng) -> String {
        (0..autotrack_models::vehicle::VIN_LEN)
            .map(|_| *pick(VIN_CHARSET, rng) as char)
            .collect()
    }
}

impl Default for VehicleGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::documents::DocumentRegistry;
    use crate::generators::OwnerGenerator;
    use autotrack_models::vehicle::is_valid_vin;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn owners(count: usize, rng: &mut StdRng) -> Vec<Owner> {
        let mut passports = DocumentRegistry::new();
        let mut licenses = DocumentRegistry::new();
        OwnerGenerator::new()
            .generate_batch(count, &[], &mut passports, &mut licenses, rng)
            .unwrap()
    }

    #[test]
    fn test_models_belong_to_make() {
        let mut rng = StdRng::seed_from_u64(31);
        let owners = owners(20, &mut rng);
        let vehicles = VehicleGenerator::new()
            .generate_batch(500, &owners, &mut rng)
            .unwrap();

        assert_eq!(vehicles.len(), 500);
        for v in &vehicles {
            assert!(models_for(&v.mark).unwrap().contains(&v.model.as_str()));
            assert!(is_valid_vin(&v.vin));
            assert!(v.mileage <= 300_000);
        }
    }

    #[test]
    fn test_owner_ids_resolve() {
        let mut rng = StdRng::seed_from_u64(32);
        let owners = owners(7, &mut rng);
        let owner_ids: HashSet<RowId> = owners.iter().map(|o| o.id).collect();

        let vehicles = VehicleGenerator::new()
            .generate_batch(100, &owners, &mut rng)
            .unwrap();
        assert!(vehicles.iter().all(|v| owner_ids.contains(&v.owner_id)));
    }

    #[test]
    fn test_empty_colors_rejected() {
        let mut rng = StdRng::seed_from_u64(34);
        let owners = owners(2, &mut rng);
        let result = VehicleGenerator::with_config(VehicleGenConfig {
            colors: Vec::new(),
            ..Default::default()
        })
        .generate_batch(5, &owners, &mut rng);
        assert!(matches!(result, Err(GenerateError::EmptyConfig("colors"))));
    }

    #[test]
    fn test_requires_owners() {
        let mut rng = StdRng::seed_from_u64(33);
        let result = VehicleGenerator::new().generate_batch(0, &[], &mut rng);
        assert!(matches!(result, Err(GenerateError::EmptyTable("owners"))));
    }
}
