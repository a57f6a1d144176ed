//! Vehicle title (PTS) generation.

use std::collections::HashSet;

use autotrack_models::{RegistrationRecord, RowId, TitleRecord};
use rand::Rng;
use rand::seq::SliceRandom;

use super::{GenerateError, pick, require_rows};
use crate::documents::DocumentRegistry;

/// Countries a vehicle can be imported from.
const IMPORT_COUNTRIES: &[&str] = &[
    "Германия",
    "Грузия",
    "Армения",
    "Америка",
    "Великобритания",
    "Франция",
    "Япония",
    "Китай",
];

/// Generates PTS documents, one per registration certificate.
#[derive(Debug, Default)]
pub struct TitleGenerator;

impl TitleGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generates up to `count` titles, each bound to a distinct registration.
    ///
    /// Registrations are visited in random order and consumed at most once;
    /// undersupply yields fewer titles than requested.
    pub fn generate_batch(
        &self,
        count: usize,
        registrations: &[RegistrationRecord],
        documents: &mut DocumentRegistry,
        rng: &mut impl Rng,
    ) -> Result<Vec<TitleRecord>, GenerateError> {
        require_rows(registrations, "registration records")?;

        let mut order: Vec<&RegistrationRecord> = registrations.iter().collect();
        order.shuffle(rng);

        let mut used_sts_ids = HashSet::new();
        let mut titles = Vec::with_capacity(count.min(registrations.len()));

        for sts in order {
            if titles.len() == count {
                break;
            }
            if !used_sts_ids.insert(sts.id) {
                continue;
            }

            let id = titles.len() as RowId + 1;
            let country = pick(IMPORT_COUNTRIES, rng).to_string();
            titles.push(TitleRecord::new(id, sts.id, documents.mint(rng), country));
        }

        Ok(titles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{OwnerGenerator, RegistrationGenerator, VehicleGenerator};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use time::macros::date;

    fn registrations(count: usize, rng: &mut StdRng) -> Vec<RegistrationRecord> {
        let mut passports = DocumentRegistry::new();
        let mut licenses = DocumentRegistry::new();
        let mut sts_numbers = DocumentRegistry::new();
        let owners = OwnerGenerator::new()
            .generate_batch(10, &[], &mut passports, &mut licenses, rng)
            .unwrap();
        let vehicles = VehicleGenerator::new()
            .generate_batch(count, &owners, rng)
            .unwrap();
        RegistrationGenerator::new()
            .generate_batch(
                count,
                &vehicles,
                &owners,
                &mut sts_numbers,
                date!(2024 - 06 - 15),
                rng,
            )
            .unwrap()
    }

    #[test]
    fn test_one_title_per_registration() {
        let mut rng = StdRng::seed_from_u64(51);
        let registrations = registrations(120, &mut rng);
        let mut documents = DocumentRegistry::new();

        let titles = TitleGenerator::new()
            .generate_batch(500, &registrations, &mut documents, &mut rng)
            .unwrap();

        assert_eq!(titles.len(), registrations.len());

        let sts_ids: HashSet<RowId> = titles.iter().map(|t| t.sts_id).collect();
        assert_eq!(sts_ids.len(), titles.len());
        let known: HashSet<RowId> = registrations.iter().map(|r| r.id).collect();
        assert!(sts_ids.is_subset(&known));

        let pairs: HashSet<_> = titles.iter().map(TitleRecord::document).collect();
        assert_eq!(pairs.len(), titles.len());
        assert!(
            titles
                .iter()
                .all(|t| IMPORT_COUNTRIES.contains(&t.import_country.as_str()))
        );
    }

    #[test]
    fn test_duplicate_registration_rows_consumed_once() {
        let mut rng = StdRng::seed_from_u64(52);
        let mut registrations = registrations(5, &mut rng);
        registrations.extend(registrations.clone());
        let mut documents = DocumentRegistry::new();

        let titles = TitleGenerator::new()
            .generate_batch(10, &registrations, &mut documents, &mut rng)
            .unwrap();
        assert_eq!(titles.len(), 5);
    }

    #[test]
    fn test_requires_registrations() {
        let mut rng = StdRng::seed_from_u64(53);
        let mut documents = DocumentRegistry::new();
        let result = TitleGenerator::new().generate_batch(0, &[], &mut documents, &mut rng);
        assert!(matches!(
            result,
            Err(GenerateError::EmptyTable("registration records"))
        ));
    }
}
