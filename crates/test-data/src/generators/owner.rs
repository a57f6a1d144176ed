//! Vehicle owner generation with optional platform-account linkage.

use std::ops::RangeInclusive;

use autotrack_models::{DocumentPair, NewOwner, Owner, RowId, User};
use fake::{
    Fake,
    faker::name::en::{FirstName, LastName},
};
use rand::Rng;
use rand::seq::SliceRandom;
use rand_distr::{Bernoulli, Distribution};
use tracing::debug;

use super::{GenerateError, patronymic, require_config};
use crate::documents::DocumentRegistry;

/// Configuration for owner generation.
#[derive(Debug, Clone)]
pub struct OwnerGenConfig {
    /// Probability that an owner is also a platform account holder.
    pub user_match_rate: f64,
    /// Owner ages, inclusive.
    pub age_range: RangeInclusive<u8>,
    /// Probability that a patronymic (derived from a random given name) is
    /// filled in for synthetic owners.
    pub lastname_rate: f64,
}

impl Default for OwnerGenConfig {
    fn default() -> Self {
        Self {
            user_match_rate: 0.6,
            age_range: 18..=90,
            lastname_rate: 0.7,
        }
    }
}

/// Name and passport of an owner, either copied from a user or invented.
struct Identity {
    name: String,
    surname: String,
    lastname: Option<String>,
    passport: DocumentPair,
}

/// Generates vehicle owners.
pub struct OwnerGenerator {
    config: OwnerGenConfig,
}

impl OwnerGenerator {
    /// Creates a new owner generator with default configuration.
    pub fn new() -> Self {
        Self {
            config: OwnerGenConfig::default(),
        }
    }

    /// Creates a generator with custom configuration.
    pub fn with_config(config: OwnerGenConfig) -> Self {
        Self { config }
    }

    /// Generates `count` owners with ids `1..=count`.
    ///
    /// Each owner is linked to a not-yet-used platform account holding a
    /// passport with probability `user_match_rate`; a linked owner copies the
    /// account's name and passport. Once every eligible account has been
    /// consumed, the remaining owners get synthetic identities.
    ///
    /// All eligible account passports are reserved in `passports` before any
    /// owner is minted, so synthetic passports never collide with them.
    pub fn generate_batch(
        &self,
        count: usize,
        users: &[User],
        passports: &mut DocumentRegistry,
        licenses: &mut DocumentRegistry,
        rng: &mut impl Rng,
    ) -> Result<Vec<Owner>, GenerateError> {
        let link = Bernoulli::new(self.config.user_match_rate)
            .map_err(|_| GenerateError::InvalidProbability(self.config.user_match_rate))?;
        require_config(self.config.age_range.is_empty(), "age_range")?;

        let mut pool: Vec<(&User, DocumentPair)> = users
            .iter()
            .filter_map(|u| u.passport().map(|p| (u, p)))
            .collect();
        pool.shuffle(rng);
        for (_, passport) in &pool {
            passports.reserve(*passport);
        }
        debug!("{} platform accounts eligible for owner linkage", pool.len());

        let mut owners = Vec::with_capacity(count);
        let mut linked = 0;

        for i in 0..count {
            let id = i as RowId + 1;

            let account = if link.sample(rng) { pool.pop() } else { None };
            let identity = match account {
                Some((user, passport)) => {
                    linked += 1;
                    Identity {
                        name: user.name.clone(),
                        surname: user.surname.clone(),
                        lastname: user.lastname.clone(),
                        passport,
                    }
                }
                None => self.synthetic_identity(passports, rng),
            };

            let age = rng.gen_range(self.config.age_range.clone());
            let drive_exp = rng.gen_range(0..=Owner::max_drive_exp(age));
            let drive_license = licenses.mint(rng);

            owners.push(Owner::new(
                id,
                NewOwner {
                    name: identity.name,
                    surname: identity.surname,
                    lastname: identity.lastname,
                    age,
                    passport: identity.passport,
                    drive_exp,
                    drive_license,
                },
            )?);
        }

        debug!("Linked {} of {} owners to platform accounts", linked, count);
        Ok(owners)
    }

    /// Invents a name and mints a fresh passport.
    fn synthetic_identity(&self, passports: &mut DocumentRegistry, rng: &mut impl Rng) -> Identity {
        let name: String = FirstName().fake_with_rng(rng);
        let surname: String = LastName().fake_with_rng(rng);
        let lastname = if rng.r#gen::<f64>() < self.config.lastname_rate {
            Some(patronymic(rng))
        } else {
            None
        };

        Identity {
            name,
            surname,
            lastname,
            passport: passports.mint(rng),
        }
    }
}

impl Default for OwnerGenerator {
    fn default() -> Self {
        Self::new()
    }
}
