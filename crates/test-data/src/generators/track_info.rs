//! Operator track lookups.

use autotrack_models::{RegistrationRecord, RowId, TrackInfo, User};
use rand::Rng;
use time::{Duration, PrimitiveDateTime};

use super::{GenerateError, pick, random_date, random_datetime, require_rows};

/// Configuration for track lookup generation.
#[derive(Debug, Clone)]
pub struct TrackInfoGenConfig {
    /// How far back from `now` lookups happen.
    pub window_days: i64,
    /// How many days before the lookup the requested route day can be.
    pub route_lookback_days: i64,
}

impl Default for TrackInfoGenConfig {
    fn default() -> Self {
        Self {
            window_days: 365,
            route_lookback_days: 30,
        }
    }
}

/// Generates lookups of registered vehicles by operators and admins.
pub struct TrackInfoGenerator {
    config: TrackInfoGenConfig,
}

impl TrackInfoGenerator {
    /// Creates a new generator with default configuration.
    pub fn new() -> Self {
        Self {
            config: TrackInfoGenConfig::default(),
        }
    }

    /// Creates a generator with custom configuration.
    pub fn with_config(config: TrackInfoGenConfig) -> Self {
        Self { config }
    }

    /// Generates `count` lookups.
    ///
    /// Fails with [`GenerateError::NoEligibleUsers`] when no user holds an
    /// operator or admin role.
    pub fn generate_batch(
        &self,
        count: usize,
        users: &[User],
        registrations: &[RegistrationRecord],
        now: PrimitiveDateTime,
        rng: &mut impl Rng,
    ) -> Result<Vec<TrackInfo>, GenerateError> {
        require_rows(users, "users")?;
        require_rows(registrations, "registration records")?;

        let operators: Vec<&User> = users.iter().filter(|u| u.role.is_elevated()).collect();
        if operators.is_empty() {
            return Err(GenerateError::NoEligibleUsers);
        }

        let window_start = now - Duration::days(self.config.window_days);

        (0..count)
            .map(|i| {
                let operator = pick(&operators, rng);
                let registration = pick(registrations, rng);

                let track_time = random_datetime(window_start, now, rng);
                let day = track_time.date();
                let route_date = random_date(
                    day - Duration::days(self.config.route_lookback_days),
                    day,
                    rng,
                );

                Ok(TrackInfo::new(
                    i as RowId + 1,
                    registration.car_id,
                    operator.id,
                    route_date,
                    track_time,
                )?)
            })
            .collect()
    }
}

impl Default for TrackInfoGenerator {
    fn default() -> Self {
        Self::new()
    }
}
