//! Entity generators for the registry tables.
//!
//! Generators run in dependency order, each consuming the tables built before it:
//! - [`UserGenerator`]: platform accounts with roles and optional passports
//! - [`OwnerGenerator`]: vehicle owners, some reusing a platform account's identity
//! - [`VehicleGenerator`]: vehicles assigned to owners
//! - [`RegistrationGenerator`]: STS certificates, at most one per vehicle
//! - [`TitleGenerator`]: PTS documents, at most one per STS
//! - [`CameraGenerator`]: camera installations at reference coordinates
//! - [`SnapshotGenerator`]: plates observed by cameras inside their retention window
//! - [`TrackInfoGenerator`]: operator lookups of registered vehicles

pub mod camera;
pub mod owner;
pub mod registration;
pub mod snapshot;
pub mod title;
pub mod track_info;
pub mod user;
pub mod vehicle;

pub use camera::{CameraGenConfig, CameraGenerator};
pub use owner::{OwnerGenConfig, OwnerGenerator};
pub use registration::{RegistrationGenConfig, RegistrationGenerator};
pub use snapshot::{SnapshotGenConfig, SnapshotGenerator};
pub use title::TitleGenerator;
pub use track_info::{TrackInfoGenConfig, TrackInfoGenerator};
pub use user::{UserGenConfig, UserGenerator};
pub use vehicle::{VehicleGenConfig, VehicleGenerator};

use autotrack_models::RecordError;
use fake::{Fake, faker::name::en::FirstName};
use rand::Rng;
use thiserror::Error;
use time::{Date, Duration, PrimitiveDateTime};

use crate::sources::ReferenceError;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("No {0} to build on")]
    EmptyTable(&'static str),
    #[error("Requested {requested} {table} but only {available} are available")]
    NotEnoughReferenceRows {
        table: &'static str,
        requested: usize,
        available: usize,
    },
    #[error("No operator or admin users to attribute track lookups to")]
    NoEligibleUsers,
    #[error("No camera installed on or before {0}")]
    NoInstalledCameras(PrimitiveDateTime),
    #[error("Invalid generator config: {0} is empty")]
    EmptyConfig(&'static str),
    #[error("Probability {0} is outside 0..=1")]
    InvalidProbability(f64),
    #[error("Invalid record: {0}")]
    Record(#[from] RecordError),
    #[error("Reference data error: {0}")]
    Reference(#[from] ReferenceError),
}

/// Fails with [`GenerateError::EmptyTable`] when a required parent table is empty.
pub(crate) fn require_rows<T>(rows: &[T], table: &'static str) -> Result<(), GenerateError> {
    if rows.is_empty() {
        return Err(GenerateError::EmptyTable(table));
    }
    Ok(())
}

/// Uniform day in `[start, end]`; collapses to `start` if the range is inverted.
pub(crate) fn random_date(start: Date, end: Date, rng: &mut impl Rng) -> Date {
    let span = (end - start).whole_days().max(0);
    start + Duration::days(rng.gen_range(0..=span))
}

/// Uniform second in `[start, end]`; collapses to `start` if the range is inverted.
pub(crate) fn random_datetime(
    start: PrimitiveDateTime,
    end: PrimitiveDateTime,
    rng: &mut impl Rng,
) -> PrimitiveDateTime {
    let span = (end - start).whole_seconds().max(0);
    start + Duration::seconds(rng.gen_range(0..=span))
}

/// Fails with [`GenerateError::EmptyConfig`] when a configured range or list is empty.
pub(crate) fn require_config(empty: bool, field: &'static str) -> Result<(), GenerateError> {
    if empty {
        return Err(GenerateError::EmptyConfig(field));
    }
    Ok(())
}

/// Patronymic derived from a random given name, e.g. `Johnovich` or `Johnovna`.
pub(crate) fn patronymic(rng: &mut impl Rng) -> String {
    let father: String = FirstName().fake_with_rng(rng);
    let suffix = if rng.gen_bool(0.5) { "ovich" } else { "ovna" };
    format!("{father}{suffix}")
}

/// Picks a uniformly random element; callers check emptiness first.
pub(crate) fn pick<'a, T>(items: &'a [T], rng: &mut impl Rng) -> &'a T {
    &items[rng.gen_range(0..items.len())]
}
