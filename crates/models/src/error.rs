use thiserror::Error;
use time::{Date, PrimitiveDateTime};

use crate::people::Role;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("Document pair {serial}/{number} is outside the serial/number range")]
    InvalidDocument { serial: u16, number: u32 },

    #[error("Unknown car make: {0}")]
    UnknownMake(String),

    #[error("Model {model} does not belong to make {mark}")]
    ModelMismatch { mark: String, model: String },

    #[error("VIN must be 17 characters of A-Z or 0-9, got {0:?}")]
    InvalidVin(String),

    #[error("Driving experience {drive_exp} is impossible at age {age}")]
    DriveExperience { age: u8, drive_exp: u8 },

    #[error("{0} accounts must be verified and carry a passport")]
    UnverifiedElevatedRole(Role),

    #[error("Passport present on an unverified account")]
    PassportWithoutVerification,

    #[error("Registration date {reg_date} precedes release date {release_date}")]
    RegisteredBeforeRelease { release_date: Date, reg_date: Date },

    #[error("Road line {0} is outside 1..=5")]
    InvalidRoadLine(u8),

    #[error("Route date {route_date} is after tracking time {track_time}")]
    RouteAfterTracking {
        route_date: Date,
        track_time: PrimitiveDateTime,
    },
}
