//! Entity records for the autotrack vehicle registry.
//!
//! Every table the data pipeline emits has a typed record here. Records carry a
//! synthetic 1-based `id` and serialize field-by-field in column order, so a
//! `csv::Writer` produces the exact layout the database loader expects.
//!
//! Records with invariants are built through `new` constructors that return
//! [`RecordError`] instead of letting an inconsistent row through.

pub mod camera;
pub mod catalog;
pub mod document;
pub mod error;
pub mod formats;
pub mod people;
pub mod vehicle;

pub use camera::{Camera, NewSnapshot, Snapshot, TrackInfo};
pub use catalog::{CAR_MAKES, models_for};
pub use document::DocumentPair;
pub use error::RecordError;
pub use people::{NewOwner, NewUser, Owner, Role, User};
pub use vehicle::{
    CarClass, EngineType, NewRegistration, NewVehicle, RegistrationRecord, TitleRecord, Vehicle,
};

/// Synthetic row id shared by every table.
pub type RowId = i64;
