//! External reference data consumed by the generators.
//!
//! - [`ReferenceLoader`]: surveyed camera coordinates from a CSV export

mod reference;

pub use reference::{GeoPoint, ReferenceError, ReferenceLoader};
