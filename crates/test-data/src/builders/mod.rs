//! Fluent builder APIs for generation runs.
//!
//! The [`DatasetBuilder`] runs every generator in dependency order and
//! returns a [`Dataset`] ready to be written out as CSV.

mod dataset;

pub use dataset::{Dataset, DatasetBuilder, DatasetMetrics};
