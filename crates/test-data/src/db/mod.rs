//! Database integration for loading generated data.
//!
//! The [`Loader`] reads each generated CSV file and appends it to its table
//! through a [`BatchSink`]; [`PgSink`] is the PostgreSQL implementation.

mod loader;

pub use loader::{
    BatchSink, FileOutcome, FileReport, LOAD_MAPPING, LoadError, LoadReport, Loader, PgSink,
    load_database_url,
};
