//! Synthetic data generation for the autotrack vehicle registry.
//!
//! This crate generates a referentially consistent set of tables (platform
//! accounts, vehicle owners, vehicles, STS/PTS documents, traffic cameras,
//! camera snapshots and operator track lookups), writes them as CSV, and
//! bulk-loads the CSV files into PostgreSQL.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use autotrack_data::prelude::*;
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let dataset = DatasetBuilder::new()
//!     .with_users(100)
//!     .with_owners(500)
//!     .with_vehicles(1000)
//!     .build_data(&mut rng, now)?;
//! dataset.write_csv("./data")?;
//!
//! let sink = PgSink::connect_lazy(&load_database_url()?)?;
//! let report = Loader::new(sink, "./data").run().await;
//! ```

pub mod builders;
pub mod config;
pub mod db;
pub mod documents;
pub mod generators;
pub mod output;
pub mod sources;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::builders::{Dataset, DatasetBuilder, DatasetMetrics};
    pub use crate::config::GenerationConfig;
    pub use crate::db::{BatchSink, LoadReport, Loader, PgSink, load_database_url};
    pub use crate::documents::DocumentRegistry;
    pub use crate::generators::{
        CameraGenerator, GenerateError, OwnerGenerator, RegistrationGenerator, SnapshotGenerator,
        TitleGenerator, TrackInfoGenerator, UserGenerator, VehicleGenerator,
    };
    pub use crate::sources::{GeoPoint, ReferenceLoader};
    pub use rand::SeedableRng;
    pub use rand::rngs::StdRng;
}
