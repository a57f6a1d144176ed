//! Generates the registry dataset and writes one CSV per table.
//!
//! Run with:
//! ```
//! cargo run -p autotrack-data --bin generate -- --seed 42 --out-dir ./data
//! ```

use std::path::PathBuf;

use autotrack_data::builders::DatasetBuilder;
use autotrack_data::config::GenerationConfig;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use time::{OffsetDateTime, PrimitiveDateTime};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate synthetic autotrack registry data")]
struct Args {
    /// JSON generation config; missing keys keep their defaults.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory to write the CSV files to.
    #[arg(short, long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// RNG seed for a reproducible dataset.
    #[arg(short, long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GenerationConfig::from_json_file(path)?,
        None => GenerationConfig::default(),
    };
    if let Some(dir) = args.out_dir {
        config.output_dir = dir;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let mut rng = match config.seed {
        Some(seed) => {
            tracing::info!("Using seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let now = OffsetDateTime::now_utc();
    let now = PrimitiveDateTime::new(now.date(), now.time().replace_nanosecond(0)?);

    let dataset = DatasetBuilder::from_config(&config)
        .with_metrics(true)
        .build_data(&mut rng, now)?;
    dataset.write_csv(&config.output_dir)?;

    tracing::info!("Generation completed!");
    if let Some(metrics) = &dataset.metrics {
        tracing::info!("  Users: {}", metrics.user_count);
        tracing::info!("  Owners: {}", metrics.owner_count);
        tracing::info!("  Vehicles: {}", metrics.vehicle_count);
        tracing::info!("  STS: {}", metrics.registration_count);
        tracing::info!("  PTS: {}", metrics.title_count);
        tracing::info!("  Cameras: {}", metrics.camera_count);
        tracing::info!("  Snapshots: {}", metrics.snapshot_count);
        tracing::info!("  Track lookups: {}", metrics.track_info_count);
        tracing::info!("  Took {} ms", metrics.generation_time_ms);
    }

    Ok(())
}
