//! Bulk loading of generated CSV tables into PostgreSQL.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use csv::StringRecord;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::{DATABASE_URL_ENV, LOAD_BATCH_SIZE};
use crate::output::{
    CAMERAS_FILE, OWNERS_FILE, OWNERSHIP_HISTORY_FILE, OWNERSHIP_HISTORY_OWNER_FILE,
    REGISTRATIONS_FILE, SNAPSHOTS_FILE, TITLES_FILE, TRACK_INFO_FILE, USERS_FILE, VEHICLES_FILE,
};

/// CSV file to destination table, in load order.
pub const LOAD_MAPPING: &[(&str, &str)] = &[
    (USERS_FILE, "appuser"),
    (VEHICLES_FILE, "car"),
    (OWNERS_FILE, "carowner"),
    (REGISTRATIONS_FILE, "sts"),
    (SNAPSHOTS_FILE, "carsnapshot"),
    (CAMERAS_FILE, "camera"),
    (TITLES_FILE, "pts"),
    (TRACK_INFO_FILE, "trackinfo"),
    (OWNERSHIP_HISTORY_FILE, "ownershiphistory"),
    (OWNERSHIP_HISTORY_OWNER_FILE, "ownerhistoryowner"),
];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{} is not set", DATABASE_URL_ENV)]
    MissingDatabaseUrl,
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Reads the connection string, loading `.env` first if present.
pub fn load_database_url() -> Result<String, LoadError> {
    dotenvy::dotenv().ok();
    database_url(std::env::var(DATABASE_URL_ENV).ok())
}

fn database_url(value: Option<String>) -> Result<String, LoadError> {
    value
        .filter(|url| !url.trim().is_empty())
        .ok_or(LoadError::MissingDatabaseUrl)
}

/// Destination for batches of CSV rows.
#[async_trait]
pub trait BatchSink: Send + Sync {
    /// Appends `rows` to `table`, with `columns` naming each field in order.
    ///
    /// Returns the number of rows written.
    async fn append(
        &self,
        table: &str,
        columns: &StringRecord,
        rows: &[StringRecord],
    ) -> Result<u64, LoadError>;
}

/// PostgreSQL sink that streams each batch through `COPY ... FROM STDIN`.
pub struct PgSink {
    pool: PgPool,
}

impl PgSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a sink without connecting; connection errors surface on the
    /// first append.
    pub fn connect_lazy(database_url: &str) -> Result<Self, LoadError> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(10))
            .connect_lazy(database_url)?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl BatchSink for PgSink {
    async fn append(
        &self,
        table: &str,
        columns: &StringRecord,
        rows: &[StringRecord],
    ) -> Result<u64, LoadError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for row in rows {
            writer.write_record(row)?;
        }
        let data = writer.into_inner().map_err(|e| e.into_error())?;

        let mut conn = self.pool.acquire().await?;
        let mut copy = conn.copy_in_raw(&copy_statement(table, columns)).await?;
        copy.send(data).await?;
        Ok(copy.finish().await?)
    }
}

/// Builds the `COPY` statement for a CSV batch with the given header.
fn copy_statement(table: &str, columns: &StringRecord) -> String {
    let columns = columns
        .iter()
        .map(|c| format!("\"{}\"", c.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(", ");
    format!("COPY {table} ({columns}) FROM STDIN WITH (FORMAT csv)")
}

/// What happened to one file of a load run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Loaded { rows: u64 },
    Skipped,
    Failed { error: String },
}

#[derive(Debug, Clone)]
pub struct FileReport {
    pub file: String,
    pub table: String,
    pub outcome: FileOutcome,
}

/// Per-file outcomes of a load run, in load order.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub files: Vec<FileReport>,
}

impl LoadReport {
    pub fn total_rows(&self) -> u64 {
        self.files
            .iter()
            .map(|f| match f.outcome {
                FileOutcome::Loaded { rows } => rows,
                _ => 0,
            })
            .sum()
    }

    pub fn failed(&self) -> impl Iterator<Item = &FileReport> {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, FileOutcome::Failed { .. }))
    }

    pub fn has_failures(&self) -> bool {
        self.failed().next().is_some()
    }
}

/// Loads every mapped CSV file from a directory into its table.
pub struct Loader<S> {
    sink: S,
    data_dir: PathBuf,
    mapping: Vec<(String, String)>,
    batch_size: usize,
}

impl<S: BatchSink> Loader<S> {
    /// Creates a loader over `data_dir` using [`LOAD_MAPPING`].
    pub fn new(sink: S, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            sink,
            data_dir: data_dir.into(),
            mapping: LOAD_MAPPING
                .iter()
                .map(|(file, table)| (file.to_string(), table.to_string()))
                .collect(),
            batch_size: LOAD_BATCH_SIZE,
        }
    }

    /// Replaces the file-to-table mapping.
    pub fn with_mapping<F, T>(mut self, mapping: impl IntoIterator<Item = (F, T)>) -> Self
    where
        F: Into<String>,
        T: Into<String>,
    {
        self.mapping = mapping
            .into_iter()
            .map(|(file, table)| (file.into(), table.into()))
            .collect();
        self
    }

    /// Sets the number of rows per append.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Loads every mapped file in order.
    ///
    /// A failure in one file is logged and recorded; the remaining files are
    /// still attempted.
    pub async fn run(&self) -> LoadReport {
        let mut report = LoadReport::default();

        for (file, table) in &self.mapping {
            let path = self.data_dir.join(file);

            let outcome = if !path.is_file() {
                warn!("Skipping {}: file not found", path.display());
                FileOutcome::Skipped
            } else {
                match self.load_file(&path, table).await {
                    Ok(rows) => {
                        info!("Loaded {} rows from {} into {}", rows, file, table);
                        FileOutcome::Loaded { rows }
                    }
                    Err(e) => {
                        error!("Failed to load {} into {}: {}", file, table, e);
                        FileOutcome::Failed {
                            error: e.to_string(),
                        }
                    }
                }
            };

            report.files.push(FileReport {
                file: file.clone(),
                table: table.clone(),
                outcome,
            });
        }

        report
    }

    /// Reads `path` fully, then appends it to `table` in batches.
    async fn load_file(&self, path: &Path, table: &str) -> Result<u64, LoadError> {
        let mut reader = csv::Reader::from_path(path)?;
        let columns = reader.headers()?.clone();
        let rows = reader
            .records()
            .collect::<Result<Vec<StringRecord>, csv::Error>>()?;

        info!("Loading {} rows into {}...", rows.len(), table);

        let batches = rows.len().div_ceil(self.batch_size);
        let mut loaded = 0;
        for (i, chunk) in rows.chunks(self.batch_size).enumerate() {
            loaded += self.sink.append(table, &columns, chunk).await?;
            info!("  {}: batch {}/{} ({} rows)", table, i + 1, batches, loaded);
        }

        Ok(loaded)
    }
}
