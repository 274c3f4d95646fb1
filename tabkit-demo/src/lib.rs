//! Demo scenarios for tabkit
//!
//! Each scenario returns what it produced so the binary can print it and
//! tests can check it.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use rusqlite::Connection;
use tabkit_core::pipeline::{Pipeline, PipelineStats};
use tabkit_core::{shared, CopyActivity, Dataset, Distance, Sink, Source, Table, WaitActivity};
use tabkit_readers::{CsvDataset, JsonDataset, ReaderArgs, ReaderFactory};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Settings for the demo runner
#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    /// JSON file copied by the pipeline
    pub source_path: PathBuf,

    /// CSV file the pipeline writes
    pub sink_path: PathBuf,

    /// Delay before the copy, in seconds
    pub wait_seconds: f64,

    /// Log filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from("users_1k.json"),
            sink_path: PathBuf::from("users_1k.csv"),
            wait_seconds: 5.0,
            log_filter: "info".to_string(),
        }
    }
}

impl DemoConfig {
    /// Read overrides from `TABKIT_SOURCE`, `TABKIT_SINK`, `TABKIT_WAIT_SECS`
    /// and `TABKIT_LOG`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through `lookup`, falling back to the defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(source) = lookup("TABKIT_SOURCE") {
            config.source_path = PathBuf::from(source);
        }
        if let Some(sink) = lookup("TABKIT_SINK") {
            config.sink_path = PathBuf::from(sink);
        }
        if let Some(wait) = lookup("TABKIT_WAIT_SECS") {
            config.wait_seconds = wait
                .trim()
                .parse()
                .with_context(|| format!("TABKIT_WAIT_SECS is not a number: {wait:?}"))?;
            WaitActivity::from_secs_f64(config.wait_seconds).context("Invalid TABKIT_WAIT_SECS")?;
        }
        if let Some(filter) = lookup("TABKIT_LOG") {
            config.log_filter = filter;
        }

        Ok(config)
    }
}

/// Install the global log subscriber
///
/// `RUST_LOG` takes precedence over `default_filter`.
pub fn init_logging(default_filter: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter)
            .with_context(|| format!("Failed to parse log filter {default_filter:?}"))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {e}"))
}

/// What the copy pipeline did
#[derive(Debug)]
pub struct CopyReport {
    /// Sink preview before the pipeline ran
    pub before: Table,

    /// Sink preview after the pipeline ran
    pub after: Table,

    /// Pipeline execution statistics
    pub stats: PipelineStats,
}

/// Wait, then copy the JSON source into the CSV sink
pub fn run_copy_demo(config: &DemoConfig) -> Result<CopyReport> {
    let source = shared(
        JsonDataset::open(&config.source_path)
            .with_context(|| format!("Failed to open {}", config.source_path.display()))?,
    );
    let sink = shared(
        CsvDataset::open(&config.sink_path)
            .with_context(|| format!("Failed to open {}", config.sink_path.display()))?,
    );

    let before = sink.borrow().preview();

    let mut pipeline = Pipeline::named("copy-demo");
    pipeline.add_activity(WaitActivity::from_secs_f64(config.wait_seconds)?);
    pipeline.add_activity(CopyActivity::new(Source::new(source), Sink::new(sink.clone())));
    let stats = pipeline.execute().context("Copy pipeline failed")?;

    let after = sink.borrow().preview();
    info!(rows = sink.borrow().get_data().num_rows(), "Copy demo finished");

    Ok(CopyReport { before, after, stats })
}

/// Sample rows for the `users` table
const USERS: [(&str, &str, &str, &str, &str, f64); 4] = [
    ("00001", "Nik", "datagy", "male", "2023-06-01", 12.34),
    ("00002", "Lois", "Daily Planet", "Female", "2023-07-01", 12.56),
    ("00003", "Peter", "Parker Tech", "Male", "2023-08-01", 45.67),
    ("00004", "Bruce", "Wayne Enterprises", "male", "2023-09-01", 123.12),
];

/// Create and fill the `users` table
pub fn seed_users(connection: &Connection) -> Result<()> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS users(
            userid INT PRIMARY KEY,
            fname TEXT,
            company TEXT,
            gender TEXT,
            date DATE,
            amount FLOAT
        );",
    )?;

    for user in USERS {
        connection.execute(
            "INSERT OR IGNORE INTO users VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![user.0, user.1, user.2, user.3, user.4, user.5],
        )?;
    }

    Ok(())
}

/// Read the seeded database table, the sink CSV and the source JSON
///
/// Returns one `(title, rendered table)` pair per reader.
pub fn run_reader_demo(config: &DemoConfig) -> Result<Vec<(String, String)>> {
    let connection = Connection::open_in_memory()?;
    seed_users(&connection)?;

    let database = ReaderFactory::get_reader("database")?;
    let csv = ReaderFactory::get_reader("csv")?;
    let json = ReaderFactory::get_reader("json")?;

    let mut results = Vec::with_capacity(3);

    let reader = database(ReaderArgs::Table {
        table_name: "users".to_string(),
        connection: &connection,
        path: None,
    })?;
    results.push(("Results from the database reader:".to_string(), reader.to_string()));

    let reader = csv(ReaderArgs::Path(config.sink_path.clone()))
        .with_context(|| format!("Failed to read {}", config.sink_path.display()))?;
    results.push(("Results from the csv reader:".to_string(), reader.to_string()));

    let reader = json(ReaderArgs::Path(config.source_path.clone()))
        .with_context(|| format!("Failed to read {}", config.source_path.display()))?;
    results.push(("Results from the json reader:".to_string(), reader.to_string()));

    Ok(results)
}

/// Exercise distance normalization and arithmetic
pub fn run_distance_demo() -> Result<Vec<String>> {
    let first = Distance::new(2, 80, 233)?;
    let second = Distance::new(1, 21, 20)?;
    let longer = Distance::new(3, 21, 20)?;

    let mut lines = vec![
        format!("first:  {first} ({} mm)", first.total_millimeters()),
        format!("second: {second}"),
        format!("sum:    {}", first.add(second)?),
        format!("diff:   {}", first.subtract(second)?),
    ];

    match first.subtract(longer) {
        Ok(diff) => lines.push(format!("diff:   {diff}")),
        Err(e) => lines.push(format!("{first} - {longer}: {e}")),
    }

    Ok(lines)
}
