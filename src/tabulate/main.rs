//! Convert harvested Overpass documents into CSV tables.
//!
//! Reads `<data-dir>/<region>/<category>.json`, keeps records with
//! meaningful tags, flattens tags into columns and writes either one CSV per
//! category or a single combined CSV.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use poi_harvest::table::{Corpus, OutputMode};
use poi_harvest::{Config, DocumentStore};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "tabulate")]
#[command(about = "Flatten harvested OSM documents into CSV")]
struct Args {
    /// Catalog TOML (defaults to the built-in catalog)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding raw JSON documents
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Where CSV files go (defaults to <data-dir>/csv)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// One file per category, or one combined file
    #[arg(long, value_enum, default_value_t = OutputMode::PerCategory)]
    mode: OutputMode,
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::builtin().context("Failed to load built-in catalog")?,
    };

    if !args.data_dir.is_dir() {
        error!("Data directory {} not found", args.data_dir.display());
        return Ok(());
    }

    info!("Starting data conversion to CSV...");

    let store = DocumentStore::new(&args.data_dir);
    let corpus = Corpus::load(&store, &config).context("Failed to scan data directory")?;

    if corpus.skipped_documents() > 0 {
        warn!("{} documents could not be read", corpus.skipped_documents());
    }
    if corpus.is_empty() {
        info!("No data to convert!");
        return Ok(());
    }
    info!(
        "Loaded {} rows from {} documents",
        corpus.rows().len(),
        corpus.documents()
    );

    let table = corpus.into_table();

    let mut by_purpose: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_county: BTreeMap<String, usize> = BTreeMap::new();
    for row in table.rows() {
        *by_purpose.entry(row.category().to_string()).or_default() += 1;
        *by_county.entry(row.region().to_string()).or_default() += 1;
    }

    let output_dir = args
        .output_dir
        .unwrap_or_else(|| args.data_dir.join("csv"));
    let tables = table.partition(args.mode);
    let written = tables.write_all(&output_dir)?;

    info!("Done!");
    info!("Total CSV files created: {}", written.len());
    info!("Total rows across all files: {}", tables.total_rows());

    info!("Data by purpose:");
    for (purpose, count) in &by_purpose {
        info!("  {}: {} rows", purpose, count);
    }

    info!("Data by county:");
    for (county, count) in &by_county {
        info!("  {}: {} rows", county, count);
    }

    Ok(())
}
