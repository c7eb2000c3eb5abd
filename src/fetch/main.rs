//! Overpass harvest.
//!
//! Queries every (region, category) pair in the catalog and stores the raw
//! JSON under `<data-dir>/<region>/<category>.json`. Existing documents are
//! left alone, so interrupted runs can simply be restarted.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use poi_harvest::overpass::{harvest, OverpassClient, PairFilter};
use poi_harvest::{Config, DocumentStore};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "fetch")]
#[command(about = "Download OSM points of interest from Overpass")]
struct Args {
    /// Catalog TOML (defaults to the built-in catalog)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for raw JSON documents
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Only query these regions
    #[arg(long = "region")]
    regions: Vec<String>,

    /// Only query these categories
    #[arg(long = "category")]
    categories: Vec<String>,

    /// Re-download documents that already exist
    #[arg(long)]
    force: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
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

    for name in &args.regions {
        if !config.is_known_region(name) {
            warn!("Unknown region {:?}, it will match nothing", name);
        }
    }
    for name in &args.categories {
        if !config.is_known_category(name) {
            warn!("Unknown category {:?}, it will match nothing", name);
        }
    }

    std::fs::create_dir_all(&args.data_dir).context("Failed to create data directory")?;
    let data_dir = args.data_dir.canonicalize().unwrap_or_else(|_| args.data_dir.clone());
    info!("Output directory: {}", data_dir.display());

    let store = DocumentStore::new(&args.data_dir);
    let client =
        OverpassClient::from_config(&config.overpass).context("Failed to create HTTP client")?;
    let filter = PairFilter {
        regions: args.regions,
        categories: args.categories,
        force: args.force,
    };

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            )?
            .progress_chars("#>-"),
    );

    let summary = harvest(&client, &config, &store, &filter, &pb).await;
    pb.finish_with_message("done");

    info!(
        "All queries completed: {} fetched, {} skipped, {} failed",
        summary.fetched, summary.skipped, summary.failed
    );

    Ok(())
}
