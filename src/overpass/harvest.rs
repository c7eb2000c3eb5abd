//! Sequential harvest over every (region, category) pair.

use indicatif::ProgressBar;
use tracing::{error, info};

use super::client::{OverpassClient, QueryTransport};
use super::retry::Sleeper;
use crate::config::Config;
use crate::store::DocumentStore;

/// Restricts a harvest to a subset of the catalog. Empty lists mean "all".
#[derive(Debug, Clone, Default)]
pub struct PairFilter {
    pub regions: Vec<String>,
    pub categories: Vec<String>,
    /// Re-fetch pairs that already have a document
    pub force: bool,
}

impl PairFilter {
    fn accepts(&self, region: &str, category: &str) -> bool {
        (self.regions.is_empty() || self.regions.iter().any(|r| r == region))
            && (self.categories.is_empty() || self.categories.iter().any(|c| c == category))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HarvestSummary {
    pub fetched: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Fetch and persist every selected pair, one request at a time.
///
/// A failed pair is logged and counted; it never stops the batch.
pub async fn harvest<T, S>(
    client: &OverpassClient<T, S>,
    config: &Config,
    store: &DocumentStore,
    filter: &PairFilter,
    progress: &ProgressBar,
) -> HarvestSummary
where
    T: QueryTransport,
    S: Sleeper,
{
    let pairs: Vec<_> = config
        .regions
        .iter()
        .flat_map(|region| config.categories.iter().map(move |category| (region, category)))
        .filter(|(region, category)| filter.accepts(&region.name, &category.name))
        .collect();

    let total = pairs.len();
    progress.set_length(total as u64);
    let mut summary = HarvestSummary::default();

    for (index, (region, category)) in pairs.into_iter().enumerate() {
        progress.set_message(format!("{} {}", region.name, category.name));
        info!(
            "[{}/{}] Querying {} {}...",
            index + 1,
            total,
            region.name,
            category.name
        );

        if !filter.force && store.exists(&region.name, &category.name) {
            info!("Already exists, skipping");
            summary.skipped += 1;
            progress.inc(1);
            continue;
        }

        match client.fetch(region, category).await {
            Ok(document) => match store.save(&region.name, &category.name, &document) {
                Ok(path) => {
                    let count = document["elements"].as_array().map_or(0, Vec::len);
                    info!("Saved {} elements to {}", count, path.display());
                    summary.fetched += 1;
                }
                Err(e) => {
                    error!("Failed to save {} {}: {}", region.name, category.name, e);
                    summary.failed += 1;
                }
            },
            Err(e) => {
                error!(
                    "Failed to retrieve data for {} {}: {}",
                    region.name, category.name, e
                );
                summary.failed += 1;
            }
        }

        progress.inc(1);
    }

    summary
}
