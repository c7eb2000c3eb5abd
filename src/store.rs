//! On-disk raw document store: `<root>/<region>/<category>.json`.
//!
//! A document's presence is what makes harvesting resumable.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::warn;
use walkdir::WalkDir;

use crate::config::Config;
use crate::models::OsmDocument;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed document {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// A discovered document, named by its directory and file stem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEntry {
    pub region: String,
    pub category: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, region: &str, category: &str) -> PathBuf {
        self.root.join(region).join(format!("{}.json", category))
    }

    pub fn exists(&self, region: &str, category: &str) -> bool {
        self.path_for(region, category).exists()
    }

    /// Write a raw response, pretty-printed, creating the region directory.
    pub fn save(
        &self,
        region: &str,
        category: &str,
        document: &Value,
    ) -> Result<PathBuf, DocumentError> {
        let path = self.path_for(region, category);
        let io_err = |source: std::io::Error| DocumentError::Io {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let file = File::create(&path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, document).map_err(|source| {
            DocumentError::Json {
                path: path.clone(),
                source,
            }
        })?;
        writer.flush().map_err(io_err)?;

        Ok(path)
    }

    pub fn load(&self, path: &Path) -> Result<OsmDocument, DocumentError> {
        let file = File::open(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| DocumentError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// List documents in region-then-category name order.
    ///
    /// Directories or files whose names are not in the catalog are skipped
    /// with a warning; stray top-level files are ignored. Unreadable entries
    /// are logged and skipped so one bad region cannot hide the others.
    /// Symlinked region directories are followed.
    pub fn discover(&self, config: &Config) -> Result<Vec<DocumentEntry>, DocumentError> {
        let mut entries = Vec::new();
        let mut walker = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(2)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter();

        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(self.root.as_path());
                    warn!("Skipping unreadable entry {}: {}", path.display(), e);
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy().to_string();

            if entry.depth() == 1 {
                if entry.file_type().is_dir() && !config.is_known_region(&name) {
                    warn!("Skipping unknown region directory: {}", name);
                    walker.skip_current_dir();
                }
                continue;
            }

            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().map_or(true, |e| e != "json") {
                continue;
            }

            let Some(category) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if !config.is_known_category(category) {
                warn!("Skipping unknown category file: {}", path.display());
                continue;
            }

            let region = entry
                .path()
                .parent()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();

            entries.push(DocumentEntry {
                region,
                category: category.to_string(),
                path: path.to_path_buf(),
            });
        }

        Ok(entries)
    }
}
