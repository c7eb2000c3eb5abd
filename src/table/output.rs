//! Partitioning, sorting, pruning and CSV export of the final table.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use csv::Writer;
use tracing::info;

use super::columns::is_fixed_column;
use super::row::TabularRow;

const COMBINED_NAME: &str = "combined_data";

/// How the corpus is split into files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputMode {
    /// One file per category, each with its own empty columns pruned
    #[default]
    PerCategory,
    /// A single file with every row
    Combined,
}

/// Column-aligned rows
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<TabularRow>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<TabularRow>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[TabularRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Split according to `mode`, sorting (and for per-category output,
    /// pruning) each resulting table.
    pub fn partition(self, mode: OutputMode) -> TableSet {
        let tables = match mode {
            OutputMode::Combined => {
                let mut table = self;
                table.rows.sort_by(|a, b| {
                    a.region()
                        .cmp(b.region())
                        .then_with(|| a.category().cmp(b.category()))
                        .then_with(|| a.osm_id().cmp(&b.osm_id()))
                });
                vec![NamedTable {
                    name: COMBINED_NAME.to_string(),
                    table,
                    dropped_columns: Vec::new(),
                }]
            }
            OutputMode::PerCategory => {
                let mut groups: BTreeMap<String, Vec<TabularRow>> = BTreeMap::new();
                for row in self.rows {
                    groups.entry(row.category().to_string()).or_default().push(row);
                }

                groups
                    .into_iter()
                    .map(|(name, mut rows)| {
                        rows.sort_by(by_region_then_id);
                        let mut table = Table::new(self.columns.clone(), rows);
                        let dropped_columns = table.prune_blank_columns();
                        NamedTable {
                            name,
                            table,
                            dropped_columns,
                        }
                    })
                    .collect()
            }
        };

        TableSet { tables }
    }

    /// Remove non-fixed columns that are blank in every row; returns them.
    pub fn prune_blank_columns(&mut self) -> Vec<String> {
        let rows = &self.rows;
        let (kept, dropped): (Vec<String>, Vec<String>) =
            self.columns.drain(..).partition(|column| {
                is_fixed_column(column) || rows.iter().any(|row| !row.cell(column).is_blank())
            });
        self.columns = kept;
        dropped
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv = Writer::from_writer(writer);
        csv.write_record(&self.columns)?;
        for row in &self.rows {
            csv.write_record(self.columns.iter().map(|c| row.cell(c).to_string()))?;
        }
        csv.flush()?;
        Ok(())
    }
}

fn by_region_then_id(a: &TabularRow, b: &TabularRow) -> Ordering {
    a.region()
        .cmp(b.region())
        .then_with(|| a.osm_id().cmp(&b.osm_id()))
}

#[derive(Debug, Clone)]
pub struct NamedTable {
    pub name: String,
    pub table: Table,
    pub dropped_columns: Vec<String>,
}

/// A written output file
#[derive(Debug, Clone)]
pub struct WrittenTable {
    pub path: PathBuf,
    pub rows: usize,
    pub columns: usize,
}

#[derive(Debug, Clone, Default)]
pub struct TableSet {
    pub tables: Vec<NamedTable>,
}

impl TableSet {
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|t| t.table.len()).sum()
    }

    /// Write `<dir>/<name>.csv` for every table, creating `dir` if needed
    pub fn write_all(&self, dir: &Path) -> Result<Vec<WrittenTable>> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

        let mut written = Vec::with_capacity(self.tables.len());
        for named in &self.tables {
            if !named.dropped_columns.is_empty() {
                info!(
                    "Dropped {} empty tag columns from {}",
                    named.dropped_columns.len(),
                    named.name
                );
            }

            let path = dir.join(format!("{}.csv", named.name));
            let file = fs::File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            named
                .table
                .write_csv(file)
                .with_context(|| format!("Failed to write {}", path.display()))?;

            info!(
                "Created {} ({} rows, {} columns)",
                path.display(),
                named.table.len(),
                named.table.columns().len()
            );
            written.push(WrittenTable {
                path,
                rows: named.table.len(),
                columns: named.table.columns().len(),
            });
        }

        Ok(written)
    }
}
