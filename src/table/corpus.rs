use tracing::{info, warn};

use super::columns::{column_order, RELIGION, SYNTHETIC_COLUMNS};
use super::filter::{is_excluded_religion, is_meaningful};
use super::geometry::NodeIndex;
use super::output::Table;
use super::row::{to_row, TabularRow};
use crate::config::Config;
use crate::models::OsmDocument;
use crate::store::{DocumentError, DocumentStore};

/// Rows for every meaningful record of one document.
///
/// The node index lives only for this call; geometry-only nodes feed it but
/// never become rows themselves.
pub fn rows_for_document(document: &OsmDocument, purpose: &str, region: &str) -> Vec<TabularRow> {
    let index = NodeIndex::build(&document.elements);

    document
        .elements
        .iter()
        .filter(|record| is_meaningful(record))
        .map(|record| to_row(record, &index, purpose, region))
        .collect()
}

/// All rows of all documents, buffered before the schema is fixed
#[derive(Debug, Default)]
pub struct Corpus {
    rows: Vec<TabularRow>,
    documents: usize,
    skipped: usize,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every known document in the store.
    ///
    /// Unreadable or malformed documents are logged and contribute nothing.
    pub fn load(store: &DocumentStore, config: &Config) -> Result<Self, DocumentError> {
        let mut corpus = Self::new();

        for entry in store.discover(config)? {
            match store.load(&entry.path) {
                Ok(document) => {
                    let added = corpus.add_document(&document, &entry.category, &entry.region);
                    info!(
                        "Processed {} ({} elements with meaningful data)",
                        entry.path.display(),
                        added
                    );
                }
                Err(e) => {
                    warn!("Error processing {}: {}", entry.path.display(), e);
                    corpus.skipped += 1;
                }
            }
        }

        Ok(corpus)
    }

    /// Append a document's rows, returning how many were added
    pub fn add_document(&mut self, document: &OsmDocument, purpose: &str, region: &str) -> usize {
        let rows = rows_for_document(document, purpose, region);
        let added = rows.len();
        self.rows.extend(rows);
        self.documents += 1;
        added
    }

    pub fn rows(&self) -> &[TabularRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn documents(&self) -> usize {
        self.documents
    }

    pub fn skipped_documents(&self) -> usize {
        self.skipped
    }

    /// Pivot into one table: fix the column set, drop `religion=no|none`
    /// rows, and blank the hand-filled columns.
    ///
    /// Columns are collected before the religion filter, so a key seen only
    /// on a dropped row still gets a (blank) column.
    pub fn into_table(self) -> Table {
        let columns = column_order(self.rows.iter().flat_map(|row| row.columns()));

        let mut rows = self.rows;
        let before = rows.len();
        rows.retain(|row| !is_excluded_religion(row.text(RELIGION)));
        if rows.len() < before {
            info!("Dropped {} rows with religion=no/none", before - rows.len());
        }

        for row in &mut rows {
            for column in SYNTHETIC_COLUMNS {
                row.insert(*column, "");
            }
        }

        Table::new(columns, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeoRecord;
    use crate::table::columns::{LATITUDE, LONGITUDE, OSM_TYPE};
    use crate::table::row::Cell;

    fn document(elements: Vec<GeoRecord>) -> OsmDocument {
        OsmDocument { elements }
    }

    #[test]
    fn test_geometry_only_neighbour_feeds_lookup() {
        let theatre = GeoRecord::node(1, 1.0, 2.0).with_tag("amenity", "theatre");
        let neighbour = GeoRecord::node(2, 3.0, 4.0).with_tag("source", "survey");
        let way = GeoRecord::way(3, vec![2]);
        let doc = document(vec![theatre, way, neighbour]);

        let rows = rows_for_document(&doc, "parks", "A");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get(LATITUDE), Some(&Cell::Float(1.0)));
        assert_eq!(rows[0].get(LONGITUDE), Some(&Cell::Float(2.0)));
        assert_eq!(rows[0].text(OSM_TYPE), Some("node"));
    }

    #[test]
    fn test_tagged_way_resolved_from_untagged_node() {
        let doc = document(vec![
            GeoRecord::node(10, 3.0, 4.0),
            GeoRecord::way(20, vec![10, 11]).with_tag("building", "church"),
        ]);

        let rows = rows_for_document(&doc, "religion", "alameda");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get(LATITUDE), Some(&Cell::Float(3.0)));
        assert_eq!(rows[0].get(LONGITUDE), Some(&Cell::Float(4.0)));
    }

    #[test]
    fn test_node_index_not_shared_across_documents() {
        let mut corpus = Corpus::new();
        corpus.add_document(&document(vec![GeoRecord::node(10, 3.0, 4.0)]), "parks", "A");
        corpus.add_document(
            &document(vec![GeoRecord::way(20, vec![10]).with_tag("name", "Loop")]),
            "parks",
            "B",
        );

        assert_eq!(corpus.rows().len(), 1);
        assert!(corpus.rows()[0].cell(LATITUDE).is_blank());
        assert_eq!(corpus.documents(), 2);
    }

    #[test]
    fn test_religion_filter_and_synthetic_columns() {
        let mut corpus = Corpus::new();
        corpus.add_document(
            &document(vec![
                GeoRecord::node(1, 0.0, 0.0).with_tag("religion", "no").with_tag("name", "A"),
                GeoRecord::node(2, 0.0, 0.0).with_tag("religion", "none"),
                GeoRecord::node(3, 0.0, 0.0).with_tag("religion", "jewish"),
                GeoRecord::node(4, 0.0, 0.0).with_tag("name", "D").with_tag("city", "Oakland"),
            ]),
            "religion",
            "alameda",
        );

        let table = corpus.into_table();
        let ids: Vec<i64> = table.rows().iter().map(|r| r.osm_id()).collect();

        assert_eq!(ids, vec![3, 4]);
        for row in table.rows() {
            for column in SYNTHETIC_COLUMNS {
                assert_eq!(row.text(column), Some(""));
            }
        }
        assert!(table.columns().iter().any(|c| c == "religion"));
    }

    #[test]
    fn test_tag_round_trip() {
        let mut corpus = Corpus::new();
        corpus.add_document(
            &document(vec![
                GeoRecord::node(1, 0.0, 0.0)
                    .with_tag("shop", "books")
                    .with_tag("opening_hours", "Mo-Fr"),
                GeoRecord::node(2, 0.0, 0.0).with_tag("shop", "bicycle"),
            ]),
            "shops",
            "A",
        );

        let table = corpus.into_table();

        assert!(table.columns().iter().any(|c| c == "opening_hours"));
        assert_eq!(table.rows()[0].text("opening_hours"), Some("Mo-Fr"));
        assert!(table.rows()[1].cell("opening_hours").is_blank());
        assert_eq!(table.rows()[1].text("shop"), Some("bicycle"));
    }
}
