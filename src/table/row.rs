use std::collections::HashMap;
use std::fmt;

use super::columns::{LATITUDE, LONGITUDE, OSM_ID, OSM_TYPE, QUERY_COUNTY, QUERY_PURPOSE};
use super::geometry::{resolve_coordinates, NodeIndex};
use crate::models::GeoRecord;

/// A single spreadsheet value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Float(f64),
    Integer(i64),
}

impl Cell {
    /// Null or empty string
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Option<f64>> for Cell {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Cell::Empty, Cell::Float)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Float(v) => write!(f, "{:?}", v),
            Cell::Integer(v) => write!(f, "{}", v),
        }
    }
}

/// Sparse row: only columns this record actually has are stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabularRow {
    cells: HashMap<String, Cell>,
}

impl TabularRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<K: Into<String>, V: Into<Cell>>(&mut self, column: K, value: V) {
        self.cells.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.cells.get(column)
    }

    /// Text value of a column; `None` when absent or not text
    pub fn text(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Cell::as_str)
    }

    /// Cell for output; absent columns render blank
    pub fn cell(&self, column: &str) -> &Cell {
        static EMPTY: Cell = Cell::Empty;
        self.cells.get(column).unwrap_or(&EMPTY)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    pub fn region(&self) -> &str {
        self.text(QUERY_COUNTY).unwrap_or_default()
    }

    pub fn category(&self) -> &str {
        self.text(QUERY_PURPOSE).unwrap_or_default()
    }

    pub fn osm_id(&self) -> i64 {
        match self.get(OSM_ID) {
            Some(Cell::Integer(id)) => *id,
            _ => 0,
        }
    }
}

/// Flatten one record: location, provenance, identity, then every tag verbatim.
///
/// Tags are written last, so a tag named like a fixed column wins.
pub fn to_row(record: &GeoRecord, index: &NodeIndex, purpose: &str, region: &str) -> TabularRow {
    let (lat, lon) = resolve_coordinates(record, index);

    let mut row = TabularRow::new();
    row.insert(LATITUDE, lat);
    row.insert(LONGITUDE, lon);
    row.insert(QUERY_PURPOSE, purpose);
    row.insert(QUERY_COUNTY, region);
    row.insert(OSM_ID, Cell::Integer(record.id));
    row.insert(OSM_TYPE, record.osm_type.to_string());

    for (key, value) in &record.tags {
        row.insert(key.as_str(), value.as_str());
    }

    row
}
