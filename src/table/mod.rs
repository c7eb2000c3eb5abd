//! Flattening of raw Overpass documents into spreadsheet tables.
//!
//! Rows are buffered for the whole corpus first; the column set is only
//! known once every document has been read.

mod columns;
mod corpus;
mod filter;
mod geometry;
mod output;
mod row;

pub use columns::{column_order, is_fixed_column, BASE_COLUMNS, PRIORITY_COLUMNS, SYNTHETIC_COLUMNS};
pub use corpus::{rows_for_document, Corpus};
pub use filter::{is_excluded_religion, is_meaningful, MEANINGFUL_KEYS, NOISE_PREFIXES};
pub use geometry::{resolve_coordinates, NodeIndex};
pub use output::{NamedTable, OutputMode, Table, TableSet, WrittenTable};
pub use row::{to_row, Cell, TabularRow};
