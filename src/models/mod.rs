//! Core data models for raw Overpass documents.

pub mod element;

pub use element::{GeoKind, GeoRecord, OsmDocument, OsmType};
