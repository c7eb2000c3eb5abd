//! poi-harvest - OpenStreetMap points-of-interest export via Overpass
//!
//! This library provides the retrieval and tabulation pipeline shared by the
//! fetch and tabulate binaries.

pub mod config;
pub mod models;
pub mod overpass;
pub mod store;
pub mod table;

pub use config::Config;
pub use models::{GeoKind, GeoRecord, OsmDocument, OsmType};
pub use store::DocumentStore;
