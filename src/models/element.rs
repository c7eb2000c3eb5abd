//! Elements of an Overpass JSON document.

use serde::Deserialize;
use std::collections::HashMap;

/// Type of OSM object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsmType {
    Node,
    Way,
    Relation,
    /// Any element type Overpass may add that we do not model
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for OsmType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OsmType::Node => write!(f, "node"),
            OsmType::Way => write!(f, "way"),
            OsmType::Relation => write!(f, "relation"),
            OsmType::Unknown => write!(f, "unknown"),
        }
    }
}

/// Geometry carried by a record
#[derive(Debug, Clone, PartialEq)]
pub enum GeoKind {
    /// A node. Coordinates may be missing when Overpass omits them.
    Point { lat: Option<f64>, lon: Option<f64> },
    /// A way, as the ordered ids of its member nodes
    Way { nodes: Vec<i64> },
    /// Relations and anything else; never located
    Other,
}

/// One element of a document.
///
/// `id` is only unique within the document it came from.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawElement")]
pub struct GeoRecord {
    pub id: i64,
    pub osm_type: OsmType,
    pub kind: GeoKind,
    pub tags: HashMap<String, String>,
}

#[derive(Deserialize)]
struct RawElement {
    #[serde(rename = "type")]
    osm_type: OsmType,
    id: i64,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
    #[serde(default)]
    nodes: Vec<i64>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

impl From<RawElement> for GeoRecord {
    fn from(raw: RawElement) -> Self {
        let kind = match raw.osm_type {
            OsmType::Node => GeoKind::Point {
                lat: raw.lat,
                lon: raw.lon,
            },
            OsmType::Way => GeoKind::Way { nodes: raw.nodes },
            OsmType::Relation | OsmType::Unknown => GeoKind::Other,
        };

        Self {
            id: raw.id,
            osm_type: raw.osm_type,
            kind,
            tags: raw.tags,
        }
    }
}

impl GeoRecord {
    pub fn node(id: i64, lat: f64, lon: f64) -> Self {
        Self {
            id,
            osm_type: OsmType::Node,
            kind: GeoKind::Point {
                lat: Some(lat),
                lon: Some(lon),
            },
            tags: HashMap::new(),
        }
    }

    pub fn way(id: i64, nodes: Vec<i64>) -> Self {
        Self {
            id,
            osm_type: OsmType::Way,
            kind: GeoKind::Way { nodes },
            tags: HashMap::new(),
        }
    }

    /// Builder-style tag insertion
    pub fn with_tag(mut self, key: &str, value: &str) -> Self {
        self.tags.insert(key.to_string(), value.to_string());
        self
    }

    /// Coordinates carried directly by a node, if both are present
    pub fn own_coordinates(&self) -> Option<(f64, f64)> {
        match self.kind {
            GeoKind::Point {
                lat: Some(lat),
                lon: Some(lon),
            } => Some((lat, lon)),
            _ => None,
        }
    }
}

/// A persisted Overpass result: `{"elements": [...], ...}`.
///
/// Other top-level fields (`version`, `osm3s`, ...) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OsmDocument {
    #[serde(default)]
    pub elements: Vec<GeoRecord>,
}
