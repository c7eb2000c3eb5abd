use hashbrown::HashMap;

use crate::models::{GeoKind, GeoRecord};

/// Node id → (lat, lon) for a single document.
///
/// Ids are not unique across documents, so an index must never outlive the
/// document it was built from.
#[derive(Debug, Default)]
pub struct NodeIndex {
    coords: HashMap<i64, (f64, f64)>,
}

impl NodeIndex {
    /// Index every node carrying both coordinates, tagged or not.
    pub fn build(elements: &[GeoRecord]) -> Self {
        let coords = elements
            .iter()
            .filter_map(|record| record.own_coordinates().map(|c| (record.id, c)))
            .collect();
        Self { coords }
    }

    pub fn get(&self, id: i64) -> Option<(f64, f64)> {
        self.coords.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }
}

/// Location of a record as (lat, lon).
///
/// Ways are placed at their first node. Relations and unknown kinds have no
/// location.
pub fn resolve_coordinates(record: &GeoRecord, index: &NodeIndex) -> (Option<f64>, Option<f64>) {
    match &record.kind {
        GeoKind::Point { lat, lon } => (*lat, *lon),
        GeoKind::Way { nodes } => nodes
            .first()
            .and_then(|id| index.get(*id))
            .map_or((None, None), |(lat, lon)| (Some(lat), Some(lon))),
        GeoKind::Other => (None, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OsmType;

    fn sample() -> Vec<GeoRecord> {
        vec![
            GeoRecord::node(10, 3.0, 4.0),
            GeoRecord::node(11, 5.0, 6.0),
            GeoRecord {
                id: 12,
                osm_type: OsmType::Node,
                kind: GeoKind::Point {
                    lat: None,
                    lon: Some(1.0),
                },
                tags: Default::default(),
            },
        ]
    }

    #[test]
    fn test_index_skips_incomplete_nodes() {
        let index = NodeIndex::build(&sample());
        assert_eq!(index.len(), 2);
        assert_eq!(index.get(10), Some((3.0, 4.0)));
        assert_eq!(index.get(12), None);
    }

    #[test]
    fn test_way_uses_first_node() {
        let index = NodeIndex::build(&sample());
        let way = GeoRecord::way(1, vec![11, 10]);
        assert_eq!(resolve_coordinates(&way, &index), (Some(5.0), Some(6.0)));
    }

    #[test]
    fn test_way_first_node_missing() {
        let index = NodeIndex::build(&sample());
        // Second node resolves, but only the first one is consulted
        let way = GeoRecord::way(1, vec![99, 10]);
        assert_eq!(resolve_coordinates(&way, &index), (None, None));
    }

    #[test]
    fn test_empty_way() {
        let index = NodeIndex::build(&sample());
        let way = GeoRecord::way(1, vec![]);
        assert_eq!(resolve_coordinates(&way, &index), (None, None));
    }

    #[test]
    fn test_point_and_other() {
        let index = NodeIndex::default();
        assert_eq!(
            resolve_coordinates(&GeoRecord::node(1, 1.5, 2.5), &index),
            (Some(1.5), Some(2.5))
        );
        let relation = GeoRecord {
            id: 2,
            osm_type: OsmType::Relation,
            kind: GeoKind::Other,
            tags: Default::default(),
        };
        assert_eq!(resolve_coordinates(&relation, &index), (None, None));
    }
}
