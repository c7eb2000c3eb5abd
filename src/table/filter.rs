use crate::models::GeoRecord;

/// Keys that always make a record worth a row
pub const MEANINGFUL_KEYS: &[&str] = &[
    "name",
    "amenity",
    "shop",
    "building",
    "leisure",
    "religion",
    "phone",
    "website",
    "addr:housenumber",
    "addr:street",
    "addr:city",
    "email",
    "opening_hours",
];

/// Low-value key namespaces (plain string prefixes)
pub const NOISE_PREFIXES: &[&str] = &["source", "gnis", "wikidata", "wikipedia", "note", "fixme"];

/// Whether a record carries anything beyond geometry and bookkeeping tags.
///
/// Unknown keys count as meaningful; a record is dropped only when every
/// key is outside [`MEANINGFUL_KEYS`] and starts with a [`NOISE_PREFIXES`] entry.
pub fn is_meaningful(record: &GeoRecord) -> bool {
    record.tags.keys().any(|key| {
        MEANINGFUL_KEYS.contains(&key.as_str())
            || !NOISE_PREFIXES.iter().any(|prefix| key.starts_with(prefix))
    })
}

/// `religion=no` / `religion=none` are tagging mistakes, not places of worship.
pub fn is_excluded_religion(value: Option<&str>) -> bool {
    matches!(value, Some("no") | Some("none"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_tags() {
        assert!(!is_meaningful(&GeoRecord::node(1, 0.0, 0.0)));
    }

    #[test]
    fn test_noise_only() {
        let record = GeoRecord::node(1, 0.0, 0.0)
            .with_tag("source", "survey")
            .with_tag("wikidata", "Q1")
            .with_tag("note:en", "check")
            .with_tag("gnis:feature_id", "123");
        assert!(!is_meaningful(&record));

        let record = record.with_tag("amenity", "theatre");
        assert!(is_meaningful(&record));
    }

    #[test]
    fn test_unknown_key_is_meaningful() {
        let record = GeoRecord::node(1, 0.0, 0.0)
            .with_tag("source", "survey")
            .with_tag("denomination", "lutheran");
        assert!(is_meaningful(&record));
    }

    #[test]
    fn test_prefix_is_plain_string_match() {
        // "notes" and "sourcetype" start with noise prefixes too
        let record = GeoRecord::node(1, 0.0, 0.0)
            .with_tag("notes", "x")
            .with_tag("sourcetype", "y");
        assert!(!is_meaningful(&record));
    }

    #[test]
    fn test_religion_exclusion() {
        assert!(is_excluded_religion(Some("no")));
        assert!(is_excluded_religion(Some("none")));
        assert!(!is_excluded_religion(Some("christian")));
        assert!(!is_excluded_religion(Some("No")));
        assert!(!is_excluded_religion(Some("")));
        assert!(!is_excluded_religion(None));
    }
}
