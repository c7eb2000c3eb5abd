use std::collections::BTreeSet;

pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";
pub const OSM_ID: &str = "osm_id";
pub const OSM_TYPE: &str = "osm_type";
pub const QUERY_PURPOSE: &str = "query_purpose";
pub const QUERY_COUNTY: &str = "query_county";
pub const RELIGION: &str = "religion";

/// Blank columns filled in by hand downstream
pub const SYNTHETIC_COLUMNS: &[&str] = &[
    "Collaborated",
    "city",
    "person_with_relationship",
    "org_contact",
    "org_contact_title",
];

/// Leading columns, always present and never pruned
pub const PRIORITY_COLUMNS: &[&str] = &[
    "name",
    "Collaborated",
    QUERY_COUNTY,
    "city",
    QUERY_PURPOSE,
    "person_with_relationship",
    "org_contact",
    "org_contact_title",
    "phone",
    "email",
    "contact:email",
    "website",
];

/// Location and identity columns, right after the priority block
pub const BASE_COLUMNS: &[&str] = &[LATITUDE, LONGITUDE, OSM_ID, OSM_TYPE];

pub fn is_fixed_column(column: &str) -> bool {
    PRIORITY_COLUMNS.contains(&column) || BASE_COLUMNS.contains(&column)
}

/// Final header: priority block, base block, then every other observed
/// column with `addr:*` keys after the rest, alphabetical within each group.
pub fn column_order<'a, I>(observed: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut tag_columns: Vec<&str> = observed
        .into_iter()
        .filter(|c| !is_fixed_column(c))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    tag_columns.sort_by_key(|c| (c.starts_with("addr:"), *c));

    let mut order: Vec<String> = PRIORITY_COLUMNS
        .iter()
        .chain(BASE_COLUMNS)
        .map(|c| c.to_string())
        .collect();
    order.extend(tag_columns.into_iter().map(String::from));
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_prefix() {
        let order = column_order(std::iter::empty());
        assert_eq!(order.len(), PRIORITY_COLUMNS.len() + BASE_COLUMNS.len());
        assert_eq!(order[0], "name");
        assert_eq!(order[2], "query_county");
        assert_eq!(order[11], "website");
        assert_eq!(&order[12..], &["latitude", "longitude", "osm_id", "osm_type"]);
    }

    #[test]
    fn test_addr_columns_last() {
        let observed = [
            "addr:street",
            "religion",
            "name",
            "amenity",
            "addr:city",
            "latitude",
            "denomination",
            "religion",
            "building",
        ];
        let order = column_order(observed);
        let tail: Vec<&str> = order[16..].iter().map(String::as_str).collect();
        assert_eq!(
            tail,
            vec![
                "amenity",
                "building",
                "denomination",
                "religion",
                "addr:city",
                "addr:street"
            ]
        );
    }

    #[test]
    fn test_uppercase_sorts_before_lowercase() {
        let order = column_order(["b", "Z", "a"]);
        let tail: Vec<&str> = order[16..].iter().map(String::as_str).collect();
        assert_eq!(tail, vec!["Z", "a", "b"]);
    }

    #[test]
    fn test_deterministic() {
        let a = column_order(["x", "addr:y", "w"]);
        let b = column_order(["w", "x", "addr:y"]);
        assert_eq!(a, b);
    }
}
