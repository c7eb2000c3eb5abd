/// Build an Overpass QL query for every node, way and relation inside the
/// area matching any of the tag expressions.
///
/// Each expression goes verbatim inside `[...]`, so both `key` and
/// `key=value` forms work.
pub fn build_query(area_id: u64, tags: &[String]) -> String {
    let tag_parts = tags
        .iter()
        .map(|tag| format!("nwr[{}](area.searchArea);", tag))
        .collect::<Vec<_>>()
        .join("\n  ");

    format!(
        "[out:json];\narea({})->.searchArea;\n(\n  {}\n);\nout meta;",
        area_id, tag_parts
    )
}
