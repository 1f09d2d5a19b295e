use crate::models::{Coordinates, TagFilter};

/// Element kinds searched for every tag filter
///
/// Nodes carry their own coordinates; ways and relations are located through
/// the `center` Overpass adds with `out center`.
pub const ELEMENT_TYPES: [&str; 3] = ["node", "way", "relation"];

/// Build an Overpass QL query for features around a point
///
/// # Arguments
/// * `coords` - Search center
/// * `radius_meters` - Search radius around the center
/// * `tag_filters` - Tags to match (OR-ed together)
/// * `server_timeout_secs` - Value for the `[timeout:N]` setting
///
/// # Returns
/// Query text ready to be POSTed to an interpreter endpoint
pub fn build_feature_query(
    coords: Coordinates,
    radius_meters: u32,
    tag_filters: &[TagFilter],
    server_timeout_secs: u64,
) -> String {
    let mut query = format!("[out:json][timeout:{}];\n(\n", server_timeout_secs);

    for filter in tag_filters {
        for element in ELEMENT_TYPES {
            query.push_str(&format!(
                "  {}[\"{}\"=\"{}\"](around:{},{},{});\n",
                element,
                escape_tag(&filter.key),
                escape_tag(&filter.value),
                radius_meters,
                coords.lat,
                coords.lon
            ));
        }
    }

    query.push_str(");\nout center tags;\n");
    query
}

/// Escape characters that would terminate a quoted Overpass string
fn escape_tag(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}
