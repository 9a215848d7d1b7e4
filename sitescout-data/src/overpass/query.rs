//! Overpass QL rendering.

use sitescout_core::PoiQuery;

/// Element kinds searched for every filter.
const ELEMENT_KINDS: [&str; 3] = ["node", "way", "relation"];

/// Render `query` as an Overpass QL union asking for JSON with centres.
///
/// `server_timeout_secs` becomes the `[timeout:N]` setting the interpreter
/// enforces on its side.
///
/// # Examples
///
/// ```
/// use sitescout_core::{CategoryFilter, Origin, PoiQuery};
/// use sitescout_data::render_query;
///
/// let origin = Origin { latitude: 1.5, longitude: 2.5 };
/// let filters = vec![CategoryFilter::parse("amenity=cafe").expect("filter")];
/// let ql = render_query(&PoiQuery::from_radius_km(origin, 0.5, filters), 25);
/// assert!(ql.contains(r#"node["amenity"="cafe"](around:500,1.5,2.5);"#));
/// assert!(ql.ends_with("out center meta;"));
/// ```
#[must_use]
pub fn render_query(query: &PoiQuery, server_timeout_secs: u64) -> String {
    let mut ql = format!("[out:json][timeout:{server_timeout_secs}];\n(\n");
    for filter in &query.filters {
        let key = escape(&filter.key);
        let value = escape(&filter.value);
        for kind in ELEMENT_KINDS {
            ql.push_str(&format!(
                "  {kind}[\"{key}\"=\"{value}\"](around:{},{},{});\n",
                query.radius_m, query.origin.latitude, query.origin.longitude
            ));
        }
    }
    ql.push_str(");\nout center meta;");
    ql
}

fn escape(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}
