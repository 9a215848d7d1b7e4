//! Overpass API JSON response model.
//!
//! Only the parts the engine consumes are modelled. `elements` is kept as a
//! loose value so that a malformed payload degrades to an empty result
//! instead of failing the whole request.
//!
//! See: <https://wiki.openstreetmap.org/wiki/Overpass_API/Overpass_QL#JSON>

use log::warn;
use serde::Deserialize;
use serde_json::Value;
use sitescout_core::RawElement;

/// Overpass interpreter response.
#[derive(Debug, Default, Deserialize)]
pub struct OverpassResponse {
    /// Matched elements; expected to be an array of objects.
    #[serde(default)]
    pub elements: Option<Value>,

    /// Advisory message, set when the interpreter hit a runtime limit.
    #[serde(default)]
    pub remark: Option<String>,
}

impl OverpassResponse {
    /// Convert into raw elements.
    ///
    /// A missing or non-array `elements` yields an empty list. Entries that
    /// do not decode as element objects are skipped with a warning.
    #[must_use]
    pub fn into_elements(self) -> Vec<RawElement> {
        if let Some(remark) = self.remark.as_deref() {
            warn!("overpass remark: {remark}");
        }
        let Some(Value::Array(entries)) = self.elements else {
            return Vec::new();
        };

        entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                if !entry.is_object() {
                    warn!("skipping overpass element {index}: not an object");
                    return None;
                }
                serde_json::from_value::<RawElement>(entry)
                    .inspect_err(|err| warn!("skipping overpass element {index}: {err}"))
                    .ok()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(json: &str) -> OverpassResponse {
        serde_json::from_str(json).expect("should deserialise")
    }

    #[rstest]
    fn decodes_nodes_and_ways() {
        let response = parse(
            r#"{
                "version": 0.6,
                "elements": [
                    {"type": "node", "id": 1, "lat": 12.97, "lon": 77.59,
                     "tags": {"amenity": "cafe", "name": "Brew"}},
                    {"type": "way", "id": 2, "center": {"lat": 12.98, "lon": 77.6}}
                ]
            }"#,
        );

        let elements = response.into_elements();

        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].identity_key(), "node-1");
        assert_eq!(elements[1].latitude(), Some(12.98));
    }

    #[rstest]
    #[case(r#"{"elements": {"type": "node"}}"#)]
    #[case(r#"{"elements": null}"#)]
    #[case(r#"{}"#)]
    fn non_array_elements_yield_nothing(#[case] json: &str) {
        assert!(parse(json).into_elements().is_empty());
    }

    #[rstest]
    fn skips_non_object_entries() {
        let response = parse(r#"{"elements": [1, "two", {"type": "node", "id": 3}]}"#);
        let elements = response.into_elements();
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].identity_key(), "node-3");
    }

    #[rstest]
    fn keeps_remark() {
        let response = parse(r#"{"elements": [], "remark": "runtime error: timeout"}"#);
        assert_eq!(response.remark.as_deref(), Some("runtime error: timeout"));
        assert!(response.into_elements().is_empty());
    }
}
