//! Raw upstream elements as they arrive from an Overpass-style service.
//!
//! Fields are kept as loose JSON values because upstream payloads are not
//! trusted: coordinates may be numbers or numeric strings, ids may be absent,
//! and tags may hold non-string values.

use geo::Coord;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::place::{PlaceId, Tags, validated_coord};

/// Placeholder used when an identity component is missing.
const UNKNOWN_PART: &str = "unknown";

/// A raw POI record before sanitisation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawElement {
    /// Element kind, e.g. `node`, `way` or `relation`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<Value>,
    /// Source identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// Direct latitude, present on nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<Value>,
    /// Direct longitude, present on nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<Value>,
    /// Computed centre, present on ways and relations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<Value>,
    /// Free-form tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Value>,
}

impl RawElement {
    /// Start an element with a kind and numeric id.
    #[must_use]
    pub fn new(kind: &str, id: i64) -> Self {
        Self {
            kind: Some(Value::from(kind)),
            id: Some(Value::from(id)),
            ..Self::default()
        }
    }

    /// Set the direct `lat`/`lon` pair.
    #[must_use]
    pub fn at(mut self, latitude: f64, longitude: f64) -> Self {
        self.lat = Some(Value::from(latitude));
        self.lon = Some(Value::from(longitude));
        self
    }

    /// Set the `center` object used by ways and relations.
    #[must_use]
    pub fn centred_at(mut self, latitude: f64, longitude: f64) -> Self {
        let mut center = Map::new();
        center.insert("lat".to_owned(), Value::from(latitude));
        center.insert("lon".to_owned(), Value::from(longitude));
        self.center = Some(Value::Object(center));
        self
    }

    /// Add a string tag.
    #[must_use]
    pub fn with_tag(mut self, key: &str, value: &str) -> Self {
        let tags = self
            .tags
            .get_or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(map) = tags {
            map.insert(key.to_owned(), Value::from(value));
        }
        self
    }

    /// First finite latitude among `lat` and `center.lat`.
    #[must_use]
    pub fn latitude(&self) -> Option<f64> {
        self.first_finite(self.lat.as_ref(), "lat")
    }

    /// First finite longitude among `lon` and `center.lon`.
    #[must_use]
    pub fn longitude(&self) -> Option<f64> {
        self.first_finite(self.lon.as_ref(), "lon")
    }

    /// Validated position, or `None` when either axis is missing,
    /// non-finite or out of range.
    #[must_use]
    pub fn location(&self) -> Option<Coord> {
        validated_coord(self.latitude()?, self.longitude()?)
    }

    /// Composite `{type}-{id}` key used for deduplication.
    #[must_use]
    pub fn identity_key(&self) -> String {
        format!(
            "{}-{}",
            render_part(self.kind.as_ref()),
            render_part(self.id.as_ref())
        )
    }

    /// Identifier for the sanitised place.
    ///
    /// Falls back to `"{lat}-{lon}-{index}"` when the element has no usable
    /// id.
    #[must_use]
    pub fn place_id(&self, index: usize, location: Coord) -> PlaceId {
        match self.id.as_ref() {
            Some(Value::Number(number)) => number.as_i64().map_or_else(
                || PlaceId::Text(number.to_string()),
                PlaceId::Numeric,
            ),
            Some(Value::String(text)) if !text.is_empty() => PlaceId::Text(text.clone()),
            _ => PlaceId::Text(format!("{}-{}-{index}", location.y, location.x)),
        }
    }

    /// Tags as sent upstream. Anything but a JSON object yields no tags.
    #[must_use]
    pub fn tags(&self) -> Tags {
        match self.tags.as_ref() {
            Some(Value::Object(map)) => map.clone(),
            _ => Tags::new(),
        }
    }

    fn first_finite(&self, direct: Option<&Value>, key: &str) -> Option<f64> {
        let centred = self.center.as_ref().and_then(|center| center.get(key));
        [direct, centred]
            .into_iter()
            .flatten()
            .find_map(coerce_finite)
    }
}

/// Reads a JSON number or numeric string as a finite float.
fn coerce_finite(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

fn render_part(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => UNKNOWN_PART.to_owned(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}
