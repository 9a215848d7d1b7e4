//! Convert raw upstream elements into canonical [`Place`] values.
//!
//! Sanitisation drops elements without a usable position and repeats of an
//! already seen `{type}-{id}` key, keeping encounter order. The seen-set is
//! owned by each call, so concurrent requests never share state.

use std::collections::HashSet;

use log::debug;
use serde_json::Value;

use crate::element::RawElement;
use crate::place::{Place, Tags};

/// Name used when an element carries no `name` tag.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Category used when no preferred tag key is present.
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// Ordered tag keys consulted when deriving a place category.
///
/// The first key holding a usable label wins: a non-empty string, a
/// non-zero number or `true`.
///
/// # Examples
///
/// ```
/// use sitescout_core::{CategoryRules, Tags};
///
/// let rules = CategoryRules::default().with_key("building");
/// let mut tags = Tags::new();
/// tags.insert("building".into(), "retail".into());
/// assert_eq!(rules.categorise(&tags), "retail");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRules {
    keys: Vec<String>,
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self::new(["amenity", "shop", "leisure"])
    }
}

impl CategoryRules {
    /// Build rules from an explicit preference order.
    pub fn new<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Append a lower-priority key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.keys.push(key.into());
        self
    }

    /// Keys in preference order.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Category for `tags`, or [`UNKNOWN_CATEGORY`].
    #[must_use]
    pub fn categorise(&self, tags: &Tags) -> String {
        self.keys
            .iter()
            .find_map(|key| tag_label(tags, key))
            .unwrap_or_else(|| UNKNOWN_CATEGORY.to_owned())
    }
}

fn tag_label(tags: &Tags, key: &str) -> Option<String> {
    match tags.get(key)? {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) if number.as_f64().is_some_and(|value| value.abs() > 0.0) => {
            Some(number.to_string())
        }
        Value::Bool(true) => Some("true".to_owned()),
        _ => None,
    }
}

/// Sanitise elements with the default category rules.
#[must_use]
pub fn sanitize_elements(elements: &[RawElement]) -> Vec<Place> {
    sanitize_with_rules(elements, &CategoryRules::default())
}

/// Sanitise elements, deriving categories from `rules`.
///
/// An element's identity key is recorded only once its coordinates have been
/// accepted, so an invalid first copy does not shadow a valid repeat.
#[must_use]
pub fn sanitize_with_rules(elements: &[RawElement], rules: &CategoryRules) -> Vec<Place> {
    let mut seen = HashSet::new();
    let mut places = Vec::with_capacity(elements.len());

    for (index, element) in elements.iter().enumerate() {
        let Some(location) = element.location() else {
            continue;
        };
        if !seen.insert(element.identity_key()) {
            continue;
        }

        let tags = element.tags();
        let name = tag_label(&tags, "name").unwrap_or_else(|| UNKNOWN_NAME.to_owned());
        places.push(Place {
            id: element.place_id(index, location),
            name,
            category: rules.categorise(&tags),
            latitude: location.y,
            longitude: location.x,
            tags,
        });
    }

    debug!(
        "sanitised {} of {} upstream elements",
        places.len(),
        elements.len()
    );
    places
}
