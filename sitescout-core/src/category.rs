//! `key=value` category filters used to build upstream queries.

use std::fmt;

use thiserror::Error;

/// A single tag filter such as `amenity=cafe`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryFilter {
    /// Tag key, e.g. `amenity`.
    pub key: String,
    /// Tag value, e.g. `cafe`.
    pub value: String,
}

impl CategoryFilter {
    /// Parse a `key=value` string.
    ///
    /// Returns `None` unless the input contains exactly one `=` with a
    /// non-empty key and value on either side. Surrounding whitespace is
    /// trimmed from both parts.
    ///
    /// # Examples
    ///
    /// ```
    /// use sitescout_core::CategoryFilter;
    ///
    /// let filter = CategoryFilter::parse("shop=bakery").expect("valid filter");
    /// assert_eq!(filter.key, "shop");
    /// assert!(CategoryFilter::parse("badformat").is_none());
    /// assert!(CategoryFilter::parse("a=b=c").is_none());
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split('=');
        let key = parts.next()?.trim();
        let value = parts.next()?.trim();
        if parts.next().is_some() || key.is_empty() || value.is_empty() {
            return None;
        }
        Some(Self {
            key: key.to_owned(),
            value: value.to_owned(),
        })
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Errors returned by [`parse_filters`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CategoryError {
    /// No entry survived parsing.
    #[error("Invalid categories provided")]
    NoValidFilters,
}

/// Parse every entry, skipping malformed ones.
///
/// # Errors
///
/// Returns [`CategoryError::NoValidFilters`] when nothing usable remains.
pub fn parse_filters<S: AsRef<str>>(raw: &[S]) -> Result<Vec<CategoryFilter>, CategoryError> {
    let filters: Vec<_> = raw
        .iter()
        .filter_map(|entry| CategoryFilter::parse(entry.as_ref()))
        .collect();
    if filters.is_empty() {
        return Err(CategoryError::NoValidFilters);
    }
    Ok(filters)
}
