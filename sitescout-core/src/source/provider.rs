//! POI source trait and the query it answers.

use std::sync::Arc;

use async_trait::async_trait;

use crate::category::CategoryFilter;
use crate::element::RawElement;
use crate::place::Origin;

use super::error::PoiSourceError;

/// A radius search for places matching any of `filters`.
#[derive(Debug, Clone, PartialEq)]
pub struct PoiQuery {
    /// Search centre.
    pub origin: Origin,
    /// Search radius in whole metres.
    pub radius_m: u32,
    /// Tag filters; an element matching any one is returned.
    pub filters: Vec<CategoryFilter>,
}

impl PoiQuery {
    /// Build a query from a radius in kilometres, rounded to whole metres.
    ///
    /// # Examples
    ///
    /// ```
    /// use sitescout_core::{CategoryFilter, Origin, PoiQuery};
    ///
    /// let origin = Origin { latitude: 51.5, longitude: -0.1 };
    /// let filters = vec![CategoryFilter::parse("amenity=cafe").expect("filter")];
    /// let query = PoiQuery::from_radius_km(origin, 1.2345, filters);
    /// assert_eq!(query.radius_m, 1235);
    /// ```
    #[must_use]
    pub fn from_radius_km(origin: Origin, radius_km: f64, filters: Vec<CategoryFilter>) -> Self {
        let metres = (radius_km * 1000.0).round().clamp(0.0, f64::from(u32::MAX));
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "value is rounded and clamped to the u32 range"
        )]
        let radius_m = metres as u32;
        Self {
            origin,
            radius_m,
            filters,
        }
    }
}

/// Fetch raw elements for a [`PoiQuery`].
///
/// Implementations must not retry; a failed call is reported as-is.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use sitescout_core::{PoiQuery, PoiSource, PoiSourceError, RawElement};
///
/// struct Empty;
///
/// #[async_trait]
/// impl PoiSource for Empty {
///     async fn fetch_elements(
///         &self,
///         _query: &PoiQuery,
///     ) -> Result<Vec<RawElement>, PoiSourceError> {
///         Ok(Vec::new())
///     }
/// }
/// ```
#[async_trait]
pub trait PoiSource: Send + Sync {
    /// Return every element the upstream service matched.
    async fn fetch_elements(&self, query: &PoiQuery) -> Result<Vec<RawElement>, PoiSourceError>;
}

#[async_trait]
impl<T: PoiSource + ?Sized> PoiSource for Arc<T> {
    async fn fetch_elements(&self, query: &PoiQuery) -> Result<Vec<RawElement>, PoiSourceError> {
        (**self).fetch_elements(query).await
    }
}
