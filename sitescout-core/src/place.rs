//! Sanitised places and query origins.
//!
//! A [`Place`] is the canonical form of an upstream POI record once its
//! coordinates have been checked and its category derived. Places are built
//! once and never mutated afterwards.

use std::fmt;

use geo::{Coord, Distance, Haversine, Point};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Free-form tags attached to a place, kept exactly as the source sent them.
pub type Tags = Map<String, Value>;

/// Identifier of a place.
///
/// Upstream elements normally carry a numeric id. When it is missing the
/// sanitiser synthesises a textual one from the coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlaceId {
    /// Identifier supplied by the data source.
    Numeric(i64),
    /// Textual identifier, either upstream-provided or synthesised.
    Text(String),
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for PlaceId {
    fn from(value: i64) -> Self {
        Self::Numeric(value)
    }
}

impl From<String> for PlaceId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A sanitised point of interest.
///
/// # Examples
///
/// ```
/// use sitescout_core::{Place, PlaceId, Tags};
///
/// let place = Place {
///     id: PlaceId::Numeric(7),
///     name: "Corner Cafe".into(),
///     category: "cafe".into(),
///     latitude: 12.97,
///     longitude: 77.59,
///     tags: Tags::new(),
/// };
/// assert_eq!(place.location().x, 77.59);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Source identifier or synthesised fallback.
    pub id: PlaceId,
    /// Display name, `"Unknown"` when the source has none.
    pub name: String,
    /// Category derived from the tag preference list.
    pub category: String,
    /// Latitude in WGS84 degrees.
    pub latitude: f64,
    /// Longitude in WGS84 degrees.
    pub longitude: f64,
    /// Raw tags carried over from the source element.
    pub tags: Tags,
}

impl Place {
    /// Position as a `geo` coordinate (`x` = longitude, `y` = latitude).
    #[must_use]
    pub const fn location(&self) -> Coord {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }

    /// Position as a `geo` point.
    #[must_use]
    pub fn point(&self) -> Point {
        Point::from(self.location())
    }
}

/// Errors returned by [`Origin::new`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordinateError {
    /// Latitude was not finite or outside `-90..=90`.
    #[error("latitude {0} is outside -90..=90")]
    Latitude(f64),
    /// Longitude was not finite or outside `-180..=180`.
    #[error("longitude {0} is outside -180..=180")]
    Longitude(f64),
}

/// Centre point of a query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    /// Latitude in WGS84 degrees.
    pub latitude: f64,
    /// Longitude in WGS84 degrees.
    pub longitude: f64,
}

impl Origin {
    /// Validates and constructs an [`Origin`].
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError`] when either component is non-finite or
    /// outside the WGS84 range.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !is_latitude(latitude) {
            return Err(CoordinateError::Latitude(latitude));
        }
        if !is_longitude(longitude) {
            return Err(CoordinateError::Longitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Position as a `geo` point.
    #[must_use]
    pub fn point(&self) -> Point {
        Point::new(self.longitude, self.latitude)
    }

    /// Haversine distance to the nearer pole, in kilometres.
    ///
    /// ```
    /// use sitescout_core::Origin;
    ///
    /// let pole = Origin { latitude: -90.0, longitude: 10.0 };
    /// assert!(pole.pole_distance_km().abs() < 1.0e-9);
    /// ```
    #[must_use]
    pub fn pole_distance_km(&self) -> f64 {
        let pole = Point::new(self.longitude, 90.0_f64.copysign(self.latitude));
        Haversine.distance(self.point(), pole) / 1000.0
    }
}

/// Returns a coordinate when both components are finite WGS84 degrees.
#[must_use]
pub fn validated_coord(latitude: f64, longitude: f64) -> Option<Coord> {
    (is_latitude(latitude) && is_longitude(longitude)).then_some(Coord {
        x: longitude,
        y: latitude,
    })
}

fn is_latitude(value: f64) -> bool {
    value.is_finite() && (-90.0..=90.0).contains(&value)
}

fn is_longitude(value: f64) -> bool {
    value.is_finite() && (-180.0..=180.0).contains(&value)
}
