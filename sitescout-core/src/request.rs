//! Request bodies and their validated forms.
//!
//! Bodies hold loose JSON values so that validation can report the first
//! offending field by name, in the documented order, instead of failing in
//! the deserialiser. Numbers may arrive as numeric strings.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::place::Origin;

/// Smallest accepted search radius in kilometres.
pub const MIN_RADIUS_KM: f64 = 0.2;
/// Largest accepted search radius in kilometres.
pub const MAX_RADIUS_KM: f64 = 15.0;
/// Radius used when a density request omits `radiusKm`.
pub const DEFAULT_RADIUS_KM: f64 = 2.0;
/// Smallest accepted hexagon side in kilometres.
pub const MIN_CELL_KM: f64 = 0.05;
/// Largest accepted hexagon side in kilometres.
pub const MAX_CELL_KM: f64 = 5.0;
/// Cell size used when a density request omits `cellKm`.
pub const DEFAULT_CELL_KM: f64 = 0.3;
/// Fixed radius of nearby-place lookups, in metres.
pub const NEARBY_RADIUS_M: u32 = 2000;
/// Minimum length of a category entry, in characters.
pub const MIN_CATEGORY_LEN: usize = 3;

/// Validation failures, each naming the offending field.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    /// Field missing or not numeric.
    #[error("{field} must be a number")]
    NotANumber {
        /// Offending field.
        field: &'static str,
    },
    /// Value below the accepted range.
    #[error("{field} must be >= {min}")]
    BelowMinimum {
        /// Offending field.
        field: &'static str,
        /// Inclusive lower bound.
        min: f64,
    },
    /// Value above the accepted range.
    #[error("{field} must be <= {max}")]
    AboveMaximum {
        /// Offending field.
        field: &'static str,
        /// Inclusive upper bound.
        max: f64,
    },
    /// Required list missing or empty.
    #[error("{field} required")]
    Missing {
        /// Offending field.
        field: &'static str,
    },
    /// List present but not made of strings.
    #[error("{field} must be an array of strings")]
    NotStringArray {
        /// Offending field.
        field: &'static str,
    },
    /// An entry was shorter than [`MIN_CATEGORY_LEN`].
    #[error("each {item} must be at least {min} characters")]
    EntryTooShort {
        /// Offending field.
        field: &'static str,
        /// Singular noun for one entry of the field.
        item: &'static str,
        /// Minimum length in characters.
        min: usize,
    },
    /// The search circle would contain a pole, where no longitude frame
    /// can hold the grid.
    #[error("{field} of {radius_km} km reaches the pole from latitude {latitude}")]
    ReachesPole {
        /// Offending field.
        field: &'static str,
        /// Requested radius in kilometres.
        radius_km: f64,
        /// Origin latitude.
        latitude: f64,
    },
}

impl RequestError {
    /// Name of the field that failed validation.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::NotANumber { field }
            | Self::BelowMinimum { field, .. }
            | Self::AboveMaximum { field, .. }
            | Self::Missing { field }
            | Self::NotStringArray { field }
            | Self::EntryTooShort { field, .. }
            | Self::ReachesPole { field, .. } => field,
        }
    }
}

/// Body of a competitor-density request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DensityBody {
    /// Origin latitude.
    #[serde(default)]
    pub latitude: Option<Value>,
    /// Origin longitude.
    #[serde(default)]
    pub longitude: Option<Value>,
    /// `key=value` category filters.
    #[serde(default)]
    pub categories: Option<Value>,
    /// Search radius in kilometres.
    #[serde(default)]
    pub radius_km: Option<Value>,
    /// Hexagon side in kilometres.
    #[serde(default)]
    pub cell_km: Option<Value>,
}

/// Body of a nearby-places request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyBody {
    /// Origin latitude.
    #[serde(default)]
    pub latitude: Option<Value>,
    /// Origin longitude.
    #[serde(default)]
    pub longitude: Option<Value>,
    /// `key=value` category filters.
    #[serde(default)]
    pub categories: Option<Value>,
}

/// Body of a location-scorecard request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorecardBody {
    /// Candidate latitude.
    #[serde(default)]
    pub latitude: Option<Value>,
    /// Candidate longitude.
    #[serde(default)]
    pub longitude: Option<Value>,
    /// Filters for places that attract custom.
    #[serde(default, alias = "plusCategories")]
    pub targets: Option<Value>,
    /// Filters for competing places.
    #[serde(default, alias = "competitorCategories")]
    pub competitors: Option<Value>,
}

/// Validated competitor-density request.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityRequest {
    /// Grid centre.
    pub origin: Origin,
    /// Raw category entries; malformed filters are skipped later.
    pub categories: Vec<String>,
    /// Search radius in kilometres.
    pub radius_km: f64,
    /// Hexagon side in kilometres.
    pub cell_km: f64,
}

impl DensityRequest {
    /// Validates and constructs a [`DensityRequest`].
    ///
    /// # Errors
    ///
    /// Returns the first failing field in the order latitude, longitude,
    /// categories, `radiusKm`, `cellKm`. A radius that reaches a pole from
    /// the origin fails as `radiusKm`.
    pub fn new(
        latitude: f64,
        longitude: f64,
        categories: Vec<String>,
        radius_km: f64,
        cell_km: f64,
    ) -> Result<Self, RequestError> {
        let origin = checked_origin(latitude, longitude)?;
        check_entries("categories", "category", &categories, false)?;
        let radius_km = in_range("radiusKm", radius_km, MIN_RADIUS_KM, MAX_RADIUS_KM)?;
        if radius_km >= origin.pole_distance_km() {
            return Err(RequestError::ReachesPole {
                field: "radiusKm",
                radius_km,
                latitude,
            });
        }
        let cell_km = in_range("cellKm", cell_km, MIN_CELL_KM, MAX_CELL_KM)?;
        Ok(Self {
            origin,
            categories,
            radius_km,
            cell_km,
        })
    }
}

impl TryFrom<DensityBody> for DensityRequest {
    type Error = RequestError;

    fn try_from(body: DensityBody) -> Result<Self, Self::Error> {
        let latitude = number("latitude", body.latitude.as_ref())?;
        let longitude = number("longitude", body.longitude.as_ref())?;
        let categories = string_list("categories", body.categories.as_ref())?;
        let radius_km = number_or("radiusKm", body.radius_km.as_ref(), DEFAULT_RADIUS_KM)?;
        let cell_km = number_or("cellKm", body.cell_km.as_ref(), DEFAULT_CELL_KM)?;
        Self::new(latitude, longitude, categories, radius_km, cell_km)
    }
}

/// Validated nearby-places request.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyRequest {
    /// Search centre.
    pub origin: Origin,
    /// Raw category entries.
    pub categories: Vec<String>,
}

impl NearbyRequest {
    /// Validates and constructs a [`NearbyRequest`].
    ///
    /// # Errors
    ///
    /// Returns the first failing field in the order latitude, longitude,
    /// categories.
    pub fn new(
        latitude: f64,
        longitude: f64,
        categories: Vec<String>,
    ) -> Result<Self, RequestError> {
        let origin = checked_origin(latitude, longitude)?;
        check_entries("categories", "category", &categories, false)?;
        Ok(Self { origin, categories })
    }

    /// Fixed lookup radius in kilometres.
    #[must_use]
    pub fn radius_km(&self) -> f64 {
        f64::from(NEARBY_RADIUS_M) / 1000.0
    }
}

impl TryFrom<NearbyBody> for NearbyRequest {
    type Error = RequestError;

    fn try_from(body: NearbyBody) -> Result<Self, Self::Error> {
        let latitude = number("latitude", body.latitude.as_ref())?;
        let longitude = number("longitude", body.longitude.as_ref())?;
        let categories = string_list("categories", body.categories.as_ref())?;
        Self::new(latitude, longitude, categories)
    }
}

/// Validated location-scorecard request.
///
/// Either list may be empty; that side then counts as "nothing found".
#[derive(Debug, Clone, PartialEq)]
pub struct ScorecardRequest {
    /// Candidate location.
    pub origin: Origin,
    /// Target category entries.
    pub targets: Vec<String>,
    /// Competitor category entries.
    pub competitors: Vec<String>,
}

impl ScorecardRequest {
    /// Validates and constructs a [`ScorecardRequest`].
    ///
    /// # Errors
    ///
    /// Returns the first failing field in the order latitude, longitude,
    /// targets, competitors.
    pub fn new(
        latitude: f64,
        longitude: f64,
        targets: Vec<String>,
        competitors: Vec<String>,
    ) -> Result<Self, RequestError> {
        let origin = checked_origin(latitude, longitude)?;
        check_entries("targets", "target", &targets, true)?;
        check_entries("competitors", "competitor", &competitors, true)?;
        Ok(Self {
            origin,
            targets,
            competitors,
        })
    }

    /// Fixed lookup radius in kilometres.
    #[must_use]
    pub fn radius_km(&self) -> f64 {
        f64::from(NEARBY_RADIUS_M) / 1000.0
    }
}

impl TryFrom<ScorecardBody> for ScorecardRequest {
    type Error = RequestError;

    fn try_from(body: ScorecardBody) -> Result<Self, Self::Error> {
        let latitude = number("latitude", body.latitude.as_ref())?;
        let longitude = number("longitude", body.longitude.as_ref())?;
        let targets = optional_string_list("targets", body.targets.as_ref())?;
        let competitors = optional_string_list("competitors", body.competitors.as_ref())?;
        Self::new(latitude, longitude, targets, competitors)
    }
}

fn checked_origin(latitude: f64, longitude: f64) -> Result<Origin, RequestError> {
    let latitude = in_range("latitude", latitude, -90.0, 90.0)?;
    let longitude = in_range("longitude", longitude, -180.0, 180.0)?;
    Ok(Origin {
        latitude,
        longitude,
    })
}

fn in_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<f64, RequestError> {
    if !value.is_finite() {
        return Err(RequestError::NotANumber { field });
    }
    if value < min {
        return Err(RequestError::BelowMinimum { field, min });
    }
    if value > max {
        return Err(RequestError::AboveMaximum { field, max });
    }
    Ok(value)
}

fn number(field: &'static str, value: Option<&Value>) -> Result<f64, RequestError> {
    let parsed = match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|number| number.is_finite())
        .ok_or(RequestError::NotANumber { field })
}

fn number_or(field: &'static str, value: Option<&Value>, default: f64) -> Result<f64, RequestError> {
    match value {
        None | Some(Value::Null) => Ok(default),
        Some(_) => number(field, value),
    }
}

fn string_list(field: &'static str, value: Option<&Value>) -> Result<Vec<String>, RequestError> {
    match value {
        None | Some(Value::Null) => Err(RequestError::Missing { field }),
        Some(Value::Array(entries)) => entries
            .iter()
            .map(|entry| {
                entry
                    .as_str()
                    .map(str::to_owned)
                    .ok_or(RequestError::NotStringArray { field })
            })
            .collect(),
        Some(_) => Err(RequestError::NotStringArray { field }),
    }
}

fn optional_string_list(
    field: &'static str,
    value: Option<&Value>,
) -> Result<Vec<String>, RequestError> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(_) => string_list(field, value),
    }
}

fn check_entries(
    field: &'static str,
    item: &'static str,
    entries: &[String],
    allow_empty: bool,
) -> Result<(), RequestError> {
    if entries.is_empty() && !allow_empty {
        return Err(RequestError::Missing { field });
    }
    if entries
        .iter()
        .any(|entry| entry.chars().count() < MIN_CATEGORY_LEN)
    {
        return Err(RequestError::EntryTooShort {
            field,
            item,
            min: MIN_CATEGORY_LEN,
        });
    }
    Ok(())
}
