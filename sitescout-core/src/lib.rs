//! Core domain types for the SiteScout engine.
//!
//! This crate owns everything that does not depend on a transport or a
//! geometry pipeline: sanitised places, request validation, category
//! filters, the [`PoiSource`] abstraction over upstream POI services, and
//! the nearest-distance location scorecard.
//!
//! Constructors and conversions return `Result` so that invalid input is
//! rejected at the boundary with the name of the offending field.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod category;
pub mod element;
pub mod place;
pub mod request;
pub mod sanitize;
pub mod scorecard;
pub mod source;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use category::{CategoryError, CategoryFilter, parse_filters};
pub use element::RawElement;
pub use place::{CoordinateError, Origin, Place, PlaceId, Tags, validated_coord};
pub use request::{
    DensityBody, DensityRequest, NearbyBody, NearbyRequest, RequestError, ScorecardBody,
    ScorecardRequest,
};
pub use sanitize::{CategoryRules, sanitize_elements, sanitize_with_rules};
pub use scorecard::{
    Adjustment, LocationScore, NearestPlace, PlaceDistance, nearest_place, score_location,
};
pub use source::{PoiQuery, PoiSource, PoiSourceError};
