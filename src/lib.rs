//! Facade crate for the SiteScout competitor density engine.
//!
//! This crate re-exports the request and place types, the density pipeline
//! and the engine service, and exposes the Overpass source behind a feature
//! flag.

#![forbid(unsafe_code)]

pub use sitescout_core::{
    CategoryError, CategoryFilter, DensityRequest, LocationScore, NearbyRequest, Origin, Place,
    PlaceId, PoiQuery, PoiSource, PoiSourceError, RawElement, RequestError, ScorecardRequest,
};

pub use sitescout_density::{
    DensityReport, ErrorClass, GridError, NearbyPlaces, SiteError, SiteService, aggregate_density,
};

#[cfg(feature = "overpass")]
pub use sitescout_data::{OverpassConfig, OverpassPoiSource, ProviderBuildError};
