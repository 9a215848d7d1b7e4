//! Fetch raw POI elements from an upstream data source.
//!
//! The `PoiSource` trait abstracts the Overpass-style query service. Callers
//! describe the search with a [`PoiQuery`] and receive the raw elements the
//! service returned, ready for sanitisation.
//!
//! Errors carry the request URL and transport detail so the HTTP layer can
//! surface them to clients.

mod error;
mod provider;

pub use error::PoiSourceError;
pub use provider::{PoiQuery, PoiSource};
