//! Upstream data access for the SiteScout engine.
//!
//! Responsibilities:
//! - Render Overpass QL queries from category filters.
//! - Decode Overpass responses into raw elements.
//! - Provide an HTTP [`sitescout_core::PoiSource`] backed by `reqwest`.
//!
//! Boundaries:
//! - Do not encode domain rules (live in `sitescout-core`).
//! - Never retry; failures are reported to the caller unchanged.
//!
//! Invariants:
//! - Thread-safe; one client is shared across concurrent requests.
//! - No global mutable state.

pub mod overpass;

pub use overpass::{
    DEFAULT_ENDPOINT, DEFAULT_USER_AGENT, OverpassConfig, OverpassPoiSource, ProviderBuildError,
    render_query,
};
