//! Overpass API client.
//!
//! [`OverpassPoiSource`] implements [`sitescout_core::PoiSource`] by POSTing
//! an Overpass QL query to an interpreter endpoint and decoding the
//! `elements` array of the JSON answer.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use sitescout_core::{CategoryFilter, Origin, PoiQuery, PoiSource};
//! use sitescout_data::{OverpassConfig, OverpassPoiSource};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = OverpassConfig::default()
//!     .with_timeout(Duration::from_secs(10))
//!     .with_user_agent("my-app/1.0");
//! let source = OverpassPoiSource::with_config(config)?;
//!
//! let filters = vec![CategoryFilter::parse("amenity=cafe").ok_or("bad filter")?];
//! let origin = Origin::new(12.97, 77.59)?;
//! let query = PoiQuery::from_radius_km(origin, 2.0, filters);
//! let elements = source.fetch_elements(&query).await?;
//! println!("{} elements", elements.len());
//! # Ok(())
//! # }
//! ```

mod provider;
mod query;
mod response;

pub use provider::{
    DEFAULT_ENDPOINT, DEFAULT_USER_AGENT, OverpassConfig, OverpassPoiSource, ProviderBuildError,
};
pub use query::render_query;
pub use response::OverpassResponse;
