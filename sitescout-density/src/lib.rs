//! Competitor density aggregation for the SiteScout engine.
//!
//! The pipeline runs in explicit passes over request-scoped data:
//!
//! 1. [`RadiusMask`] approximates the search circle with a 64-segment
//!    polygon.
//! 2. [`build_hex_grid`] tiles the mask's bounding box with flat-topped
//!    hexagons and clips them to the mask.
//! 3. [`aggregate_points`] counts sanitised places per cell through an
//!    R-tree of cell envelopes.
//! 4. [`score_cells`] normalises counts against the busiest cell.
//! 5. [`heatmap_points`] and [`top_tiles`] derive the point layer and the
//!    ranking, and [`DensityReport`] assembles the GeoJSON response.
//!
//! [`SiteService`] wires the pipeline to a [`sitescout_core::PoiSource`] and
//! also serves nearby-place lookups and location scorecards.

#![forbid(unsafe_code)]

pub mod aggregate;
pub mod error;
pub mod heatmap;
pub mod hexgrid;
pub mod mask;
pub mod rank;
pub mod report;
pub mod score;
pub mod service;

pub use aggregate::{Aggregation, CountedCell, aggregate_points};
pub use error::{ErrorClass, GridError, SiteError};
pub use heatmap::{HeatmapPoint, heatmap_points};
pub use hexgrid::{HexCell, build_hex_grid, cell_label};
pub use mask::{LongitudeFrame, MASK_STEPS, RadiusMask};
pub use rank::{TOP_TILE_LIMIT, TopTile, top_tiles};
pub use report::{DensityGrid, DensityMetadata, DensityReport, aggregate_density};
pub use score::{MAX_SCORE, ScoredCell, normalise_score, score_cells};
pub use service::{NearbyPlaces, SiteService};
