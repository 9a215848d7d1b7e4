//! Pipeline entry point and GeoJSON response assembly.

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue};
use log::debug;
use serde::{Deserialize, Serialize};
use sitescout_core::{Origin, Place};

use crate::aggregate::aggregate_points;
use crate::error::GridError;
use crate::heatmap::{HeatmapPoint, heatmap_points};
use crate::hexgrid::build_hex_grid;
use crate::mask::RadiusMask;
use crate::rank::{TOP_TILE_LIMIT, TopTile, top_tiles};
use crate::score::{ScoredCell, score_cells};

/// Scored grid for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityGrid {
    /// Cells in generation order.
    pub cells: Vec<ScoredCell>,
    /// Largest cell count, 0 when there are no cells or no hits.
    pub max_count: usize,
}

impl DensityGrid {
    /// Number of cells holding at least one place.
    #[must_use]
    pub fn non_empty_cells(&self) -> usize {
        self.cells.iter().filter(|cell| cell.count > 0).count()
    }
}

/// Build, count and score a hex grid around `origin`.
///
/// # Errors
///
/// Returns [`GridError`] when the radius or cell size is unusable, the
/// circle reaches a pole or the mask degenerates.
///
/// Cell geometry is expressed in the mask's longitude frame, so grids near
/// the antimeridian may carry longitudes beyond `±180`.
///
/// # Examples
///
/// ```
/// use sitescout_core::Origin;
/// use sitescout_density::aggregate_density;
///
/// let origin = Origin { latitude: 12.97, longitude: 77.59 };
/// let grid = aggregate_density(origin, 1.0, 0.3, &[])?;
/// assert!(!grid.cells.is_empty());
/// assert_eq!(grid.max_count, 0);
/// # Ok::<(), sitescout_density::GridError>(())
/// ```
pub fn aggregate_density(
    origin: Origin,
    radius_km: f64,
    cell_km: f64,
    places: &[Place],
) -> Result<DensityGrid, GridError> {
    let mask = RadiusMask::new(origin, radius_km)?;
    let cells = build_hex_grid(&mask, cell_km)?;
    let aggregation = aggregate_points(cells, places, mask.frame());
    let max_count = aggregation.max_count;
    Ok(DensityGrid {
        cells: score_cells(aggregation),
        max_count,
    })
}

/// Aggregate figures describing a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DensityMetadata {
    /// Sanitised places returned by the source.
    pub total_count: usize,
    /// Largest cell count.
    pub max_count: usize,
    /// Search radius in kilometres.
    pub radius_km: f64,
    /// Hexagon side in kilometres.
    pub cell_km: f64,
}

/// Response body of a competitor-density request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DensityReport {
    /// Every cell with `{id, count, score}` properties.
    pub tiles: FeatureCollection,
    /// Sanitised places.
    pub points: Vec<Place>,
    /// Busiest cells with an extra `rank` property.
    pub top_tiles: Vec<Feature>,
    /// Centroids of non-empty cells with `{weight, score, id}` properties.
    pub heatmap_points: FeatureCollection,
    /// Summary figures.
    pub metadata: DensityMetadata,
}

impl DensityReport {
    /// Assemble the response from a scored grid.
    #[must_use]
    pub fn new(grid: &DensityGrid, points: Vec<Place>, radius_km: f64, cell_km: f64) -> Self {
        let tiles = grid.cells.iter().map(|cell| tile_feature(cell, None)).collect();
        let top = top_tiles(&grid.cells, TOP_TILE_LIMIT)
            .iter()
            .map(|tile: &TopTile| tile_feature(&tile.cell, Some(tile.rank)))
            .collect();
        let heat = heatmap_points(&grid.cells)
            .iter()
            .map(heatmap_feature)
            .collect();

        debug!(
            "density report: {} tiles, {} non-empty, max {}",
            grid.cells.len(),
            grid.non_empty_cells(),
            grid.max_count
        );
        Self {
            tiles: collection(tiles),
            metadata: DensityMetadata {
                total_count: points.len(),
                max_count: grid.max_count,
                radius_km,
                cell_km,
            },
            points,
            top_tiles: top,
            heatmap_points: collection(heat),
        }
    }
}

const fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

const fn feature(geometry: Geometry, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn tile_feature(cell: &ScoredCell, rank: Option<usize>) -> Feature {
    let value = match cell.geometry.0.as_slice() {
        [single] => geojson::Value::from(single),
        _ => geojson::Value::from(&cell.geometry),
    };
    let mut properties = JsonObject::new();
    properties.insert("id".to_owned(), JsonValue::from(cell.label.clone()));
    properties.insert("count".to_owned(), JsonValue::from(cell.count));
    properties.insert("score".to_owned(), JsonValue::from(cell.score));
    if let Some(rank) = rank {
        properties.insert("rank".to_owned(), JsonValue::from(rank));
    }
    feature(Geometry::new(value), properties)
}

fn heatmap_feature(point: &HeatmapPoint) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("weight".to_owned(), JsonValue::from(point.weight));
    properties.insert("score".to_owned(), JsonValue::from(point.score));
    properties.insert("id".to_owned(), JsonValue::from(point.label.clone()));
    feature(Geometry::new(geojson::Value::from(&point.point)), properties)
}
