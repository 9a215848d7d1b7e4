//! Centroid point layer for non-empty cells.

use geo::{Centroid, Point};

use crate::score::ScoredCell;

/// Weighted point at the centroid of a non-empty cell.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapPoint {
    /// Cell centroid.
    pub point: Point,
    /// Cell count.
    pub weight: usize,
    /// Cell score.
    pub score: u8,
    /// Cell label.
    pub label: String,
}

/// One point per non-empty cell, in generation order.
#[must_use]
pub fn heatmap_points(cells: &[ScoredCell]) -> Vec<HeatmapPoint> {
    cells
        .iter()
        .filter(|cell| cell.count > 0)
        .filter_map(|cell| {
            let point = cell.geometry.centroid()?;
            Some(HeatmapPoint {
                point,
                weight: cell.count,
                score: cell.score,
                label: cell.label.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{LineString, MultiPolygon, Polygon};
    use rstest::rstest;

    fn cell(ordinal: usize, count: usize, x0: f64) -> ScoredCell {
        let ring = LineString::from(vec![(x0, 0.0), (x0 + 2.0, 0.0), (x0 + 2.0, 2.0), (x0, 2.0)]);
        ScoredCell {
            ordinal,
            label: format!("H{}", ordinal + 1),
            count,
            score: if count > 0 { 100 } else { 0 },
            geometry: MultiPolygon::new(vec![Polygon::new(ring, Vec::new())]),
        }
    }

    #[rstest]
    fn emits_centroids_of_non_empty_cells_in_order() {
        let points = heatmap_points(&[cell(0, 3, 0.0), cell(1, 0, 2.0), cell(2, 1, 4.0)]);
        let labels: Vec<_> = points.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["H1", "H3"]);
        assert_eq!(points.first().map(|p| p.point), Some(Point::new(1.0, 1.0)));
        assert_eq!(points.first().map(|p| p.weight), Some(3));
    }

    #[rstest]
    fn empty_grid_has_no_points() {
        assert!(heatmap_points(&[cell(0, 0, 0.0)]).is_empty());
    }
}
