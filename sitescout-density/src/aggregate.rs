//! Count sanitised places per hex cell.
//!
//! Places are moved into the grid's longitude frame first. Candidate cells
//! for each place are found through an R-tree of cell envelopes, then
//! confirmed against the exact geometry. A place on a shared
//! edge goes to the lowest-ordinal cell that touches it, so it is counted
//! once.

use geo::Intersects;
use log::debug;
use rstar::{AABB, RTree, RTreeObject};
use sitescout_core::Place;

use crate::hexgrid::HexCell;
use crate::mask::LongitudeFrame;

/// A cell together with the number of places assigned to it.
#[derive(Debug, Clone, PartialEq)]
pub struct CountedCell {
    /// The grid cell.
    pub cell: HexCell,
    /// Places assigned to the cell.
    pub count: usize,
}

/// Result of the counting pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Aggregation {
    /// Cells in generation order.
    pub cells: Vec<CountedCell>,
    /// Largest count over all cells, 0 when there are none.
    pub max_count: usize,
    /// Places that fell inside some cell.
    pub assigned: usize,
}

impl Aggregation {
    /// Cells with at least one place.
    pub fn non_empty(&self) -> impl Iterator<Item = &CountedCell> {
        self.cells.iter().filter(|cell| cell.count > 0)
    }
}

/// R-tree entry pointing back at a cell by ordinal.
#[derive(Debug, Clone)]
struct CellEnvelope {
    ordinal: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for CellEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

fn index_cells(cells: &[HexCell]) -> RTree<CellEnvelope> {
    let entries = cells
        .iter()
        .filter_map(|cell| {
            let rect = cell.bounds()?;
            Some(CellEnvelope {
                ordinal: cell.ordinal,
                envelope: AABB::from_corners(
                    [rect.min().x, rect.min().y],
                    [rect.max().x, rect.max().y],
                ),
            })
        })
        .collect();
    RTree::bulk_load(entries)
}

/// Count `places` into `cells`.
///
/// `cells` must be in generation order with `ordinal == index`, as returned
/// by [`crate::build_hex_grid`], and expressed in `frame`.
#[must_use]
pub fn aggregate_points(
    cells: Vec<HexCell>,
    places: &[Place],
    frame: LongitudeFrame,
) -> Aggregation {
    let index = index_cells(&cells);
    let mut counts = vec![0_usize; cells.len()];
    let mut assigned = 0;

    for place in places {
        let point = frame.point(place.point());
        let probe = AABB::from_point([point.x(), point.y()]);
        let owner = index
            .locate_in_envelope_intersecting(&probe)
            .filter(|entry| {
                cells
                    .get(entry.ordinal)
                    .is_some_and(|cell| cell.geometry.intersects(&point))
            })
            .map(|entry| entry.ordinal)
            .min();
        if let Some(slot) = owner.and_then(|ordinal| counts.get_mut(ordinal)) {
            *slot += 1;
            assigned += 1;
        }
    }

    let max_count = counts.iter().copied().max().unwrap_or(0);
    debug!(
        "assigned {assigned} of {} places across {} cells, max {max_count}",
        places.len(),
        cells.len()
    );
    Aggregation {
        cells: cells
            .into_iter()
            .zip(counts)
            .map(|(cell, count)| CountedCell { cell, count })
            .collect(),
        max_count,
        assigned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{LineString, MultiPolygon, Polygon};
    use rstest::{fixture, rstest};
    use sitescout_core::{PlaceId, Tags};

    fn square(ordinal: usize, x0: f64, y0: f64) -> HexCell {
        let ring = LineString::from(vec![
            (x0, y0),
            (x0 + 1.0, y0),
            (x0 + 1.0, y0 + 1.0),
            (x0, y0 + 1.0),
        ]);
        HexCell {
            ordinal,
            geometry: MultiPolygon::new(vec![Polygon::new(ring, Vec::new())]),
        }
    }

    fn place_at(id: i64, longitude: f64, latitude: f64) -> Place {
        Place {
            id: PlaceId::Numeric(id),
            name: "p".into(),
            category: "cafe".into(),
            latitude,
            longitude,
            tags: Tags::new(),
        }
    }

    #[fixture]
    fn frame() -> LongitudeFrame {
        LongitudeFrame::new(1.5)
    }

    #[fixture]
    fn cells() -> Vec<HexCell> {
        vec![square(0, 0.0, 0.0), square(1, 1.0, 0.0), square(2, 2.0, 0.0)]
    }

    fn counts(aggregation: &Aggregation) -> Vec<usize> {
        aggregation.cells.iter().map(|cell| cell.count).collect()
    }

    #[rstest]
    fn counts_interior_points(cells: Vec<HexCell>, frame: LongitudeFrame) {
        let places = [
            place_at(1, 0.5, 0.5),
            place_at(2, 2.5, 0.5),
            place_at(3, 2.2, 0.1),
        ];
        let aggregation = aggregate_points(cells, &places, frame);
        assert_eq!(counts(&aggregation), vec![1, 0, 2]);
        assert_eq!(aggregation.max_count, 2);
        assert_eq!(aggregation.assigned, 3);
    }

    #[rstest]
    fn shared_edge_goes_to_lowest_ordinal(cells: Vec<HexCell>, frame: LongitudeFrame) {
        let places = [place_at(1, 1.0, 0.5), place_at(2, 2.0, 1.0)];
        let aggregation = aggregate_points(cells, &places, frame);
        assert_eq!(counts(&aggregation), vec![1, 1, 0]);
    }

    #[rstest]
    fn ignores_points_outside_every_cell(cells: Vec<HexCell>, frame: LongitudeFrame) {
        let aggregation = aggregate_points(cells, &[place_at(1, 10.0, 10.0)], frame);
        assert_eq!(aggregation.max_count, 0);
        assert_eq!(aggregation.assigned, 0);
        assert_eq!(aggregation.non_empty().count(), 0);
    }

    #[rstest]
    fn empty_grid_has_zero_max(frame: LongitudeFrame) {
        let aggregation = aggregate_points(Vec::new(), &[place_at(1, 0.5, 0.5)], frame);
        assert!(aggregation.cells.is_empty());
        assert_eq!(aggregation.max_count, 0);
    }

    #[rstest]
    fn places_across_the_antimeridian_join_the_frame() {
        let cells = vec![square(0, 179.5, 0.0), square(1, 180.5, 0.0)];
        let places = [place_at(1, 179.9, 0.5), place_at(2, -179.2, 0.5)];
        let aggregation = aggregate_points(cells, &places, LongitudeFrame::new(180.0));
        assert_eq!(counts(&aggregation), vec![1, 1]);
        assert_eq!(aggregation.assigned, 2);
    }
}
