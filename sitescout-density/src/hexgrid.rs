//! Flat-topped hexagonal tiling clipped to a [`RadiusMask`].
//!
//! Kilometres are converted to degrees with haversine spans measured along
//! the centre lines of the mask's bounding box. Hexagons are generated
//! column by column from the south-west corner, odd columns shifted half a
//! row south, and clipped to the mask. Cells whose intersection with the
//! mask is empty are dropped; the survivors are numbered in generation
//! order.

use geo::{
    Area, BooleanOps, BoundingRect, Coord, Distance, Haversine, Intersects, LineString,
    MultiPolygon, Point, Polygon, Rect,
};
use log::debug;

use crate::error::GridError;
use crate::mask::RadiusMask;

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// One clipped hexagon of the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct HexCell {
    /// Zero-based position in generation order.
    pub ordinal: usize,
    /// Cell geometry; several parts only when clipping split the hexagon.
    pub geometry: MultiPolygon,
}

impl HexCell {
    /// Public label `H<n>` with `n = ordinal + 1`.
    #[must_use]
    pub fn label(&self) -> String {
        cell_label(self.ordinal)
    }

    /// Bounding box of the cell, if it has any coordinates.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        self.geometry.bounding_rect()
    }
}

/// Label for the cell at `ordinal`.
#[must_use]
pub fn cell_label(ordinal: usize) -> String {
    format!("H{}", ordinal + 1)
}

/// Degree-space layout derived from the mask box and the cell size.
#[derive(Debug, Clone, Copy)]
struct Layout {
    /// Horizontal centre-to-vertex radius in degrees of longitude.
    rx: f64,
    /// Vertical centre-to-vertex radius in degrees of latitude.
    ry: f64,
    columns: usize,
    rows: usize,
    west: f64,
    south: f64,
}

impl Layout {
    fn new(bounds: Rect, cell_km: f64) -> Option<Self> {
        let (min, max) = (bounds.min(), bounds.max());
        let mid_lat = (min.y + max.y) / 2.0;
        let mid_lon = (min.x + max.x) / 2.0;
        let x_span_km = Haversine.distance(Point::new(min.x, mid_lat), Point::new(max.x, mid_lat))
            / 1000.0;
        let y_span_km = Haversine.distance(Point::new(mid_lon, min.y), Point::new(mid_lon, max.y))
            / 1000.0;
        if !(x_span_km > 0.0 && y_span_km > 0.0) {
            return None;
        }

        let rx = cell_km * bounds.width() / x_span_km;
        let ry = cell_km * bounds.height() / y_span_km;
        let column_step = 1.5 * rx;
        let row_step = SQRT_3 * ry;
        Some(Self {
            rx,
            ry,
            columns: steps(bounds.width(), column_step)?,
            rows: steps(bounds.height(), row_step)?,
            west: min.x,
            south: min.y,
        })
    }

    const fn centre(&self, column: usize, row: usize) -> Coord {
        let row_step = SQRT_3 * self.ry;
        let offset = if column % 2 == 1 { row_step / 2.0 } else { 0.0 };
        Coord {
            x: self.west + as_f64(column) * 1.5 * self.rx,
            y: self.south + as_f64(row) * row_step - offset,
        }
    }

    fn hexagon(&self, centre: Coord) -> Polygon {
        let ring: Vec<Coord> = (0..6_u32)
            .map(|k| {
                let angle = f64::from(k * 60).to_radians();
                Coord {
                    x: centre.x + self.rx * angle.cos(),
                    y: centre.y + self.ry * angle.sin(),
                }
            })
            .collect();
        Polygon::new(LineString::from(ring), Vec::new())
    }
}

/// Number of steps of `step` needed to cross `extent`, plus one spare on
/// each side so the tiling always covers the box.
fn steps(extent: f64, step: f64) -> Option<usize> {
    let count = (extent / step).ceil();
    if !count.is_finite() || count < 0.0 || count > 1.0e6 {
        return None;
    }
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "count is a small non-negative whole number"
    )]
    let count = count as usize;
    Some(count + 2)
}

#[expect(
    clippy::cast_precision_loss,
    reason = "grid indices stay far below 2^52"
)]
const fn as_f64(index: usize) -> f64 {
    index as f64
}

/// Tile `mask` with hexagons whose side is `cell_km` kilometres.
///
/// # Errors
///
/// Returns [`GridError::InvalidCellSize`] unless `cell_km` is positive and
/// finite, and [`GridError::DegenerateMask`] when the mask has no extent or
/// the cell size is too small for the mask.
pub fn build_hex_grid(mask: &RadiusMask, cell_km: f64) -> Result<Vec<HexCell>, GridError> {
    if !(cell_km.is_finite() && cell_km > 0.0) {
        return Err(GridError::InvalidCellSize(cell_km));
    }
    let bounds = mask.bounds()?;
    let layout = Layout::new(bounds, cell_km).ok_or(GridError::DegenerateMask {
        latitude: mask.origin().latitude,
        longitude: mask.origin().longitude,
    })?;

    let centre_point = mask.origin().point();
    // Any point of a hexagon lies within one side length of its centre; the
    // extra half side absorbs the distortion of the degree conversion.
    let reach_m = (mask.radius_km() + 1.5 * cell_km) * 1000.0;
    let boundary = mask.polygon();

    let mut cells = Vec::new();
    for column in 0..=layout.columns {
        for row in 0..=layout.rows {
            let centre = layout.centre(column, row);
            if Haversine.distance(centre_point, Point::from(centre)) > reach_m {
                continue;
            }
            let hexagon = layout.hexagon(centre);
            let Some(geometry) = clip(&hexagon, boundary) else {
                continue;
            };
            cells.push(HexCell {
                ordinal: cells.len(),
                geometry,
            });
        }
    }

    debug!(
        "built {} hex cells of {cell_km} km within {} km",
        cells.len(),
        mask.radius_km()
    );
    Ok(cells)
}

/// Intersect a hexagon with the mask. Hexagons wholly inside the convex mask
/// are kept as-is.
fn clip(hexagon: &Polygon, mask: &Polygon) -> Option<MultiPolygon> {
    let inside = hexagon
        .exterior()
        .coords()
        .all(|coord| mask.intersects(coord));
    if inside {
        return Some(MultiPolygon::new(vec![hexagon.clone()]));
    }

    let clipped: MultiPolygon = hexagon
        .intersection(mask)
        .into_iter()
        .filter(|part| part.unsigned_area() > 0.0)
        .collect();
    (!clipped.0.is_empty()).then_some(clipped)
}
