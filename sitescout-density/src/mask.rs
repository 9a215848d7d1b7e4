//! Circular search boundary approximated by a geodesic polygon.
//!
//! Ring vertices and every place tested against the grid are expressed in a
//! [`LongitudeFrame`] centred on the origin, so a circle crossing the
//! antimeridian stays one contiguous polygon. Longitudes in that frame may
//! fall outside `-180..=180`.

use geo::{BoundingRect, Destination, Haversine, LineString, Point, Polygon, Rect};
use sitescout_core::Origin;

use crate::error::GridError;

/// Number of segments in the mask ring.
pub const MASK_STEPS: u32 = 64;

/// Longitudes shifted by whole turns to lie within 180 degrees of a
/// reference meridian.
///
/// ```
/// use sitescout_density::LongitudeFrame;
///
/// let frame = LongitudeFrame::new(179.99);
/// assert!((frame.longitude(-179.99) - 180.01).abs() < 1.0e-9);
/// assert_eq!(frame.longitude(179.0), 179.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LongitudeFrame {
    reference: f64,
}

impl LongitudeFrame {
    /// Frame centred on `reference` degrees of longitude.
    #[must_use]
    pub const fn new(reference: f64) -> Self {
        Self { reference }
    }

    /// `longitude` expressed in this frame.
    #[must_use]
    pub const fn longitude(self, longitude: f64) -> f64 {
        let delta = longitude - self.reference;
        if delta > 180.0 {
            longitude - 360.0
        } else if delta < -180.0 {
            longitude + 360.0
        } else {
            longitude
        }
    }

    /// `point` with its longitude expressed in this frame.
    #[must_use]
    pub fn point(self, point: Point) -> Point {
        Point::new(self.longitude(point.x()), point.y())
    }
}

/// Closed polygon approximating a circle of `radius_km` around an origin.
///
/// Vertices are haversine destination points at evenly spaced bearings, so
/// every vertex lies exactly `radius_km` from the origin.
///
/// # Examples
///
/// ```
/// use geo::Intersects;
/// use sitescout_core::Origin;
/// use sitescout_density::RadiusMask;
///
/// let origin = Origin { latitude: 12.97, longitude: 77.59 };
/// let mask = RadiusMask::new(origin, 2.0)?;
/// assert!(mask.polygon().intersects(&origin.point()));
/// assert_eq!(mask.polygon().exterior().0.len(), 65);
/// # Ok::<(), sitescout_density::GridError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RadiusMask {
    origin: Origin,
    radius_km: f64,
    polygon: Polygon,
}

impl RadiusMask {
    /// Build the mask.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidRadius`] unless `radius_km` is positive and
    /// finite, and [`GridError::ReachesPole`] when the circle would contain
    /// a pole.
    pub fn new(origin: Origin, radius_km: f64) -> Result<Self, GridError> {
        if !(radius_km.is_finite() && radius_km > 0.0) {
            return Err(GridError::InvalidRadius(radius_km));
        }
        if radius_km >= origin.pole_distance_km() {
            return Err(GridError::ReachesPole {
                latitude: origin.latitude,
                radius_km,
            });
        }
        let centre = origin.point();
        let frame = LongitudeFrame::new(origin.longitude);
        let metres = radius_km * 1000.0;
        let step = 360.0 / f64::from(MASK_STEPS);
        let ring: Vec<Point> = (0..MASK_STEPS)
            .map(|i| frame.point(Haversine.destination(centre, -f64::from(i) * step, metres)))
            .collect();
        // `Polygon::new` closes the ring.
        let polygon = Polygon::new(LineString::from(ring), Vec::new());
        Ok(Self {
            origin,
            radius_km,
            polygon,
        })
    }

    /// Mask centre.
    #[must_use]
    pub const fn origin(&self) -> Origin {
        self.origin
    }

    /// Longitude frame of the polygon.
    #[must_use]
    pub const fn frame(&self) -> LongitudeFrame {
        LongitudeFrame::new(self.origin.longitude)
    }

    /// Mask radius in kilometres.
    #[must_use]
    pub const fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// Mask polygon in longitude/latitude degrees, in [`Self::frame`].
    #[must_use]
    pub const fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    /// Bounding box of the mask.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::DegenerateMask`] when the box is missing or has
    /// no width or height.
    pub fn bounds(&self) -> Result<Rect, GridError> {
        self.polygon
            .bounding_rect()
            .filter(|rect| rect.width() > 0.0 && rect.height() > 0.0)
            .ok_or(GridError::DegenerateMask {
                latitude: self.origin.latitude,
                longitude: self.origin.longitude,
            })
    }
}
