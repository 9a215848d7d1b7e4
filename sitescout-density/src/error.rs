//! Error types for grid construction and request orchestration.

use sitescout_core::{CategoryError, PoiSourceError};
use thiserror::Error;

/// Errors raised while building the mask or hex grid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// Radius was not a positive finite number of kilometres.
    #[error("radius must be a positive number of kilometres, got {0}")]
    InvalidRadius(f64),
    /// Cell size was not a positive finite number of kilometres.
    #[error("cell size must be a positive number of kilometres, got {0}")]
    InvalidCellSize(f64),
    /// The circle would contain a pole.
    #[error("radius of {radius_km} km reaches the pole from latitude {latitude}")]
    ReachesPole {
        /// Origin latitude.
        latitude: f64,
        /// Requested radius in kilometres.
        radius_km: f64,
    },
    /// The mask polygon has no usable extent.
    #[error("radius mask around ({latitude}, {longitude}) is degenerate")]
    DegenerateMask {
        /// Origin latitude.
        latitude: f64,
        /// Origin longitude.
        longitude: f64,
    },
}

/// Coarse classification used when mapping errors onto a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The caller sent something unusable.
    Client,
    /// The engine or an upstream collaborator failed.
    Server,
}

/// Errors returned by [`crate::SiteService`] operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SiteError {
    /// No category entry parsed into a usable filter.
    #[error(transparent)]
    InvalidCategories(#[from] CategoryError),
    /// The POI source failed.
    #[error("upstream POI query failed: {0}")]
    Upstream(#[from] PoiSourceError),
    /// Geometry construction failed.
    #[error("density grid could not be built: {0}")]
    Grid(#[from] GridError),
    /// The blocking grid task panicked or was cancelled.
    #[error("density grid task failed: {0}")]
    Task(String),
}

impl SiteError {
    /// Whether the failure is the caller's or the server's.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidCategories(_) | Self::Grid(GridError::ReachesPole { .. }) => {
                ErrorClass::Client
            }
            Self::Upstream(_) | Self::Grid(_) | Self::Task(_) => ErrorClass::Server,
        }
    }

    /// Underlying detail suitable for an error envelope.
    #[must_use]
    pub fn details(&self) -> String {
        match self {
            Self::InvalidCategories(err) => err.to_string(),
            Self::Upstream(err) => err.to_string(),
            Self::Grid(err) => err.to_string(),
            Self::Task(message) => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn classifies_errors() {
        assert_eq!(
            SiteError::from(CategoryError::NoValidFilters).class(),
            ErrorClass::Client
        );
        let upstream = SiteError::from(PoiSourceError::ParseError {
            message: "eof".into(),
        });
        assert_eq!(upstream.class(), ErrorClass::Server);
        assert_eq!(upstream.details(), "failed to parse upstream response: eof");
        assert_eq!(
            SiteError::from(GridError::InvalidCellSize(0.0)).class(),
            ErrorClass::Server
        );
    }

    #[rstest]
    fn polar_grid_is_the_callers_fault() {
        let err = SiteError::from(GridError::ReachesPole {
            latitude: 90.0,
            radius_km: 2.0,
        });
        assert_eq!(err.class(), ErrorClass::Client);
        assert_eq!(
            SiteError::Task("cancelled".into()).class(),
            ErrorClass::Server
        );
    }

    #[rstest]
    fn invalid_categories_message_is_transparent() {
        let err = SiteError::from(CategoryError::NoValidFilters);
        assert_eq!(err.to_string(), "Invalid categories provided");
    }
}
