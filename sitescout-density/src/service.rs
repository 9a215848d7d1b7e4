//! Request orchestration over any [`PoiSource`].
//!
//! Each operation parses category filters before touching the source, so an
//! unusable filter list never reaches the upstream service. Grid work runs on
//! the blocking pool, so these futures need a Tokio runtime.

use futures_util::future::try_join;
use log::debug;
use serde::{Deserialize, Serialize};
use sitescout_core::{
    CategoryRules, DensityRequest, LocationScore, NearbyRequest, Origin, Place, PoiQuery,
    PoiSource, ScorecardRequest, parse_filters, sanitize_with_rules, score_location,
};

use crate::error::SiteError;
use crate::report::{DensityReport, aggregate_density};

/// Response body of a nearby-places request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyPlaces {
    /// Number of results.
    pub count: usize,
    /// Sanitised places.
    pub results: Vec<Place>,
}

/// Runs the engine's operations against a POI source.
///
/// # Examples
///
/// ```
/// use sitescout_core::{DensityRequest, test_support::StubPoiSource};
/// use sitescout_density::SiteService;
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let service = SiteService::new(StubPoiSource::default());
/// let request = DensityRequest::new(12.97, 77.59, vec!["amenity=cafe".into()], 2.0, 0.3)?;
/// let report = service.competitor_density(&request).await?;
/// assert_eq!(report.metadata.total_count, 0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct SiteService<S> {
    source: S,
    rules: CategoryRules,
}

impl<S: PoiSource> SiteService<S> {
    /// Service using the default category rules.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self::with_rules(source, CategoryRules::default())
    }

    /// Service deriving place categories from `rules`.
    #[must_use]
    pub const fn with_rules(source: S, rules: CategoryRules) -> Self {
        Self { source, rules }
    }

    /// The wrapped source.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Fetch, sanitise, grid and score competitors around the request origin.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::InvalidCategories`] before any upstream call when
    /// no category parses, [`SiteError::Upstream`] when the fetch fails,
    /// [`SiteError::Grid`] when the grid cannot be built and
    /// [`SiteError::Task`] when the grid task dies.
    pub async fn competitor_density(
        &self,
        request: &DensityRequest,
    ) -> Result<DensityReport, SiteError> {
        let places = self
            .fetch_places(request.origin, request.radius_km, &request.categories)
            .await?;
        let DensityRequest {
            origin,
            radius_km,
            cell_km,
            ..
        } = *request;
        tokio::task::spawn_blocking(move || -> Result<DensityReport, SiteError> {
            let grid = aggregate_density(origin, radius_km, cell_km, &places)?;
            Ok(DensityReport::new(&grid, places, radius_km, cell_km))
        })
        .await
        .map_err(|err| SiteError::Task(err.to_string()))?
    }

    /// Sanitised places within the fixed nearby radius.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::InvalidCategories`] before any upstream call when
    /// no category parses and [`SiteError::Upstream`] when the fetch fails.
    pub async fn nearby_places(&self, request: &NearbyRequest) -> Result<NearbyPlaces, SiteError> {
        let results = self
            .fetch_places(request.origin, request.radius_km(), &request.categories)
            .await?;
        Ok(NearbyPlaces {
            count: results.len(),
            results,
        })
    }

    /// Score a candidate location against nearby targets and competitors.
    ///
    /// Both sides are fetched concurrently. An empty side is not fetched and
    /// counts as nothing found.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::InvalidCategories`] when a non-empty side has no
    /// parsable entry and [`SiteError::Upstream`] when either fetch fails.
    pub async fn score_location(
        &self,
        request: &ScorecardRequest,
    ) -> Result<LocationScore, SiteError> {
        let radius_km = request.radius_km();
        let (targets, competitors) = try_join(
            self.fetch_side(request.origin, radius_km, &request.targets),
            self.fetch_side(request.origin, radius_km, &request.competitors),
        )
        .await?;
        debug!(
            "scorecard: {} targets, {} competitors",
            targets.len(),
            competitors.len()
        );
        Ok(score_location(&request.origin, &targets, &competitors))
    }

    async fn fetch_side(
        &self,
        origin: Origin,
        radius_km: f64,
        categories: &[String],
    ) -> Result<Vec<Place>, SiteError> {
        if categories.is_empty() {
            return Ok(Vec::new());
        }
        self.fetch_places(origin, radius_km, categories).await
    }

    async fn fetch_places(
        &self,
        origin: Origin,
        radius_km: f64,
        categories: &[String],
    ) -> Result<Vec<Place>, SiteError> {
        let filters = parse_filters(categories)?;
        let query = PoiQuery::from_radius_km(origin, radius_km, filters);
        let elements = self.source.fetch_elements(&query).await?;
        Ok(sanitize_with_rules(&elements, &self.rules))
    }
}
