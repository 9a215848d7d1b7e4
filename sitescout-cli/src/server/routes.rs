//! Route handlers.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Serialize;
use sitescout_core::{
    DensityBody, DensityRequest, LocationScore, NearbyBody, NearbyRequest, ScorecardBody,
    ScorecardRequest,
};
use sitescout_density::{DensityReport, NearbyPlaces};

use super::{ApiError, AppState};

#[derive(Debug, Serialize)]
pub(super) struct Health {
    status: &'static str,
}

pub(super) async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub(super) async fn competitor_density(
    State(state): State<AppState>,
    body: Result<Json<DensityBody>, JsonRejection>,
) -> Result<Json<DensityReport>, ApiError> {
    let Json(body) = body?;
    let request = DensityRequest::try_from(body)?;
    let report = state.service.competitor_density(&request).await?;
    Ok(Json(report))
}

pub(super) async fn places_nearby(
    State(state): State<AppState>,
    body: Result<Json<NearbyBody>, JsonRejection>,
) -> Result<Json<NearbyPlaces>, ApiError> {
    let Json(body) = body?;
    let request = NearbyRequest::try_from(body)?;
    Ok(Json(state.service.nearby_places(&request).await?))
}

pub(super) async fn location_score(
    State(state): State<AppState>,
    body: Result<Json<ScorecardBody>, JsonRejection>,
) -> Result<Json<LocationScore>, ApiError> {
    let Json(body) = body?;
    let request = ScorecardRequest::try_from(body)?;
    Ok(Json(state.service.score_location(&request).await?))
}
