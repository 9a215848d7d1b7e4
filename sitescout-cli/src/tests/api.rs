//! Router tests exercised in-process with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use super::helpers::cafes;
use super::*;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use rstest::rstest;
use sitescout_core::PoiSourceError;
use sitescout_core::test_support::StubPoiSource;
use tower::ServiceExt;

async fn call(
    stub: Arc<StubPoiSource>,
    method: &str,
    uri: &str,
    body: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let app = build_router(AppState::new(stub));
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_owned())),
        None => request.body(Body::empty()),
    }
    .expect("request");
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

fn density_body(categories: &str, radius_km: f64) -> String {
    format!(
        r#"{{"latitude": 12.97, "longitude": 77.59, "categories": {categories},
            "radiusKm": {radius_km}, "cellKm": 0.3}}"#
    )
}

#[rstest]
#[tokio::test]
async fn health_reports_ok() {
    let (status, json) = call(Arc::default(), "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!({ "status": "ok" }));
}

#[rstest]
#[tokio::test]
async fn density_returns_geojson_layers() {
    let stub = Arc::new(StubPoiSource::with_elements(cafes(10)));
    let body = density_body(r#"["amenity=cafe"]"#, 2.0);
    let (status, json) = call(stub, "POST", "/api/competitor-density", Some(&body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["tiles"]["type"], "FeatureCollection");
    assert_eq!(json["metadata"]["totalCount"], 10);
    assert_eq!(json["metadata"]["cellKm"], 0.3);
    assert_eq!(json["topTiles"].as_array().map(Vec::len), Some(1));
    assert_eq!(json["topTiles"][0]["properties"]["count"], 10);
    assert_eq!(json["heatmapPoints"]["features"][0]["properties"]["weight"], 10);
}

#[rstest]
#[case(r#"{"longitude": 77.59, "categories": ["amenity=cafe"]}"#, "latitude must be a number")]
#[case(r#"{"latitude": 91, "longitude": 77.59, "categories": ["amenity=cafe"]}"#, "latitude must be <= 90")]
#[case(r#"{"latitude": 12.97, "longitude": 77.59}"#, "categories required")]
#[case(r#"{"latitude": 12.97, "longitude": 77.59, "categories": ["amenity=cafe"], "radiusKm": 0.19}"#, "radiusKm must be >= 0.2")]
#[case(r#"{"latitude": 12.97, "longitude": 77.59, "categories": ["amenity=cafe"], "cellKm": 6}"#, "cellKm must be <= 5")]
#[case(r#"{"latitude": 90, "longitude": 10, "categories": ["amenity=cafe"]}"#, "radiusKm of 2 km reaches the pole from latitude 90")]
#[tokio::test]
async fn density_validation_errors_are_bad_requests(
    #[case] body: &str,
    #[case] message: &str,
) {
    let stub = Arc::new(StubPoiSource::default());
    let (status, json) =
        call(Arc::clone(&stub), "POST", "/api/competitor-density", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], message);
    assert!(json.get("details").is_none());
    assert_eq!(stub.calls(), 0);
}

#[rstest]
#[tokio::test]
async fn unusable_categories_are_bad_requests() {
    let stub = Arc::new(StubPoiSource::with_elements(cafes(3)));
    let body = density_body(r#"["badformat"]"#, 2.0);
    let (status, json) =
        call(Arc::clone(&stub), "POST", "/api/competitor-density", Some(&body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid categories provided");
    assert_eq!(stub.calls(), 0);
}

#[rstest]
#[tokio::test]
async fn upstream_failures_are_server_errors() {
    let stub = Arc::new(StubPoiSource::failing(PoiSourceError::Timeout {
        url: "http://overpass.invalid".into(),
        timeout_secs: 25,
    }));
    let body = density_body(r#"["amenity=cafe"]"#, 2.0);
    let (status, json) = call(stub, "POST", "/api/competitor-density", Some(&body)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Server error");
    assert!(
        json["details"]
            .as_str()
            .is_some_and(|details| details.contains("overpass.invalid"))
    );
}

#[rstest]
#[tokio::test]
async fn malformed_json_is_rejected() {
    let (status, json) = call(
        Arc::default(),
        "POST",
        "/api/places-nearby",
        Some("{\"latitude\": "),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}

#[rstest]
#[tokio::test]
async fn nearby_lists_places() {
    let stub = Arc::new(StubPoiSource::with_elements(cafes(3)));
    let body = r#"{"latitude": 12.97, "longitude": 77.59, "categories": ["amenity=cafe"]}"#;
    let (status, json) = call(Arc::clone(&stub), "POST", "/api/places-nearby", Some(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 3);
    assert_eq!(json["results"][2]["category"], "cafe");
    assert_eq!(stub.last_query().map(|query| query.radius_m), Some(2000));
}

#[rstest]
#[tokio::test]
async fn location_score_without_targets_scores_twenty() {
    let body = r#"{"latitude": 12.97, "longitude": 77.59, "targets": [], "competitors": []}"#;
    let stub = Arc::new(StubPoiSource::default());
    let (status, json) =
        call(Arc::clone(&stub), "POST", "/api/location-score", Some(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["score"], 20);
    assert_eq!(json["adjustments"][0]["delta"], -30);
    assert_eq!(json["targetNearest"]["distance"], serde_json::Value::Null);
    assert_eq!(stub.calls(), 0);
}

#[rstest]
#[tokio::test]
async fn location_score_rejects_short_entries() {
    let body = r#"{"latitude": 12.97, "longitude": 77.59, "targets": ["ab"]}"#;
    let (status, json) = call(Arc::default(), "POST", "/api/location-score", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "each target must be at least 3 characters");
}
