//! One-shot command tests driven by request files and a stub source.

use super::helpers::{RequestFile, StubSourceBuilder, cafes};
use super::*;
use crate::query::{QueryConfig, QueryKind, run_query_with};
use crate::source::SourceSettings;
use rstest::rstest;
use sitescout_core::test_support::StubPoiSource;
use sitescout_core::{PoiSourceError, RawElement};

fn config_for(file: &RequestFile) -> QueryConfig {
    QueryConfig {
        request_path: file.path.clone(),
        source: SourceSettings::resolve(None, None, None).expect("default settings"),
    }
}

async fn run(
    kind: QueryKind,
    body: &str,
    builder: &StubSourceBuilder,
) -> (Result<(), CliError>, serde_json::Value) {
    let file = RequestFile::new(body);
    let mut output = Vec::new();
    let result = run_query_with(kind, &config_for(&file), builder, &mut output).await;
    let json = if output.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&output).expect("output should be JSON")
    };
    (result, json)
}

#[rstest]
#[tokio::test]
async fn density_prints_report() {
    let builder = StubSourceBuilder::new(StubPoiSource::with_elements(cafes(4)));
    let body = r#"{"latitude": 12.97, "longitude": 77.59, "categories": ["amenity=cafe"],
                   "radiusKm": 1, "cellKm": 0.3}"#;
    let (result, json) = run(QueryKind::Density, body, &builder).await;

    result.expect("density should succeed");
    assert_eq!(json["metadata"]["totalCount"], 4);
    assert_eq!(json["metadata"]["maxCount"], 4);
    assert_eq!(json["topTiles"][0]["properties"]["score"], 100);
}

#[rstest]
#[tokio::test]
async fn nearby_prints_results() {
    let builder = StubSourceBuilder::new(StubPoiSource::with_elements(cafes(2)));
    let body = r#"{"latitude": "12.97", "longitude": 77.59, "categories": ["amenity=cafe"]}"#;
    let (result, json) = run(QueryKind::Nearby, body, &builder).await;

    result.expect("nearby should succeed");
    assert_eq!(json["count"], 2);
    assert_eq!(json["results"][0]["name"], "Cafe 1");
}

#[rstest]
#[tokio::test]
async fn score_accepts_legacy_field_names() {
    let stub = StubPoiSource::default()
        .with_route("shop=bakery", vec![RawElement::new("node", 1).at(12.971, 77.59)]);
    let builder = StubSourceBuilder::new(stub);
    let body = r#"{"latitude": 12.97, "longitude": 77.59,
                   "plusCategories": ["shop=bakery"], "competitorCategories": []}"#;
    let (result, json) = run(QueryKind::Score, body, &builder).await;

    result.expect("score should succeed");
    assert_eq!(json["score"], 70);
    assert_eq!(json["scoreMax"], 100);
    assert_eq!(builder.stub.calls(), 1);
}

#[rstest]
#[tokio::test]
async fn invalid_request_is_reported_before_fetching() {
    let builder = StubSourceBuilder::new(StubPoiSource::with_elements(cafes(1)));
    let body = r#"{"latitude": 12.97, "longitude": 77.59, "categories": ["amenity=cafe"],
                   "radiusKm": 0.1, "cellKm": 0.3}"#;
    let (result, json) = run(QueryKind::Density, body, &builder).await;

    match result {
        Err(CliError::InvalidRequest { source, .. }) => {
            assert_eq!(source.to_string(), "radiusKm must be >= 0.2");
        }
        other => panic!("expected InvalidRequest, found {other:?}"),
    }
    assert!(json.is_null());
    assert_eq!(builder.stub.calls(), 0);
}

#[rstest]
#[tokio::test]
async fn malformed_json_is_a_parse_error() {
    let builder = StubSourceBuilder::new(StubPoiSource::default());
    let (result, _) = run(QueryKind::Nearby, "{not json", &builder).await;
    assert!(matches!(result, Err(CliError::ParseRequest { .. })));
}

#[rstest]
#[tokio::test]
async fn missing_request_file_is_an_open_error() {
    let builder = StubSourceBuilder::new(StubPoiSource::default());
    let file = RequestFile::new("{}");
    let mut config = config_for(&file);
    config.request_path = file.path.with_file_name("absent.json");
    let mut output = Vec::new();
    let result = run_query_with(QueryKind::Nearby, &config, &builder, &mut output).await;
    assert!(matches!(result, Err(CliError::OpenRequest { .. })));
}

#[rstest]
#[tokio::test]
async fn upstream_failure_surfaces_as_query_error() {
    let builder = StubSourceBuilder::new(StubPoiSource::failing(PoiSourceError::HttpError {
        url: "http://overpass.invalid".into(),
        status: 504,
        message: "gateway timeout".into(),
    }));
    let body = r#"{"latitude": 12.97, "longitude": 77.59, "categories": ["amenity=cafe"]}"#;
    let (result, _) = run(QueryKind::Nearby, body, &builder).await;

    let err = result.expect_err("upstream failure");
    assert!(matches!(err, CliError::Query(_)));
    assert!(err.to_string().contains("gateway timeout"));
}
