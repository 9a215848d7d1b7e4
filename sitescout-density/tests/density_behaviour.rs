//! Behaviour scenarios for competitor density reports.

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use sitescout_core::test_support::StubPoiSource;
use sitescout_core::{DensityRequest, RawElement};
use sitescout_density::{DensityReport, SiteError, SiteService};
use std::cell::RefCell;

const ORIGIN_LAT: f64 = 12.97;
const ORIGIN_LON: f64 = 77.59;

type Outcome = Option<Result<DensityReport, SiteError>>;

#[fixture]
fn service() -> RefCell<Option<SiteService<StubPoiSource>>> {
    RefCell::new(None)
}

#[fixture]
fn outcome() -> RefCell<Outcome> {
    RefCell::new(None)
}

fn run(service: &RefCell<Option<SiteService<StubPoiSource>>>, request: &DensityRequest) -> Outcome {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime");
    let service = service.borrow();
    let service = service.as_ref().expect("service configured");
    Some(runtime.block_on(service.competitor_density(request)))
}

fn report(outcome: &RefCell<Outcome>) -> DensityReport {
    match outcome.borrow().as_ref() {
        Some(Ok(report)) => report.clone(),
        other => panic!("expected a report, got {other:?}"),
    }
}

fn tile_counts(report: &DensityReport) -> Vec<(u64, u64)> {
    report
        .tiles
        .features
        .iter()
        .map(|feature| {
            let property = |key: &str| {
                feature
                    .property(key)
                    .and_then(serde_json::Value::as_u64)
                    .expect("numeric property")
            };
            (property("count"), property("score"))
        })
        .collect()
}

#[given("a source returning ten cafes at the origin")]
fn given_ten_cafes(#[from(service)] service: &RefCell<Option<SiteService<StubPoiSource>>>) {
    let elements = (1..=10)
        .map(|id| {
            RawElement::new("node", id)
                .at(ORIGIN_LAT, ORIGIN_LON)
                .with_tag("amenity", "cafe")
        })
        .collect();
    *service.borrow_mut() = Some(SiteService::new(StubPoiSource::with_elements(elements)));
}

#[given("a source returning no elements")]
fn given_empty(#[from(service)] service: &RefCell<Option<SiteService<StubPoiSource>>>) {
    *service.borrow_mut() = Some(SiteService::new(StubPoiSource::default()));
}

#[when("I request competitor density for amenity cafes within 2 km using 0.3 km cells")]
fn when_request_cafes(
    #[from(service)] service: &RefCell<Option<SiteService<StubPoiSource>>>,
    #[from(outcome)] outcome: &RefCell<Outcome>,
) {
    let request =
        DensityRequest::new(ORIGIN_LAT, ORIGIN_LON, vec!["amenity=cafe".into()], 2.0, 0.3)
            .expect("valid request");
    *outcome.borrow_mut() = run(service, &request);
}

#[when("I request competitor density for the malformed category badformat")]
fn when_request_malformed(
    #[from(service)] service: &RefCell<Option<SiteService<StubPoiSource>>>,
    #[from(outcome)] outcome: &RefCell<Outcome>,
) {
    let request = DensityRequest::new(ORIGIN_LAT, ORIGIN_LON, vec!["badformat".into()], 2.0, 0.3)
        .expect("structurally valid request");
    *outcome.borrow_mut() = run(service, &request);
}

#[then("exactly one tile has count 10 and score 100")]
fn then_one_full_tile(#[from(outcome)] outcome: &RefCell<Outcome>) {
    let counts = tile_counts(&report(outcome));
    assert_eq!(counts.iter().filter(|entry| **entry == (10, 100)).count(), 1);
}

#[then("every other tile has count 0 and score 0")]
fn then_others_empty(#[from(outcome)] outcome: &RefCell<Outcome>) {
    let counts = tile_counts(&report(outcome));
    assert_eq!(counts.iter().filter(|entry| **entry == (0, 0)).count(), counts.len() - 1);
}

#[then("there is one top tile ranked first")]
fn then_one_top_tile(#[from(outcome)] outcome: &RefCell<Outcome>) {
    let report = report(outcome);
    assert_eq!(report.top_tiles.len(), 1);
    let rank = report
        .top_tiles
        .first()
        .and_then(|tile| tile.property("rank"))
        .and_then(serde_json::Value::as_u64);
    assert_eq!(rank, Some(1));
    assert_eq!(report.heatmap_points.features.len(), 1);
}

#[then("every tile has count 0 and score 0")]
fn then_all_empty(#[from(outcome)] outcome: &RefCell<Outcome>) {
    let counts = tile_counts(&report(outcome));
    assert!(!counts.is_empty());
    assert!(counts.iter().all(|entry| *entry == (0, 0)));
}

#[then("the report has no points, top tiles or heatmap points")]
fn then_no_layers(#[from(outcome)] outcome: &RefCell<Outcome>) {
    let report = report(outcome);
    assert!(report.points.is_empty());
    assert!(report.top_tiles.is_empty());
    assert!(report.heatmap_points.features.is_empty());
}

#[then("the metadata totals are zero")]
fn then_zero_totals(#[from(outcome)] outcome: &RefCell<Outcome>) {
    let report = report(outcome);
    assert_eq!(report.metadata.total_count, 0);
    assert_eq!(report.metadata.max_count, 0);
}

#[then("the request fails with Invalid categories provided")]
fn then_invalid_categories(#[from(outcome)] outcome: &RefCell<Outcome>) {
    match outcome.borrow().as_ref() {
        Some(Err(err @ SiteError::InvalidCategories(_))) => {
            assert_eq!(err.to_string(), "Invalid categories provided");
        }
        other => panic!("expected InvalidCategories, got {other:?}"),
    }
}

#[then("the source was never called")]
fn then_source_untouched(#[from(service)] service: &RefCell<Option<SiteService<StubPoiSource>>>) {
    let service = service.borrow();
    let calls = service.as_ref().map(|s| s.source().calls());
    assert_eq!(calls, Some(0));
}

#[scenario(path = "tests/features/density.feature", index = 0)]
fn clustered_cafes(
    service: RefCell<Option<SiteService<StubPoiSource>>>,
    outcome: RefCell<Outcome>,
) {
    let _ = (service, outcome);
}

#[scenario(path = "tests/features/density.feature", index = 1)]
fn empty_source(service: RefCell<Option<SiteService<StubPoiSource>>>, outcome: RefCell<Outcome>) {
    let _ = (service, outcome);
}

#[scenario(path = "tests/features/density.feature", index = 2)]
fn malformed_categories(
    service: RefCell<Option<SiteService<StubPoiSource>>>,
    outcome: RefCell<Outcome>,
) {
    let _ = (service, outcome);
}
