//! Router tests against an in-process fixture source.

use std::{collections::HashMap, sync::Arc};

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode},
};
use chrono::NaiveDate;
use plantwatch_core::{
  Reconciler,
  alias::AliasTable,
  filter::Filters,
  manual::ManualDelayIndex,
  reconcile::ReconcileConfig,
  record::{DelayCitation, Facility, FacilityRecord, ResearchUnit},
  source::RetirementSources,
};
use serde_json::Value;
use tower::ServiceExt as _;

use crate::api_router;

// ─── Fixture source ──────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("fixture source offline")]
struct Offline;

#[derive(Default)]
struct FixtureSource {
  report_date:        Option<NaiveDate>,
  generators:         Vec<FacilityRecord>,
  facilities:         HashMap<i64, Facility>,
  research:           Vec<ResearchUnit>,
  fail_authoritative: bool,
  fail_facilities:    bool,
  fail_research:      bool,
}

impl RetirementSources for FixtureSource {
  type Error = Offline;

  async fn latest_report_date(&self) -> Result<Option<NaiveDate>, Offline> {
    if self.fail_authoritative { Err(Offline) } else { Ok(self.report_date) }
  }

  // Filters are left to the core.
  async fn fetch_generators(
    &self,
    _: NaiveDate,
    _: &Filters,
  ) -> Result<Vec<FacilityRecord>, Offline> {
    Ok(self.generators.clone())
  }

  async fn fetch_facilities(&self, ids: Vec<i64>) -> Result<HashMap<i64, Facility>, Offline> {
    if self.fail_facilities {
      return Err(Offline);
    }
    Ok(
      ids
        .into_iter()
        .filter_map(|id| self.facilities.get(&id).map(|f| (id, f.clone())))
        .collect(),
    )
  }

  async fn fetch_research_units(&self, _: &Filters) -> Result<Vec<ResearchUnit>, Offline> {
    if self.fail_research { Err(Offline) } else { Ok(self.research.clone()) }
  }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn generator(id: i64, name: &str, generator_id: &str, fuel: &str, planned: NaiveDate) -> FacilityRecord {
  FacilityRecord {
    facility_id:             id,
    facility_name:           name.into(),
    generator_id:            generator_id.into(),
    state:                   "AL".into(),
    capacity_mw:             Some(400.0),
    fuel_type:               fuel.into(),
    operational_status:      "OP".into(),
    planned_retirement_date: Some(planned),
    actual_retirement_date:  None,
  }
}

fn unit(name: &str, unit_name: &str, year: i32) -> ResearchUnit {
  ResearchUnit {
    facility_name:           name.into(),
    facility_slug:           name.to_ascii_lowercase().replace(' ', "-"),
    unit_name:               unit_name.into(),
    status:                  "operating".into(),
    fuel_type:               "Coal".into(),
    capacity_mw:             Some(350.0),
    planned_retirement_year: Some(year),
    actual_retirement_year:  None,
    state:                   "AL".into(),
    county:                  None,
    owner:                   None,
  }
}

fn fixture() -> FixtureSource {
  FixtureSource {
    report_date: Some(date(2024, 6, 1)),
    generators: vec![
      generator(3, "Barry", "4", "Coal", date(2028, 12, 31)),
      generator(56, "Theodore", "CT1", "Gas", date(2027, 12, 31)),
    ],
    facilities: HashMap::from([(3, Facility {
      facility_id: 3,
      name:        "Barry".into(),
      state:       "AL".into(),
      county:      Some("Mobile".into()),
      city:        None,
      latitude:    Some(31.0),
      longitude:   Some(-88.0),
    })]),
    research: vec![
      unit("Barry Steam Plant", "Unit 4", 2030),
      unit("Colbert", "Unit 2", 2030),
    ],
    ..FixtureSource::default()
  }
}

fn citation() -> DelayCitation {
  DelayCitation {
    facility_name:   "Colbert".into(),
    state:           "AL".into(),
    operator:        None,
    original_year:   2030,
    revised_year:    None,
    delay_years:     None,
    indefinite:      true,
    emergency_order: false,
    source_label:    "Utility press release".into(),
    source_url:      "https://example.com/colbert".into(),
  }
}

fn app(source: FixtureSource) -> Router {
  let reconciler = Reconciler::new(
    AliasTable::default(),
    ManualDelayIndex::new(vec![citation()]).unwrap(),
    ReconcileConfig::default(),
  );
  api_router(Arc::new(source), Arc::new(reconciler))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
  let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
  let resp = app.oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  (status, serde_json::from_slice(&bytes).unwrap())
}

fn names(body: &Value) -> Vec<&str> {
  body["data"]
    .as_array()
    .unwrap()
    .iter()
    .map(|r| r["facilityName"].as_str().unwrap())
    .collect()
}

// ─── /retirements ────────────────────────────────────────────────────────────

#[tokio::test]
async fn retirements_returns_sorted_page() {
  let (status, body) = get(app(fixture()), "/retirements").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(names(&body), ["Theodore", "Barry", "Colbert"]);
  assert_eq!(body["pagination"]["page"], 1);
  assert_eq!(body["pagination"]["limit"], 50);
  assert_eq!(body["pagination"]["total"], 3);
  assert_eq!(body["pagination"]["totalPages"], 1);
}

#[tokio::test]
async fn absent_values_are_explicit_nulls() {
  let (_, body) = get(app(fixture()), "/retirements").await;
  let theodore = &body["data"][0];
  let fields = theodore.as_object().unwrap();
  assert!(fields.contains_key("county"));
  assert!(theodore["county"].is_null());
  assert!(theodore["delayMonths"].is_null());
}

#[tokio::test]
async fn merged_record_carries_location_and_delay() {
  let (_, body) = get(app(fixture()), "/retirements").await;
  let barry = &body["data"][1];
  assert_eq!(barry["county"], "Mobile");
  assert_eq!(barry["resolvedPlannedDate"], "2030-12-31");
  assert_eq!(barry["delayMonths"], 24);
  assert_eq!(barry["extended"], true);
}

#[tokio::test]
async fn fuel_type_filter_is_applied() {
  let (_, body) = get(app(fixture()), "/retirements?fuelType=coal").await;
  assert_eq!(names(&body), ["Barry", "Colbert"]);
}

#[tokio::test]
async fn invalid_filters_fall_back_to_defaults() {
  let (status, body) =
    get(app(fixture()), "/retirements?state=Alabama&page=zero").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["pagination"]["page"], 1);
  assert_eq!(body["pagination"]["total"], 3);
}

#[tokio::test]
async fn page_past_the_end_is_empty() {
  let (status, body) = get(app(fixture()), "/retirements?page=4").await;
  assert_eq!(status, StatusCode::OK);
  assert!(body["data"].as_array().unwrap().is_empty());
  assert_eq!(body["pagination"]["total"], 3);
}

#[tokio::test]
async fn research_outage_degrades_to_authoritative() {
  let source = FixtureSource { fail_research: true, ..fixture() };
  let (status, body) = get(app(source), "/retirements").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(names(&body), ["Theodore", "Barry"]);
}

#[tokio::test]
async fn authoritative_outage_degrades_to_research() {
  let source = FixtureSource { fail_authoritative: true, ..fixture() };
  let (status, body) = get(app(source), "/retirements").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(names(&body), ["Barry Steam Plant", "Colbert"]);
}

#[tokio::test]
async fn missing_snapshot_is_an_empty_source() {
  let source = FixtureSource { report_date: None, ..fixture() };
  let (status, body) = get(app(source), "/retirements").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["pagination"]["total"], 2);
}

#[tokio::test]
async fn facility_outage_drops_locations_only() {
  let source = FixtureSource { fail_facilities: true, ..fixture() };
  let (status, body) = get(app(source), "/retirements").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["pagination"]["total"], 3);
  assert!(body["data"][1]["county"].is_null());
}

#[tokio::test]
async fn total_outage_returns_empty_page_shape() {
  let source = FixtureSource {
    fail_authoritative: true,
    fail_research: true,
    ..fixture()
  };
  let (status, body) = get(app(source), "/retirements?page=2").await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert!(body["data"].as_array().unwrap().is_empty());
  assert_eq!(body["pagination"]["page"], 2);
  assert_eq!(body["pagination"]["total"], 0);
  assert_eq!(body["error"], "internal server error");
}

// ─── /summary and /citations ─────────────────────────────────────────────────

#[tokio::test]
async fn summary_counts_full_set() {
  let (status, body) = get(app(fixture()), "/summary?page=9").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["total"], 3);
  assert_eq!(body["indefinite"], 1);
  assert_eq!(body["bySource"]["manual"], 1);
  assert_eq!(body["byYear"]["2030"], 2);
}

#[tokio::test]
async fn citations_lists_loaded_citations() {
  let (status, body) = get(app(fixture()), "/citations").await;
  assert_eq!(status, StatusCode::OK);
  let list = body.as_array().unwrap();
  assert_eq!(list.len(), 1);
  assert_eq!(list[0]["facilityName"], "Colbert");
  assert_eq!(list[0]["indefinite"], true);
}
