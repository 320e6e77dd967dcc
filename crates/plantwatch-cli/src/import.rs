//! Bulk import of source datasets from JSON files into a local store.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use plantwatch_core::record::{Facility, FacilityRecord, ResearchUnit};
use plantwatch_store_sqlite::SqliteStore;
use serde::de::DeserializeOwned;
use tracing::info;

/// Files to load; each one is a JSON array of the matching record type.
#[derive(Debug, Default)]
pub struct ImportPlan {
  /// Filing snapshot date and the generators file for it.
  pub generators: Option<(NaiveDate, PathBuf)>,
  pub facilities: Option<PathBuf>,
  pub research:   Option<PathBuf>,
}

/// Rows written per table.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportReport {
  pub generators: usize,
  pub facilities: usize,
  pub research:   usize,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
  let raw = std::fs::read_to_string(path)
    .with_context(|| format!("reading {}", path.display()))?;
  serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

pub async fn run(store: &SqliteStore, plan: &ImportPlan) -> Result<ImportReport> {
  let mut report = ImportReport::default();

  if let Some((report_date, path)) = &plan.generators {
    let records: Vec<FacilityRecord> = read_json(path)?;
    report.generators = store
      .insert_snapshot(*report_date, records)
      .await
      .context("writing generator snapshot")?;
    info!(%report_date, count = report.generators, "imported generators");
  }

  if let Some(path) = &plan.facilities {
    let facilities: Vec<Facility> = read_json(path)?;
    report.facilities = store
      .upsert_facilities(facilities)
      .await
      .context("writing facilities")?;
    info!(count = report.facilities, "imported facilities");
  }

  if let Some(path) = &plan.research {
    let units: Vec<ResearchUnit> = read_json(path)?;
    report.research = store
      .upsert_research_units(units)
      .await
      .context("writing research units")?;
    info!(count = report.research, "imported research units");
  }

  Ok(report)
}

#[cfg(test)]
mod tests {
  use super::*;
  use plantwatch_core::{filter::Filters, source::RetirementSources};

  fn scratch(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir()
      .join(format!("plantwatch-cli-{}-{name}", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
  }

  #[tokio::test]
  async fn imports_every_table() {
    let generators = scratch(
      "generators.json",
      r#"[{
        "facilityId": 3, "facilityName": "Barry", "generatorId": "4",
        "state": "AL", "capacityMw": 404.0, "fuelType": "Coal",
        "operationalStatus": "OP", "plannedRetirementDate": "2028-12-31",
        "actualRetirementDate": null
      }]"#,
    );
    let facilities = scratch(
      "facilities.json",
      r#"[{
        "facilityId": 3, "name": "Barry", "state": "AL", "county": "Mobile",
        "city": null, "latitude": 31.0, "longitude": -88.0
      }]"#,
    );
    let research = scratch(
      "research.json",
      r#"[{
        "facilityName": "Barry Steam Plant", "facilitySlug": "barry",
        "unitName": "Unit 4", "status": "operating", "fuelType": "Coal",
        "capacityMw": 400.0, "plannedRetirementYear": 2030,
        "actualRetirementYear": null, "state": "AL", "county": null,
        "owner": "Alabama Power"
      }]"#,
    );

    let store = SqliteStore::open_in_memory().await.unwrap();
    let report_date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let plan = ImportPlan {
      generators: Some((report_date, generators.clone())),
      facilities: Some(facilities.clone()),
      research:   Some(research.clone()),
    };
    let report = run(&store, &plan).await;
    for path in [generators, facilities, research] {
      std::fs::remove_file(path).ok();
    }

    assert_eq!(report.unwrap(), ImportReport { generators: 1, facilities: 1, research: 1 });
    assert_eq!(store.latest_report_date().await.unwrap(), Some(report_date));
    let units = store.fetch_research_units(&Filters::default()).await.unwrap();
    assert_eq!(units[0].owner.as_deref(), Some("Alabama Power"));
  }

  #[tokio::test]
  async fn malformed_file_names_the_path() {
    let path = scratch("broken.json", "{ not json");
    let store = SqliteStore::open_in_memory().await.unwrap();
    let plan = ImportPlan { facilities: Some(path.clone()), ..ImportPlan::default() };
    let err = run(&store, &plan).await.unwrap_err();
    std::fs::remove_file(&path).ok();
    assert!(err.to_string().contains("broken.json"));
  }

  #[tokio::test]
  async fn empty_plan_writes_nothing() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let report = run(&store, &ImportPlan::default()).await.unwrap();
    assert_eq!(report, ImportReport::default());
  }
}
