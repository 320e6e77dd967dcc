//! Ordering and page slicing of the reconciled set.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::record::MergedRecord;

/// Stand-in for an unknown retirement date, `9999-12-31`: sorts after every
/// real date.
pub fn far_future() -> NaiveDate {
  NaiveDate::from_ymd_opt(9999, 12, 31).unwrap_or(NaiveDate::MAX)
}

/// Sort by resolved planned date, earliest first, unknown dates last.
/// Stable: records with equal dates keep their relative order.
pub fn sort_by_planned_date(records: &mut [MergedRecord]) {
  let sentinel = far_future();
  records.sort_by_key(|r| r.resolved_planned_date.unwrap_or(sentinel));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
  pub page:        usize,
  pub limit:       usize,
  /// Records in the full set, before slicing.
  pub total:       usize,
  pub total_pages: usize,
}

/// One page of reconciled records, as returned at the API boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
  pub data:       Vec<MergedRecord>,
  pub pagination: Pagination,
}

impl Page {
  /// A page with no records, used when the request could not be served.
  pub fn empty(page: usize, limit: usize) -> Self {
    Self {
      data:       Vec::new(),
      pagination: Pagination {
        page,
        limit,
        total: 0,
        total_pages: 0,
      },
    }
  }
}

/// Slice page `page` (1-indexed) of size `limit` out of `records`.
///
/// Pages past the end are empty. A `page` of zero is read as 1 and a `limit`
/// of zero as 1.
pub fn paginate(records: Vec<MergedRecord>, page: usize, limit: usize) -> Page {
  let page = page.max(1);
  let limit = limit.max(1);
  let total = records.len();
  let start = (page - 1).saturating_mul(limit);

  let data = records.into_iter().skip(start).take(limit).collect();
  Page {
    data,
    pagination: Pagination {
      page,
      limit,
      total,
      total_pages: total.div_ceil(limit),
    },
  }
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeSet;

  use super::*;
  use crate::record::DataSource;

  fn record(id: &str, date: Option<(i32, u32, u32)>) -> MergedRecord {
    MergedRecord {
      facility_id: Some(1),
      facility_name: "Barry".into(),
      generator_id: id.into(),
      unit_name: None,
      research_slug: None,
      state: "AL".into(),
      county: None,
      city: None,
      latitude: None,
      longitude: None,
      capacity_mw: None,
      fuel_type: "coal".into(),
      operational_status: None,
      owner: None,
      operator: None,
      data_sources: BTreeSet::from([DataSource::Authoritative]),
      resolved_planned_date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
      authoritative_date: None,
      research_date: None,
      delay_months: None,
      delay_years: None,
      original_planned_year: None,
      revised_planned_year: None,
      indefinite_delay: false,
      emergency_order: false,
      extended: false,
      citation_source: None,
      citation_url: None,
    }
  }

  fn ids(records: &[MergedRecord]) -> Vec<&str> {
    records.iter().map(|r| r.generator_id.as_str()).collect()
  }

  #[test]
  fn unknown_dates_sort_last() {
    let mut records = vec![
      record("none", None),
      record("late", Some((2035, 12, 31))),
      record("early", Some((2026, 5, 1))),
    ];
    sort_by_planned_date(&mut records);
    assert_eq!(ids(&records), ["early", "late", "none"]);
  }

  #[test]
  fn sort_is_stable_for_equal_dates() {
    let mut records = vec![
      record("a", Some((2030, 12, 31))),
      record("b", Some((2030, 12, 31))),
      record("c", Some((2029, 12, 31))),
    ];
    sort_by_planned_date(&mut records);
    assert_eq!(ids(&records), ["c", "a", "b"]);
  }

  #[test]
  fn pages_slice_in_order() {
    let records: Vec<_> = (0..5).map(|i| record(&i.to_string(), None)).collect();
    let page = paginate(records, 2, 2);
    assert_eq!(ids(&page.data), ["2", "3"]);
    assert_eq!(page.pagination, Pagination {
      page:        2,
      limit:       2,
      total:       5,
      total_pages: 3,
    });
  }

  #[test]
  fn out_of_range_page_is_empty() {
    let records: Vec<_> = (0..3).map(|i| record(&i.to_string(), None)).collect();
    let page = paginate(records, 9, 2);
    assert!(page.data.is_empty());
    assert_eq!(page.pagination.total, 3);
    assert_eq!(page.pagination.total_pages, 2);
  }

  #[test]
  fn pagination_serialises_camel_case() {
    let json = serde_json::to_value(Page::empty(1, 50)).unwrap();
    assert_eq!(json["pagination"]["totalPages"], 0);
    assert_eq!(json["data"], serde_json::json!([]));
  }
}
