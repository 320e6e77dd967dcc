//! Query filters accepted at the entry point, and their sanitisation.
//!
//! Filter input never causes a rejection: an unrecognised value is replaced by
//! its default and the replacement is reported back in
//! [`Filters::adjustments`] so the caller can log it.

use serde::{Deserialize, Serialize};

use crate::{
  normalize::state_key,
  record::{FacilityRecord, ResearchUnit},
};

/// Raw, unvalidated filter values as they arrive from a query string.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterParams {
  /// Two-letter state code; empty means all states.
  pub state:     Option<String>,
  /// Free-text fuel label.
  pub fuel_type: Option<String>,
  /// 1-indexed page number.
  pub page:      Option<String>,
}

/// A filter value that was replaced by its default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAdjustment {
  /// Not a two-letter code; all states are returned.
  State(String),
  /// Not a positive integer; page 1 is returned.
  Page(String),
}

/// Validated filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filters {
  /// Upper-case two-letter code, or `None` for every state.
  pub state:       Option<String>,
  /// Trimmed fuel label, or `None` for every fuel.
  pub fuel_type:   Option<String>,
  pub page:        usize,
  pub adjustments: Vec<FilterAdjustment>,
}

impl Default for Filters {
  fn default() -> Self {
    Self {
      state:       None,
      fuel_type:   None,
      page:        1,
      adjustments: Vec::new(),
    }
  }
}

impl FilterParams {
  pub fn sanitize(&self) -> Filters {
    let mut filters = Filters::default();

    if let Some(raw) = self.state.as_deref().map(str::trim)
      && !raw.is_empty()
    {
      if raw.len() == 2 && raw.chars().all(|c| c.is_ascii_alphabetic()) {
        filters.state = Some(state_key(raw));
      } else {
        filters.adjustments.push(FilterAdjustment::State(raw.to_owned()));
      }
    }

    filters.fuel_type = self
      .fuel_type
      .as_deref()
      .map(str::trim)
      .filter(|f| !f.is_empty())
      .map(str::to_owned);

    if let Some(raw) = self.page.as_deref().map(str::trim)
      && !raw.is_empty()
    {
      match raw.parse::<usize>() {
        Ok(page) if page >= 1 => filters.page = page,
        _ => filters.adjustments.push(FilterAdjustment::Page(raw.to_owned())),
      }
    }

    filters
  }
}

// ─── Fuel matching ───────────────────────────────────────────────────────────

/// Authoritative fuel labels are matched exactly, ignoring ASCII case.
pub fn authoritative_fuel_matches(label: &str, wanted: &str) -> bool {
  label.trim().eq_ignore_ascii_case(wanted.trim())
}

/// Research fuel labels are free text: matched as a case-insensitive
/// substring.
pub fn research_fuel_matches(label: &str, wanted: &str) -> bool {
  label
    .to_ascii_lowercase()
    .contains(&wanted.trim().to_ascii_lowercase())
}

impl Filters {
  fn state_matches(&self, state: &str) -> bool {
    self.state.as_deref().is_none_or(|s| state_key(state) == s)
  }

  pub fn matches_authoritative(&self, record: &FacilityRecord) -> bool {
    self.state_matches(&record.state)
      && self
        .fuel_type
        .as_deref()
        .is_none_or(|f| authoritative_fuel_matches(&record.fuel_type, f))
  }

  pub fn matches_research(&self, unit: &ResearchUnit) -> bool {
    self.state_matches(&unit.state)
      && self
        .fuel_type
        .as_deref()
        .is_none_or(|f| research_fuel_matches(&unit.fuel_type, f))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn params(state: &str, fuel: &str, page: &str) -> FilterParams {
    FilterParams {
      state:     Some(state.into()),
      fuel_type: Some(fuel.into()),
      page:      Some(page.into()),
    }
  }

  #[test]
  fn valid_values_pass_through() {
    let f = params("al", " Coal ", "3").sanitize();
    assert_eq!(f.state.as_deref(), Some("AL"));
    assert_eq!(f.fuel_type.as_deref(), Some("Coal"));
    assert_eq!(f.page, 3);
    assert!(f.adjustments.is_empty());
  }

  #[test]
  fn empty_values_mean_all() {
    let f = params("", "", "").sanitize();
    assert_eq!(f, Filters::default());
  }

  #[test]
  fn invalid_values_fall_back_to_defaults() {
    let f = params("Alabama", "coal", "-2").sanitize();
    assert_eq!(f.state, None);
    assert_eq!(f.page, 1);
    assert_eq!(f.adjustments, vec![
      FilterAdjustment::State("Alabama".into()),
      FilterAdjustment::Page("-2".into()),
    ]);
  }

  #[test]
  fn page_zero_is_adjusted() {
    let f = params("", "", "0").sanitize();
    assert_eq!(f.page, 1);
    assert_eq!(f.adjustments.len(), 1);
  }

  #[test]
  fn fuel_matching_differs_by_source() {
    assert!(authoritative_fuel_matches("COAL", "coal"));
    assert!(!authoritative_fuel_matches("Conventional Steam Coal", "coal"));
    assert!(research_fuel_matches("Bituminous Coal", "coal"));
    assert!(!research_fuel_matches("Natural Gas", "coal"));
  }
}
