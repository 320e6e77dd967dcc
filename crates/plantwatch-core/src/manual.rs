//! The manual delay index: curated citations keyed by normalised name and
//! state.
//!
//! Built once at startup and read-only afterwards. List order is significant:
//! the partial lookup returns the first citation in insertion order.

use std::collections::HashMap;

use crate::{
  Result,
  normalize::{contains_either, normalize, state_key},
  record::DelayCitation,
};

#[derive(Debug, Clone, Default)]
pub struct ManualDelayIndex {
  /// Citations in the order they were supplied.
  citations: Vec<DelayCitation>,
  /// Normalised name of each entry in `citations`, same positions.
  normalized: Vec<String>,
  /// `(normalized name, state)` → position in `citations`.
  exact:      HashMap<(String, String), usize>,
  /// State → positions in `citations`, in insertion order.
  by_state:   HashMap<String, Vec<usize>>,
  /// Citations dropped because an earlier one had the same key.
  duplicates: Vec<DelayCitation>,
}

impl ManualDelayIndex {
  /// Validate and index `citations`.
  ///
  /// A citation whose `(normalized name, state)` key was already taken is
  /// kept out of the index and reported through [`Self::duplicates`].
  pub fn new(citations: Vec<DelayCitation>) -> Result<Self> {
    let mut index = Self::default();
    for citation in citations {
      citation.validate()?;
      let name = normalize(&citation.facility_name);
      let state = state_key(&citation.state);
      let key = (name.clone(), state.clone());
      if index.exact.contains_key(&key) {
        index.duplicates.push(citation);
        continue;
      }
      let position = index.citations.len();
      index.exact.insert(key, position);
      index.by_state.entry(state).or_default().push(position);
      index.normalized.push(name);
      index.citations.push(citation);
    }
    Ok(index)
  }

  /// Parse a JSON array of citations and index it.
  pub fn from_json(json: &str) -> Result<Self> {
    Self::new(serde_json::from_str(json)?)
  }

  /// Find the citation for a facility.
  ///
  /// Tries the exact `(normalized name, state)` key first, then scans the
  /// state's citations in insertion order for a containment match.
  pub fn lookup(&self, facility_name: &str, state: &str) -> Option<&DelayCitation> {
    let name = normalize(facility_name);
    if name.is_empty() {
      return None;
    }
    let state = state_key(state);

    if let Some(&position) = self.exact.get(&(name.clone(), state.clone())) {
      return Some(&self.citations[position]);
    }

    self
      .by_state
      .get(&state)?
      .iter()
      .find(|&&position| contains_either(&self.normalized[position], &name))
      .map(|&position| &self.citations[position])
  }

  /// All indexed citations in insertion order.
  pub fn citations(&self) -> &[DelayCitation] { &self.citations }

  pub fn duplicates(&self) -> &[DelayCitation] { &self.duplicates }

  pub fn len(&self) -> usize { self.citations.len() }

  pub fn is_empty(&self) -> bool { self.citations.is_empty() }
}
