//! Collapsing merged records that describe the same physical unit.
//!
//! The same generator can be reached twice: once through an authoritative
//! record and once as an unmatched research unit under a different spelling.
//! Records are keyed on normalised facility name, state and a unit label.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
  normalize::{normalize, numeric_portion, state_key},
  record::MergedRecord,
};

/// How the unit part of the dedup key is derived from a generator id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupKeyPolicy {
  /// Digits only: "CT2", "Unit 2" and "2" collide. Coarse; two distinct
  /// generators sharing a number inside one plant are merged.
  #[default]
  NumericSuffix,
  /// The whole id, lower-cased with whitespace removed.
  ExactUnit,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
  pub name:  String,
  pub state: String,
  pub unit:  String,
}

impl DedupKeyPolicy {
  pub fn key(self, record: &MergedRecord) -> DedupKey {
    let unit = match self {
      Self::NumericSuffix => numeric_portion(&record.generator_id),
      Self::ExactUnit => record
        .generator_id
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect(),
    };
    DedupKey {
      name: normalize(&record.facility_name),
      state: state_key(&record.state),
      unit,
    }
  }
}

/// Whether `candidate` should replace `kept`: more sources wins, and on a tie
/// a record anchored to an authoritative facility wins. Otherwise the earlier
/// record stays.
fn outranks(candidate: &MergedRecord, kept: &MergedRecord) -> bool {
  let by_sources = candidate.data_sources.len().cmp(&kept.data_sources.len());
  by_sources.is_gt()
    || (by_sources.is_eq()
      && candidate.facility_id.is_some()
      && kept.facility_id.is_none())
}

/// Keep one record per [`DedupKey`].
///
/// Output follows the position where each key was first seen; the surviving
/// record for a key is chosen by [`outranks`].
pub fn dedupe(records: Vec<MergedRecord>, policy: DedupKeyPolicy) -> Vec<MergedRecord> {
  let mut slots: HashMap<DedupKey, usize> = HashMap::new();
  let mut kept: Vec<MergedRecord> = Vec::with_capacity(records.len());

  for record in records {
    let key = policy.key(&record);
    match slots.get(&key) {
      Some(&slot) => {
        if outranks(&record, &kept[slot]) {
          kept[slot] = record;
        }
      }
      None => {
        slots.insert(key, kept.len());
        kept.push(record);
      }
    }
  }
  kept
}
