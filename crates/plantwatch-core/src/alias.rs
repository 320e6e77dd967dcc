//! Curated name aliases between the authoritative and research sources.
//!
//! Used for plants whose names differ completely between sources, e.g. after
//! an ownership change. Lookups work in both directions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One known pairing of an authoritative name with a research name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasPair {
  pub authoritative: String,
  pub research:      String,
}

#[derive(Debug, Clone, Default)]
pub struct AliasTable {
  to_research:      HashMap<String, String>,
  to_authoritative: HashMap<String, String>,
}

impl AliasTable {
  /// Build the table. When a name appears in several pairs the first pair
  /// wins.
  pub fn new(pairs: Vec<AliasPair>) -> Result<Self> {
    let mut table = Self::default();
    for AliasPair { authoritative, research } in pairs {
      if authoritative.trim().is_empty() || research.trim().is_empty() {
        return Err(Error::EmptyAlias(authoritative, research));
      }
      table
        .to_research
        .entry(authoritative.clone())
        .or_insert_with(|| research.clone());
      table.to_authoritative.entry(research).or_insert(authoritative);
    }
    Ok(table)
  }

  pub fn from_json(json: &str) -> Result<Self> {
    Self::new(serde_json::from_str(json)?)
  }

  /// The counterpart of `name` in the other source, in either direction.
  pub fn alias_for(&self, name: &str) -> Option<&str> {
    self
      .to_research
      .get(name)
      .or_else(|| self.to_authoritative.get(name))
      .map(String::as_str)
  }

  pub fn len(&self) -> usize { self.to_research.len() }

  pub fn is_empty(&self) -> bool { self.to_research.is_empty() }
}
