//! Loading the hand-curated reference data: name aliases and delay
//! citations. Both are JSON arrays read once at startup; a missing path
//! setting means an empty table.

use std::path::Path;

use plantwatch_core::{alias::AliasTable, manual::ManualDelayIndex};
use tracing::{info, warn};

use crate::error::{Error, Result};

fn read(path: &Path) -> Result<String> {
  std::fs::read_to_string(path).map_err(|source| Error::ReadReference {
    path: path.to_path_buf(),
    source,
  })
}

pub fn load_aliases(path: Option<&Path>) -> Result<AliasTable> {
  let Some(path) = path else {
    return Ok(AliasTable::default());
  };
  let table = AliasTable::from_json(&read(path)?)?;
  info!(path = %path.display(), count = table.len(), "loaded name aliases");
  Ok(table)
}

pub fn load_citations(path: Option<&Path>) -> Result<ManualDelayIndex> {
  let Some(path) = path else {
    return Ok(ManualDelayIndex::default());
  };
  let index = ManualDelayIndex::from_json(&read(path)?)?;
  for dup in index.duplicates() {
    warn!(
      facility = %dup.facility_name,
      state = %dup.state,
      "duplicate delay citation ignored"
    );
  }
  info!(path = %path.display(), count = index.len(), "loaded delay citations");
  Ok(index)
}
