//! Cross-source matching of authoritative generators to research units.
//!
//! Research units are grouped by `(facility name, state)`. An authoritative
//! record is matched to at most one group by trying four tiers in order:
//!
//! 1. exact `(name, state)` key,
//! 2. the alias table, then the exact key with the alias,
//! 3. `(normalized name, state)`,
//! 4. a containment scan over the state's groups, in insertion order.
//!
//! Within the matched group a [`UnitSelector`] picks the unit. Matched groups
//! are recorded in a [`ConsumedGroups`] set so the merge engine does not emit
//! them again as research-only records.

use std::collections::{HashMap, HashSet};

use crate::{
  alias::AliasTable,
  normalize::{contains_either, normalize, numeric_portion, state_key},
  record::{FacilityRecord, ResearchUnit},
};

// ─── Index ───────────────────────────────────────────────────────────────────

/// Position of a group inside a [`ResearchIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(usize);

/// All research units sharing a `(facility name, state)` key, in input order.
#[derive(Debug, Clone)]
pub struct ResearchGroup {
  pub facility_name: String,
  pub state:         String,
  pub normalized:    String,
  /// Never empty.
  pub units:         Vec<ResearchUnit>,
}

/// Research units grouped for matching.
///
/// Groups keep first-seen order; every lookup that can see several candidates
/// returns the earliest one.
#[derive(Debug, Clone, Default)]
pub struct ResearchIndex {
  groups:        Vec<ResearchGroup>,
  by_key:        HashMap<(String, String), GroupId>,
  by_normalized: HashMap<(String, String), GroupId>,
  by_state:      HashMap<String, Vec<GroupId>>,
  dropped:       usize,
}

impl ResearchIndex {
  /// Group `units`.
  ///
  /// Units without a facility name are dropped, as are repeats of an already
  /// seen `(facility slug, unit name)` identity.
  pub fn build(units: impl IntoIterator<Item = ResearchUnit>) -> Self {
    let mut index = Self::default();
    let mut identities: HashSet<(String, String)> = HashSet::new();

    for unit in units {
      let name = unit.facility_name.trim().to_owned();
      if name.is_empty()
        || !identities.insert((unit.facility_slug.clone(), unit.unit_name.clone()))
      {
        index.dropped += 1;
        continue;
      }
      let state = state_key(&unit.state);
      let key = (name.clone(), state.clone());

      if let Some(&id) = index.by_key.get(&key) {
        index.groups[id.0].units.push(unit);
        continue;
      }

      let id = GroupId(index.groups.len());
      let normalized = normalize(&name);
      if !normalized.is_empty() {
        index
          .by_normalized
          .entry((normalized.clone(), state.clone()))
          .or_insert(id);
      }
      index.by_state.entry(state.clone()).or_default().push(id);
      index.by_key.insert(key, id);
      index.groups.push(ResearchGroup {
        facility_name: name,
        state,
        normalized,
        units: vec![unit],
      });
    }
    index
  }

  pub fn group(&self, id: GroupId) -> &ResearchGroup { &self.groups[id.0] }

  /// Groups with their ids, in first-seen order.
  pub fn groups(&self) -> impl Iterator<Item = (GroupId, &ResearchGroup)> {
    self.groups.iter().enumerate().map(|(i, g)| (GroupId(i), g))
  }

  pub fn len(&self) -> usize { self.groups.len() }

  pub fn is_empty(&self) -> bool { self.groups.is_empty() }

  /// Units rejected while building (no name, or a repeated identity).
  pub fn dropped(&self) -> usize { self.dropped }

  fn exact(&self, name: &str, state: &str) -> Option<GroupId> {
    self
      .by_key
      .get(&(name.trim().to_owned(), state.to_owned()))
      .copied()
  }

  fn normalized(&self, normalized: &str, state: &str) -> Option<GroupId> {
    self
      .by_normalized
      .get(&(normalized.to_owned(), state.to_owned()))
      .copied()
  }

  /// First group in the state whose normalised name contains, or is contained
  /// in, `normalized`. Several candidates are not an error: insertion order
  /// decides.
  fn first_containment(&self, normalized: &str, state: &str) -> Option<GroupId> {
    self
      .by_state
      .get(state)?
      .iter()
      .copied()
      .find(|id| contains_either(&self.groups[id.0].normalized, normalized))
  }
}

// ─── Unit selection ──────────────────────────────────────────────────────────

/// Picks the position of the unit within a matched group that corresponds to
/// an authoritative generator id. `units` is never empty; the result must be
/// a valid position.
pub type UnitSelector = fn(generator_id: &str, units: &[ResearchUnit]) -> usize;

/// Default unit selection.
///
/// Prefers a unit whose digits equal the generator id's digits ("Unit 2" for
/// generator "2" or "CT2"), then a unit whose name contains the generator id
/// (or the reverse). Falls back to the first unit when neither relation
/// holds, which is arbitrary when unit-level identity is unknown.
pub fn select_by_unit_id(generator_id: &str, units: &[ResearchUnit]) -> usize {
  let wanted = generator_id.trim().to_ascii_lowercase();
  let digits = numeric_portion(&wanted);

  if !digits.is_empty()
    && let Some(i) = units
      .iter()
      .position(|u| numeric_portion(&u.unit_name) == digits)
  {
    return i;
  }

  if !wanted.is_empty()
    && let Some(i) = units.iter().position(|u| {
      let name = u.unit_name.trim().to_ascii_lowercase();
      !name.is_empty() && (name.contains(&wanted) || wanted.contains(&name))
    })
  {
    return i;
  }

  0
}

// ─── Matcher ─────────────────────────────────────────────────────────────────

/// Which tier produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
  ExactKey,
  Alias,
  NormalizedName,
  Containment,
}

/// A matched group and the unit chosen within it.
#[derive(Debug, Clone, Copy)]
pub struct Match<'a> {
  pub group: GroupId,
  pub tier:  MatchTier,
  pub unit:  &'a ResearchUnit,
}

/// Groups already claimed by an authoritative record during one
/// reconciliation run.
#[derive(Debug, Clone, Default)]
pub struct ConsumedGroups(HashSet<GroupId>);

impl ConsumedGroups {
  pub fn mark(&mut self, id: GroupId) { self.0.insert(id); }

  pub fn contains(&self, id: GroupId) -> bool { self.0.contains(&id) }
}

#[derive(Debug, Clone, Copy)]
pub struct Matcher<'a> {
  aliases:     &'a AliasTable,
  select_unit: UnitSelector,
}

impl<'a> Matcher<'a> {
  pub fn new(aliases: &'a AliasTable) -> Self {
    Self { aliases, select_unit: select_by_unit_id }
  }

  /// Replace the unit selection strategy.
  pub fn with_unit_selector(mut self, select_unit: UnitSelector) -> Self {
    self.select_unit = select_unit;
    self
  }

  /// Find the research group for `record` without recording consumption.
  pub fn find<'i>(
    &self,
    record: &FacilityRecord,
    index: &'i ResearchIndex,
  ) -> Option<Match<'i>> {
    let (group, tier) = self.find_group(record, index)?;
    let units = &index.group(group).units;
    let position = (self.select_unit)(&record.generator_id, units);
    let unit = units.get(position).or_else(|| units.first())?;
    Some(Match { group, tier, unit })
  }

  /// Find the research group for `record` and mark it consumed.
  pub fn find_and_consume<'i>(
    &self,
    record: &FacilityRecord,
    index: &'i ResearchIndex,
    consumed: &mut ConsumedGroups,
  ) -> Option<Match<'i>> {
    let found = self.find(record, index)?;
    consumed.mark(found.group);
    Some(found)
  }

  fn find_group(
    &self,
    record: &FacilityRecord,
    index: &ResearchIndex,
  ) -> Option<(GroupId, MatchTier)> {
    let name = record.facility_name.trim();
    if name.is_empty() {
      return None;
    }
    let state = state_key(&record.state);

    if let Some(id) = index.exact(name, &state) {
      return Some((id, MatchTier::ExactKey));
    }

    if let Some(alias) = self.aliases.alias_for(name)
      && let Some(id) = index.exact(alias, &state)
    {
      return Some((id, MatchTier::Alias));
    }

    let normalized = normalize(name);
    if normalized.is_empty() {
      return None;
    }

    if let Some(id) = index.normalized(&normalized, &state) {
      return Some((id, MatchTier::NormalizedName));
    }

    index
      .first_containment(&normalized, &state)
      .map(|id| (id, MatchTier::Containment))
  }
}
