//! Facility name normalisation for cross-source matching.
//!
//! Sources spell the same plant differently ("Gaston Steam Plant",
//! "E.C. Gaston", "Gaston Station"). Normalising strips punctuation, case and
//! generic facility-type words so the distinctive part of the name remains.

/// Generic facility-type words that carry no identity.
pub const STOPWORDS: [&str; 9] = [
  "steam",
  "plant",
  "station",
  "generating",
  "power",
  "energy",
  "center",
  "complex",
  "fossil",
];

/// Canonicalise a facility name into a comparable token string.
///
/// Lower-cases, drops every character that is neither ASCII alphanumeric nor
/// whitespace, removes [`STOPWORDS`], and joins the remaining words with a
/// single space.
pub fn normalize(name: &str) -> String {
  let cleaned: String = name
    .chars()
    .filter_map(|c| {
      if c.is_ascii_alphanumeric() {
        Some(c.to_ascii_lowercase())
      } else if c.is_whitespace() {
        Some(' ')
      } else {
        None
      }
    })
    .collect();

  cleaned
    .split_whitespace()
    .filter(|word| !STOPWORDS.contains(word))
    .collect::<Vec<_>>()
    .join(" ")
}

/// Whether one normalised name contains the other.
///
/// An empty name matches nothing: a name made only of stopwords or
/// punctuation carries no identity.
pub fn contains_either(a: &str, b: &str) -> bool {
  if a.is_empty() || b.is_empty() {
    return false;
  }
  a.contains(b) || b.contains(a)
}

/// Two raw names are candidate-equal when their normalised forms are equal or
/// one contains the other. Permissive by construction: short names can match
/// unrelated longer ones.
pub fn candidate_equal(a: &str, b: &str) -> bool {
  contains_either(&normalize(a), &normalize(b))
}

/// Postal state codes are compared trimmed and upper-cased.
pub fn state_key(state: &str) -> String { state.trim().to_ascii_uppercase() }

/// The ASCII digits of a unit identifier, in order ("CT2A" → "2").
pub fn numeric_portion(id: &str) -> String {
  id.chars().filter(char::is_ascii_digit).collect()
}
