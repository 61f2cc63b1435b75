//! Narrowing the discovered entity list before a crawl.

use std::collections::BTreeSet;

use crate::source::Discovered;

/// The site's own landing page shows up among the project tiles.
pub const DEFAULT_DENYLIST: &[&str] =
  &["https://www.shapeyourcityhalifax.ca/shape-your-city-halifax"];

/// Allow-list / denylist over entity identifiers.
///
/// The denylist always wins. Without an allow-list every non-denied entity
/// is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryFilter {
  allow: Option<BTreeSet<String>>,
  deny:  BTreeSet<String>,
}

impl Default for DiscoveryFilter {
  fn default() -> Self {
    Self {
      allow: None,
      deny:  DEFAULT_DENYLIST.iter().map(|s| (*s).to_owned()).collect(),
    }
  }
}

impl DiscoveryFilter {
  /// A filter with the default denylist and no allow-list.
  pub fn new() -> Self { Self::default() }

  /// Build the allow-list from a comma-separated string. Blank entries are
  /// ignored; a string with no entries leaves the filter unrestricted.
  pub fn from_csv(csv: &str) -> Self {
    Self::default().with_allow(csv.split(','))
  }

  /// Restrict processing to `identifiers`. An empty iterator clears the
  /// allow-list.
  pub fn with_allow<I, S>(mut self, identifiers: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let allow: BTreeSet<String> = identifiers
      .into_iter()
      .map(|s| s.as_ref().trim().to_owned())
      .filter(|s| !s.is_empty())
      .collect();
    self.allow = (!allow.is_empty()).then_some(allow);
    self
  }

  /// Deny `identifiers` in addition to [`DEFAULT_DENYLIST`], which stays in
  /// effect.
  pub fn with_extra_deny<I, S>(mut self, identifiers: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    self.deny.extend(
      identifiers
        .into_iter()
        .map(|s| s.as_ref().trim().to_owned())
        .filter(|s| !s.is_empty()),
    );
    self
  }

  pub fn allows(&self, identifier: &str) -> bool {
    if self.deny.contains(identifier) {
      return false;
    }
    match &self.allow {
      Some(allow) => allow.contains(identifier),
      None => true,
    }
  }

  /// Keep the allowed entities, preserving discovery order.
  pub fn apply(&self, discovered: Vec<Discovered>) -> Vec<Discovered> {
    discovered
      .into_iter()
      .filter(|d| self.allows(&d.identifier))
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn found(ids: &[&str]) -> Vec<Discovered> {
    ids
      .iter()
      .map(|id| Discovered { identifier: (*id).into(), state: "active".into() })
      .collect()
  }

  fn ids(list: &[Discovered]) -> Vec<&str> {
    list.iter().map(|d| d.identifier.as_str()).collect()
  }

  #[test]
  fn no_allow_list_keeps_everything_but_denied() {
    let filter = DiscoveryFilter::new();
    let kept = filter.apply(found(&[
      "https://example.org/b",
      DEFAULT_DENYLIST[0],
      "https://example.org/a",
    ]));
    assert_eq!(ids(&kept), ["https://example.org/b", "https://example.org/a"]);
  }

  #[test]
  fn allow_list_intersects_in_discovery_order() {
    let filter = DiscoveryFilter::from_csv("c,a");
    let kept = filter.apply(found(&["a", "b", "c"]));
    assert_eq!(ids(&kept), ["a", "c"]);
  }

  #[test]
  fn denylist_beats_allow_list() {
    let filter = DiscoveryFilter::new().with_allow([DEFAULT_DENYLIST[0], "a"]);
    let kept = filter.apply(found(&[DEFAULT_DENYLIST[0], "a"]));
    assert_eq!(ids(&kept), ["a"]);
  }

  #[test]
  fn blank_csv_means_process_all() {
    assert_eq!(DiscoveryFilter::from_csv(""), DiscoveryFilter::new());
    assert_eq!(DiscoveryFilter::from_csv(" , "), DiscoveryFilter::new());
  }

  #[test]
  fn csv_entries_are_trimmed() {
    let filter = DiscoveryFilter::from_csv(" a , b");
    assert!(filter.allows("a"));
    assert!(filter.allows("b"));
    assert!(!filter.allows("c"));
  }

  #[test]
  fn duplicates_are_kept() {
    let kept = DiscoveryFilter::new().apply(found(&["a", "a"]));
    assert_eq!(ids(&kept), ["a", "a"]);
  }

  #[test]
  fn extra_deny_keeps_default_entries() {
    let filter = DiscoveryFilter::new().with_extra_deny(["x", " "]);
    assert!(!filter.allows(DEFAULT_DENYLIST[0]));
    assert!(!filter.allows("x"));
    assert!(filter.allows("y"));

    let filter = DiscoveryFilter::from_csv(DEFAULT_DENYLIST[0])
      .with_extra_deny(Vec::<String>::new());
    assert!(!filter.allows(DEFAULT_DENYLIST[0]));
  }
}
