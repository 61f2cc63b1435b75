//! Content: a canonical, content-addressed snapshot of a page.
//!
//! Content rows are created once per distinct raw form and never mutated or
//! deleted; any past observation must stay resolvable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Fingerprint;

/// A stored snapshot body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
  pub fingerprint:   Fingerprint,
  /// Canonical markup exactly as produced by the extractor.
  pub raw:           String,
  /// Secondary rendering derived purely from `raw` (markdown).
  pub derived:       String,
  /// When this body was first stored; never changes.
  pub first_seen_at: DateTime<Utc>,
}

/// Result of putting a raw form into the content store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredContent {
  pub fingerprint: Fingerprint,
  /// `false` when an identical body was already stored.
  pub created:     bool,
}
