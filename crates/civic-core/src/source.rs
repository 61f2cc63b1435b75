//! Plugin boundaries: how pages reach the store.
//!
//! The store only sees [`Snapshot`]s. Fetching, site-specific extraction and
//! rendering of the derived form are supplied by other crates through the
//! traits below.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::entity::DisplayMetadata;

// ─── Discovery ───────────────────────────────────────────────────────────────

/// An entity found on a listing page, before its own page is fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discovered {
  pub identifier: String,
  /// State advertised by the listing (e.g. a `data-state` attribute).
  pub state:      String,
}

// ─── Snapshot ────────────────────────────────────────────────────────────────

/// One extracted page, ready to be recorded.
///
/// `raw` must be canonical: fetching unchanged source content again has to
/// produce byte-identical `raw`, otherwise deduplication is meaningless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
  pub identifier: String,
  pub metadata:   DisplayMetadata,
  pub raw:        String,
}

// ─── Traits ──────────────────────────────────────────────────────────────────

/// Derives the secondary representation of a content body.
///
/// Implementations must be pure: the output depends on `raw` alone.
pub trait Renderer: Send + Sync {
  fn render(&self, raw: &str) -> crate::Result<String>;
}

/// Retrieves a page body. Errors propagate unmodified; callers never retry.
pub trait Fetcher: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn fetch<'a>(
    &'a self,
    url: &'a str,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;
}

/// Turns fetched pages into discovered entities and snapshots.
pub trait Extractor: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Enumerate the entities linked from a listing page, in page order.
  fn discover(
    &self,
    listing_url: &str,
    body: &str,
  ) -> Result<Vec<Discovered>, Self::Error>;

  /// Canonicalize one entity page.
  fn extract(
    &self,
    discovered: &Discovered,
    body: &str,
  ) -> Result<Snapshot, Self::Error>;
}
