//! The `SnapshotStore` trait and supporting result types.
//!
//! The trait is implemented by storage backends (e.g. `civic-store-sqlite`).
//! The crawl driver depends on this abstraction, not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  Fingerprint,
  content::{Content, StoredContent},
  entity::{DisplayMetadata, Entity},
  observation::Observation,
  source::Snapshot,
};

// ─── Result types ────────────────────────────────────────────────────────────

/// Outcome of one atomic record unit.
#[derive(Debug, Clone)]
pub struct Recorded {
  pub entity_id:       Uuid,
  pub observation:     Observation,
  /// `true` when this snapshot introduced a previously unseen body.
  pub content_created: bool,
}

/// Row counts for the three tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
  pub contents:     u64,
  pub entities:     u64,
  pub observations: u64,
}

// ─── Traits ──────────────────────────────────────────────────────────────────

/// Errors surfaced by a [`SnapshotStore`].
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// Whether a store invariant was violated (fingerprint collision, broken
  /// reference, duplicate key). Such errors must stop a crawl regardless of
  /// its error policy.
  fn is_integrity_violation(&self) -> bool;
}

/// Abstraction over a snapshot store backend.
///
/// Content is write-once and deduplicated by fingerprint, entities are
/// upserted by identifier, and observations are append-only.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait SnapshotStore: Send + Sync {
  type Error: StoreError;

  // ── Single-table writes ───────────────────────────────────────────────

  /// Store `raw` unless an identical body already exists.
  ///
  /// Returns an error if a different body is stored under the same
  /// fingerprint.
  fn put_content(
    &self,
    raw: String,
  ) -> impl Future<Output = Result<StoredContent, Self::Error>> + Send + '_;

  /// Create or overwrite the entity for `identifier`, returning its stable id.
  fn upsert_entity(
    &self,
    identifier: String,
    metadata: DisplayMetadata,
    fingerprint: Fingerprint,
    at: DateTime<Utc>,
  ) -> impl Future<Output = Result<Uuid, Self::Error>> + Send + '_;

  /// Append one observation. Both references must already exist.
  fn append_observation(
    &self,
    entity_id: Uuid,
    fingerprint: Fingerprint,
    at: DateTime<Utc>,
  ) -> impl Future<Output = Result<Observation, Self::Error>> + Send + '_;

  // ── Atomic unit ───────────────────────────────────────────────────────

  /// Put content, upsert the entity and append an observation as one
  /// all-or-nothing unit.
  fn record(
    &self,
    snapshot: Snapshot,
    at: DateTime<Utc>,
  ) -> impl Future<Output = Result<Recorded, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  fn get_content(
    &self,
    fingerprint: Fingerprint,
  ) -> impl Future<Output = Result<Option<Content>, Self::Error>> + Send + '_;

  fn get_entity(
    &self,
    identifier: String,
  ) -> impl Future<Output = Result<Option<Entity>, Self::Error>> + Send + '_;

  /// All entities, ordered by identifier.
  fn list_entities(
    &self,
  ) -> impl Future<Output = Result<Vec<Entity>, Self::Error>> + Send + '_;

  /// The observation timeline for `identifier`, oldest first. Empty if the
  /// identifier has never been observed.
  fn history(
    &self,
    identifier: String,
  ) -> impl Future<Output = Result<Vec<Observation>, Self::Error>> + Send + '_;

  fn stats(
    &self,
  ) -> impl Future<Output = Result<StoreStats, Self::Error>> + Send + '_;

  /// Re-hash every stored body and return the fingerprints whose body no
  /// longer matches.
  fn verify_contents(
    &self,
  ) -> impl Future<Output = Result<Vec<Fingerprint>, Self::Error>> + Send + '_;
}
