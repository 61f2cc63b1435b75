//! Entity: one tracked page and its current state.
//!
//! Unlike content and observations, an entity is overwritten on every
//! observation: it represents the latest known metadata only. History lives
//! in the observation log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Fingerprint;

/// Mutable descriptive fields of an entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayMetadata {
  pub title: String,
  /// Site-defined lifecycle state, e.g. "active" or "archived".
  pub state: String,
}

/// The current-state row for one identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
  /// Minted on first sight of `identifier`; stable across every upsert.
  pub entity_id:           Uuid,
  /// Externally stable key, e.g. the canonical page URL.
  pub identifier:          String,
  pub metadata:            DisplayMetadata,
  /// Content most recently observed for this entity.
  pub current_fingerprint: Fingerprint,
  pub first_seen_at:       DateTime<Utc>,
  pub updated_at:          DateTime<Utc>,
}
