//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with fixed microsecond precision
//! so that lexical order equals chronological order. UUIDs are stored as
//! hyphenated lowercase strings, fingerprints as their hex encoding.

use chrono::{DateTime, SecondsFormat, SubsecRound as _, Utc};
use civic_core::{
  Fingerprint,
  content::Content,
  entity::{DisplayMetadata, Entity},
  observation::Observation,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

/// Drop precision the column cannot hold, so values read back compare equal
/// to the values written.
pub fn normalize_dt(dt: DateTime<Utc>) -> DateTime<Utc> { dt.trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Fingerprint ──────────────────────────────────────────────────────────────

pub fn decode_fingerprint(s: &str) -> Result<Fingerprint> {
  Ok(Fingerprint::parse(s)?)
}

// ─── Raw row types ────────────────────────────────────────────────────────────

/// Column values of a `contents` row before decoding.
pub struct RawContent {
  pub fingerprint:   String,
  pub raw:           String,
  pub derived:       String,
  pub first_seen_at: String,
}

impl RawContent {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      fingerprint:   row.get(0)?,
      raw:           row.get(1)?,
      derived:       row.get(2)?,
      first_seen_at: row.get(3)?,
    })
  }

  pub fn into_content(self) -> Result<Content> {
    Ok(Content {
      fingerprint:   decode_fingerprint(&self.fingerprint)?,
      raw:           self.raw,
      derived:       self.derived,
      first_seen_at: decode_dt(&self.first_seen_at)?,
    })
  }
}

/// Column values of an `entities` row before decoding.
pub struct RawEntity {
  pub entity_id:           String,
  pub identifier:          String,
  pub title:               String,
  pub state:               String,
  pub current_fingerprint: String,
  pub first_seen_at:       String,
  pub updated_at:          String,
}

impl RawEntity {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      entity_id:           row.get(0)?,
      identifier:          row.get(1)?,
      title:               row.get(2)?,
      state:               row.get(3)?,
      current_fingerprint: row.get(4)?,
      first_seen_at:       row.get(5)?,
      updated_at:          row.get(6)?,
    })
  }

  pub fn into_entity(self) -> Result<Entity> {
    Ok(Entity {
      entity_id:           decode_uuid(&self.entity_id)?,
      identifier:          self.identifier,
      metadata:            DisplayMetadata {
        title: self.title,
        state: self.state,
      },
      current_fingerprint: decode_fingerprint(&self.current_fingerprint)?,
      first_seen_at:       decode_dt(&self.first_seen_at)?,
      updated_at:          decode_dt(&self.updated_at)?,
    })
  }
}

/// Column values of an `observations` row before decoding.
pub struct RawObservation {
  pub observation_id: String,
  pub entity_id:      String,
  pub observed_at:    String,
  pub fingerprint:    String,
}

impl RawObservation {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      observation_id: row.get(0)?,
      entity_id:      row.get(1)?,
      observed_at:    row.get(2)?,
      fingerprint:    row.get(3)?,
    })
  }

  pub fn into_observation(self) -> Result<Observation> {
    Ok(Observation {
      observation_id: decode_uuid(&self.observation_id)?,
      entity_id:      decode_uuid(&self.entity_id)?,
      observed_at:    decode_dt(&self.observed_at)?,
      fingerprint:    decode_fingerprint(&self.fingerprint)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn timestamps_sort_lexically() {
    let early = Utc.timestamp_opt(1_000, 5_000).unwrap();
    let late = Utc.timestamp_opt(1_000, 50_000).unwrap();
    assert!(encode_dt(early) < encode_dt(late));
  }

  #[test]
  fn normalized_timestamp_survives_encoding() {
    let at = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
    let at = normalize_dt(at);
    assert_eq!(decode_dt(&encode_dt(at)).unwrap(), at);
  }
}
