//! The entity registry: current state keyed by identifier.

use chrono::{DateTime, Utc};
use civic_core::{
  Fingerprint,
  entity::{DisplayMetadata, Entity},
};
use rusqlite::{Connection, OptionalExtension as _};
use uuid::Uuid;

use crate::{
  Result,
  encode::{RawEntity, decode_uuid, encode_dt, encode_uuid},
};

const ENTITY_COLUMNS: &str = "entity_id, identifier, title, state, \
                              current_fingerprint, first_seen_at, updated_at";

/// Create or overwrite the entity for `identifier` and return its id.
///
/// A single `INSERT .. ON CONFLICT` statement: the unique index on
/// `identifier` is the only arbiter, so repeated calls can never produce a
/// second row. On conflict the freshly minted id is discarded and the
/// existing one returned.
pub fn upsert(
  conn: &Connection,
  identifier: &str,
  metadata: &DisplayMetadata,
  fingerprint: &Fingerprint,
  at: DateTime<Utc>,
) -> Result<Uuid> {
  if identifier.trim().is_empty() {
    return Err(civic_core::Error::EmptyIdentifier.into());
  }

  let id_str: String = conn.query_row(
    "INSERT INTO entities (
       entity_id, identifier, title, state,
       current_fingerprint, first_seen_at, updated_at
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
     ON CONFLICT (identifier) DO UPDATE SET
       title               = excluded.title,
       state               = excluded.state,
       current_fingerprint = excluded.current_fingerprint,
       updated_at          = excluded.updated_at
     RETURNING entity_id",
    rusqlite::params![
      encode_uuid(Uuid::new_v4()),
      identifier,
      metadata.title,
      metadata.state,
      fingerprint.as_str(),
      encode_dt(at),
    ],
    |r| r.get(0),
  )?;

  decode_uuid(&id_str)
}

pub fn get(conn: &Connection, identifier: &str) -> Result<Option<Entity>> {
  let raw = conn
    .query_row(
      &format!("SELECT {ENTITY_COLUMNS} FROM entities WHERE identifier = ?1"),
      rusqlite::params![identifier],
      RawEntity::from_row,
    )
    .optional()?;

  raw.map(RawEntity::into_entity).transpose()
}

pub fn list(conn: &Connection) -> Result<Vec<Entity>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {ENTITY_COLUMNS} FROM entities ORDER BY identifier"
  ))?;
  let raws = stmt
    .query_map([], RawEntity::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  raws.into_iter().map(RawEntity::into_entity).collect()
}
