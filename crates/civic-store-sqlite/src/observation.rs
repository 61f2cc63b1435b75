//! The observation log. Rows are only ever inserted.

use chrono::{DateTime, Utc};
use civic_core::{Fingerprint, observation::Observation};
use rusqlite::Connection;
use uuid::Uuid;

use crate::{
  Result,
  encode::{RawObservation, encode_dt, encode_uuid},
};

/// Insert one observation. Foreign keys reject unknown entities or bodies.
pub fn append(
  conn: &Connection,
  entity_id: Uuid,
  fingerprint: &Fingerprint,
  at: DateTime<Utc>,
) -> Result<Observation> {
  let observation = Observation {
    observation_id: Uuid::new_v4(),
    entity_id,
    observed_at: at,
    fingerprint: fingerprint.clone(),
  };

  conn.execute(
    "INSERT INTO observations (observation_id, entity_id, observed_at, fingerprint)
     VALUES (?1, ?2, ?3, ?4)",
    rusqlite::params![
      encode_uuid(observation.observation_id),
      encode_uuid(entity_id),
      encode_dt(at),
      fingerprint.as_str(),
    ],
  )?;

  Ok(observation)
}

/// Timeline for one identifier, oldest first; ties keep insertion order.
pub fn history(conn: &Connection, identifier: &str) -> Result<Vec<Observation>> {
  let mut stmt = conn.prepare(
    "SELECT o.observation_id, o.entity_id, o.observed_at, o.fingerprint
     FROM observations o
     JOIN entities e ON e.entity_id = o.entity_id
     WHERE e.identifier = ?1
     ORDER BY o.observed_at, o.rowid",
  )?;
  let raws = stmt
    .query_map(rusqlite::params![identifier], RawObservation::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  raws.into_iter().map(RawObservation::into_observation).collect()
}
