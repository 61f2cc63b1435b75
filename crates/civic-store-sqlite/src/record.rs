//! The atomic record unit: content, entity and observation in one
//! transaction.

use chrono::{DateTime, Utc};
use civic_core::{
  source::{Renderer, Snapshot},
  store::{Recorded, StoreStats},
};
use rusqlite::{Connection, TransactionBehavior};

use crate::{Result, content, encode::normalize_dt, entity, observation};

/// Record one snapshot.
///
/// The order is fixed: the body must exist before the entity points at it,
/// and the entity before the observation references it. Every early return
/// drops the transaction, which rolls it back; only the final `commit`
/// publishes the three writes.
pub fn record(
  conn: &mut Connection,
  snapshot: &Snapshot,
  renderer: &dyn Renderer,
  at: DateTime<Utc>,
) -> Result<Recorded> {
  let at = normalize_dt(at);
  let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

  let stored = content::put(&tx, &snapshot.raw, renderer, at)?;
  let entity_id = entity::upsert(
    &tx,
    &snapshot.identifier,
    &snapshot.metadata,
    &stored.fingerprint,
    at,
  )?;
  let observation = observation::append(&tx, entity_id, &stored.fingerprint, at)?;

  tx.commit()?;

  tracing::debug!(
    identifier = %snapshot.identifier,
    fingerprint = %stored.fingerprint,
    created = stored.created,
    "recorded snapshot"
  );

  Ok(Recorded {
    entity_id,
    observation,
    content_created: stored.created,
  })
}

pub fn stats(conn: &Connection) -> Result<StoreStats> {
  let (contents, entities, observations): (i64, i64, i64) = conn.query_row(
    "SELECT
       (SELECT COUNT(*) FROM contents),
       (SELECT COUNT(*) FROM entities),
       (SELECT COUNT(*) FROM observations)",
    [],
    |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
  )?;

  Ok(StoreStats {
    contents:     contents as u64,
    entities:     entities as u64,
    observations: observations as u64,
  })
}
