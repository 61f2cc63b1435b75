//! The content store: bodies addressed by fingerprint.

use chrono::{DateTime, Utc};
use civic_core::{
  Fingerprint,
  content::{Content, StoredContent},
  source::Renderer,
};
use rusqlite::{Connection, OptionalExtension as _};

use crate::{
  Error, Result,
  encode::{RawContent, decode_fingerprint, encode_dt},
};

/// Store `raw` unless it is already present.
///
/// An existing row is never rewritten. If the stored bytes under the same
/// fingerprint differ from `raw`, the digest is no longer a content address
/// and the write is refused.
pub fn put(
  conn: &Connection,
  raw: &str,
  renderer: &dyn Renderer,
  at: DateTime<Utc>,
) -> Result<StoredContent> {
  let fingerprint = Fingerprint::of(raw);

  let existing: Option<String> = conn
    .query_row(
      "SELECT raw FROM contents WHERE fingerprint = ?1",
      rusqlite::params![fingerprint.as_str()],
      |r| r.get(0),
    )
    .optional()?;

  if let Some(existing) = existing {
    if existing != raw {
      return Err(Error::FingerprintCollision(fingerprint));
    }
    return Ok(StoredContent { fingerprint, created: false });
  }

  let derived = renderer.render(raw)?;
  conn.execute(
    "INSERT INTO contents (fingerprint, raw, derived, first_seen_at)
     VALUES (?1, ?2, ?3, ?4)",
    rusqlite::params![fingerprint.as_str(), raw, derived, encode_dt(at)],
  )?;

  Ok(StoredContent { fingerprint, created: true })
}

pub fn get(conn: &Connection, fingerprint: &Fingerprint) -> Result<Option<Content>> {
  let raw = conn
    .query_row(
      "SELECT fingerprint, raw, derived, first_seen_at
       FROM contents WHERE fingerprint = ?1",
      rusqlite::params![fingerprint.as_str()],
      RawContent::from_row,
    )
    .optional()?;

  raw.map(RawContent::into_content).transpose()
}

/// Fingerprints whose stored body no longer hashes to them.
pub fn verify(conn: &Connection) -> Result<Vec<Fingerprint>> {
  let mut stmt =
    conn.prepare("SELECT fingerprint, raw FROM contents ORDER BY fingerprint")?;
  let rows = stmt
    .query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?)))?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  rows
    .into_iter()
    .filter(|(fp, raw)| Fingerprint::of(raw).as_str() != fp)
    .map(|(fp, _)| decode_fingerprint(&fp))
    .collect()
}
