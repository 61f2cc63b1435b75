//! [`SqliteStore`]: the SQLite implementation of [`SnapshotStore`].

use std::{path::Path, sync::Arc};

use chrono::{DateTime, Utc};
use civic_core::{
  Fingerprint,
  content::{Content, StoredContent},
  entity::{DisplayMetadata, Entity},
  fingerprint::FINGERPRINT_SCHEME,
  observation::Observation,
  source::{Renderer, Snapshot},
  store::{Recorded, SnapshotStore, StoreStats},
};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use crate::{
  Error, Result, content, encode::normalize_dt, entity, observation, record,
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A snapshot store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection and renderer are
/// reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
  renderer:        Arc<dyn Renderer>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  ///
  /// `renderer` produces the derived form of every newly stored body.
  pub async fn open(
    path: impl AsRef<Path>,
    renderer: impl Renderer + 'static,
  ) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn, renderer: Arc::new(renderer) };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory(renderer: impl Renderer + 'static) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, renderer: Arc::new(renderer) };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .with_conn(|conn| {
        conn.execute_batch(SCHEMA)?;
        check_scheme(conn)
      })
      .await
  }

  /// Run `f` on the connection thread, carrying our own error type through.
  pub(crate) async fn with_conn<T, F>(&self, f: F) -> Result<T>
  where
    F: FnOnce(&mut rusqlite::Connection) -> Result<T> + Send + 'static,
    T: Send + 'static,
  {
    self.conn.call(move |conn| Ok(f(conn))).await?
  }
}

/// Record the fingerprint scheme on first open; refuse a store written under
/// another one.
fn check_scheme(conn: &rusqlite::Connection) -> Result<()> {
  let stored: Option<String> = conn
    .query_row(
      "SELECT value FROM store_meta WHERE key = 'fingerprint_scheme'",
      [],
      |r| r.get(0),
    )
    .optional()?;

  match stored {
    None => {
      conn.execute(
        "INSERT INTO store_meta (key, value) VALUES ('fingerprint_scheme', ?1)",
        rusqlite::params![FINGERPRINT_SCHEME],
      )?;
      Ok(())
    }
    Some(s) if s == FINGERPRINT_SCHEME => Ok(()),
    Some(s) => Err(Error::SchemeMismatch {
      stored:   s,
      expected: FINGERPRINT_SCHEME,
    }),
  }
}

// ─── SnapshotStore impl ──────────────────────────────────────────────────────

impl SnapshotStore for SqliteStore {
  type Error = Error;

  // ── Single-table writes ───────────────────────────────────────────────────

  async fn put_content(&self, raw: String) -> Result<StoredContent> {
    let renderer = Arc::clone(&self.renderer);
    let at = normalize_dt(Utc::now());

    self
      .with_conn(move |conn| {
        let tx = conn.transaction()?;
        let stored = content::put(&tx, &raw, renderer.as_ref(), at)?;
        tx.commit()?;
        Ok(stored)
      })
      .await
  }

  async fn upsert_entity(
    &self,
    identifier:  String,
    metadata:    DisplayMetadata,
    fingerprint: Fingerprint,
    at:          DateTime<Utc>,
  ) -> Result<Uuid> {
    let at = normalize_dt(at);

    self
      .with_conn(move |conn| {
        entity::upsert(conn, &identifier, &metadata, &fingerprint, at)
      })
      .await
  }

  async fn append_observation(
    &self,
    entity_id:   Uuid,
    fingerprint: Fingerprint,
    at:          DateTime<Utc>,
  ) -> Result<Observation> {
    let at = normalize_dt(at);

    self
      .with_conn(move |conn| observation::append(conn, entity_id, &fingerprint, at))
      .await
  }

  // ── Atomic unit ───────────────────────────────────────────────────────────

  async fn record(&self, snapshot: Snapshot, at: DateTime<Utc>) -> Result<Recorded> {
    let renderer = Arc::clone(&self.renderer);

    self
      .with_conn(move |conn| record::record(conn, &snapshot, renderer.as_ref(), at))
      .await
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn get_content(&self, fingerprint: Fingerprint) -> Result<Option<Content>> {
    self
      .with_conn(move |conn| content::get(conn, &fingerprint))
      .await
  }

  async fn get_entity(&self, identifier: String) -> Result<Option<Entity>> {
    self
      .with_conn(move |conn| entity::get(conn, &identifier))
      .await
  }

  async fn list_entities(&self) -> Result<Vec<Entity>> {
    self.with_conn(|conn| entity::list(conn)).await
  }

  async fn history(&self, identifier: String) -> Result<Vec<Observation>> {
    self
      .with_conn(move |conn| observation::history(conn, &identifier))
      .await
  }

  async fn stats(&self) -> Result<StoreStats> {
    self.with_conn(|conn| record::stats(conn)).await
  }

  async fn verify_contents(&self) -> Result<Vec<Fingerprint>> {
    self.with_conn(|conn| content::verify(conn)).await
  }
}
