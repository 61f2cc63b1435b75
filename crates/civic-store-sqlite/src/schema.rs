//! SQL schema for the civic SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`; a change of fingerprint scheme is detected through
//! the `store_meta` table.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS store_meta (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- Content-addressed bodies. Written once, never updated or deleted.
CREATE TABLE IF NOT EXISTS contents (
    fingerprint   TEXT PRIMARY KEY,   -- hex digest of raw
    raw           TEXT NOT NULL,      -- canonical markup
    derived       TEXT NOT NULL,      -- markdown rendering of raw
    first_seen_at TEXT NOT NULL
);

-- Current state per tracked page; overwritten on every observation.
CREATE TABLE IF NOT EXISTS entities (
    entity_id           TEXT PRIMARY KEY,
    identifier          TEXT NOT NULL UNIQUE,
    title               TEXT NOT NULL,
    state               TEXT NOT NULL,
    current_fingerprint TEXT NOT NULL REFERENCES contents(fingerprint),
    first_seen_at       TEXT NOT NULL,
    updated_at          TEXT NOT NULL
);

-- Observations are strictly append-only.
CREATE TABLE IF NOT EXISTS observations (
    observation_id TEXT PRIMARY KEY,
    entity_id      TEXT NOT NULL REFERENCES entities(entity_id),
    observed_at    TEXT NOT NULL,   -- RFC 3339 UTC, microsecond precision
    fingerprint    TEXT NOT NULL REFERENCES contents(fingerprint)
);

CREATE INDEX IF NOT EXISTS observations_entity_idx
    ON observations(entity_id, observed_at);
CREATE INDEX IF NOT EXISTS observations_fingerprint_idx
    ON observations(fingerprint);

CREATE TRIGGER IF NOT EXISTS contents_no_update BEFORE UPDATE ON contents
BEGIN SELECT RAISE(ABORT, 'contents are immutable'); END;
CREATE TRIGGER IF NOT EXISTS contents_no_delete BEFORE DELETE ON contents
BEGIN SELECT RAISE(ABORT, 'contents are immutable'); END;
CREATE TRIGGER IF NOT EXISTS observations_no_update BEFORE UPDATE ON observations
BEGIN SELECT RAISE(ABORT, 'observations are append-only'); END;
CREATE TRIGGER IF NOT EXISTS observations_no_delete BEFORE DELETE ON observations
BEGIN SELECT RAISE(ABORT, 'observations are append-only'); END;

PRAGMA user_version = 1;
";
