//! SQLite backend for the civic snapshot store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Each table has its own module of
//! synchronous functions over a [`rusqlite::Connection`]; [`record`] composes
//! them inside a single transaction.

mod content;
mod encode;
mod entity;
mod observation;
mod record;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
