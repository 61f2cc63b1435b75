//! Core types and trait definitions for the civic snapshot store.
//!
//! This crate is deliberately free of HTTP, HTML and database dependencies.
//! The storage backend, the site plugin and the crawl driver all depend on it.

// Backends implement the `impl Future + Send` trait methods with `async fn`.
#![allow(async_fn_in_trait)]

pub mod content;
pub mod entity;
pub mod error;
pub mod filter;
pub mod fingerprint;
pub mod observation;
pub mod source;
pub mod store;

pub use error::{Error, Result};
pub use fingerprint::Fingerprint;
