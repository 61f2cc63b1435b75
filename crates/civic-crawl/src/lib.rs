//! Crawl driver for the civic snapshot store.
//!
//! Wires a [`Fetcher`](civic_core::source::Fetcher), an
//! [`Extractor`](civic_core::source::Extractor) and a
//! [`SnapshotStore`](civic_core::store::SnapshotStore) together and walks the
//! discovered projects one at a time.

pub mod crawl;
pub mod error;
pub mod fetch;
pub mod settings;

pub use crawl::{Crawler, RunSummary};
pub use error::{Error, Result};
pub use fetch::HttpFetcher;
pub use settings::{CrawlConfig, ErrorPolicy};
