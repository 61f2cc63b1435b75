//! Site plugin for the civic snapshot store.
//!
//! Turns the project listing and project pages of a civic-engagement site
//! into [`civic_core::source::Snapshot`]s, and renders stored markup to
//! markdown. Pure synchronous; no HTTP or database dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! use civic_core::source::{Discovered, Extractor};
//! use civic_extract::{ExtractionRules, PageExtractor};
//!
//! let extractor = PageExtractor::new(ExtractionRules::default()).unwrap();
//! let page = Discovered {
//!   identifier: "https://example.org/projects/park".into(),
//!   state:      "active".into(),
//! };
//! let body = r#"<div id="yield"><h1>Park</h1><script>x()</script></div>"#;
//! let snapshot = extractor.extract(&page, body).unwrap();
//! assert_eq!(snapshot.metadata.title, "Park");
//! ```

mod canonical;
pub mod error;
mod markdown;
mod page;
pub mod rules;

pub use error::{Error, Result};
pub use markdown::MarkdownRenderer;
pub use page::PageExtractor;
pub use rules::{ExtractionRules, Rule};
