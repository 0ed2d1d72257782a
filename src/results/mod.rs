//! Search result types
//!
//! Records returned by the executor, annotated with relevance score and
//! highlight spans.

mod types;

pub use types::{CatalogRecord, Highlight, HighlightKind, HighlightText, RecordError};
