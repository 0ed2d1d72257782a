//! catalog-search: keyword search over a dataset catalog
//!
//! Search requests are validated, compiled into an ordered query plan
//! (`search, [sort], skip, limit, annotate`) and executed by the full-text
//! search engine embedded in the catalog's document database.

pub mod config;
pub mod metrics;
pub mod query;
pub mod results;
pub mod search;
pub mod web;

pub use config::Settings;
pub use query::{compile, QueryPlan, SearchRequest, Stage};
pub use results::CatalogRecord;
pub use search::{MongoExecutor, QueryExecutor};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
