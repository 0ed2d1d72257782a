//! Search execution module
//!
//! Renders compiled plans into aggregation pipelines and runs them
//! against the catalog through an explicitly passed executor handle.

mod executor;
mod mongo;
pub mod pipeline;

pub use executor::{ExecutorError, QueryExecutor};
pub use mongo::MongoExecutor;
pub use pipeline::render_pipeline;
