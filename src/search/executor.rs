//! Query executor interface

use crate::query::QueryPlan;
use crate::results::CatalogRecord;
use async_trait::async_trait;
use thiserror::Error;

/// Executes compiled plans against the catalog.
///
/// One handle is acquired at startup and shared by every request.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Backend name, for logs
    fn name(&self) -> &str;

    /// Run a plan and return the annotated matches in plan order
    async fn execute(&self, plan: &QueryPlan) -> Result<Vec<CatalogRecord>, ExecutorError>;

    /// Release backend resources at shutdown
    async fn close(&self) {}
}

/// Failures reported by an executor
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("search backend unavailable: {0}")]
    Unavailable(String),

    #[error("search backend rejected credentials: {0}")]
    Unauthorized(String),

    #[error("search backend command failed: {message}")]
    Backend { code: Option<i32>, message: String },

    #[error("failed to decode search backend response: {0}")]
    Decode(String),
}
