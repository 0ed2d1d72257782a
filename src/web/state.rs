//! Application state shared across handlers

use crate::config::Settings;
use crate::metrics::Metrics;
use crate::query::SearchLimits;
use crate::search::QueryExecutor;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Executor handle acquired at startup
    pub executor: Arc<dyn QueryExecutor>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Create new application state
    pub fn new(settings: Settings, executor: Arc<dyn QueryExecutor>) -> Self {
        Self {
            settings: Arc::new(settings),
            executor,
            metrics: Arc::new(Metrics::new()),
        }
    }

    pub fn limits(&self) -> SearchLimits {
        self.settings.search.limits()
    }

    pub fn default_page_size(&self) -> u32 {
        self.settings.search.default_page_size
    }
}
