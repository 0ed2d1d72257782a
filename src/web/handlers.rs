//! HTTP request handlers

use super::error::ApiError;
use super::state::AppState;
use crate::query::{compile, SearchRequest, ValidationError};
use crate::results::CatalogRecord;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Query parameters for search
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    /// Free-text query
    pub term: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub sort_by: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub content_type: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub provider_name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub creator_name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub data_coverage_start: Option<i32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub data_coverage_end: Option<i32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub published_start: Option<i32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub published_end: Option<i32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page_number: Option<u32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page_size: Option<u32>,
}

impl SearchParams {
    /// Convert into a search request, filling pagination defaults
    pub fn into_request(self, default_page_size: u32) -> Result<SearchRequest, ValidationError> {
        let term = self.term.ok_or(ValidationError::EmptyTerm)?;

        Ok(SearchRequest {
            term,
            sort_by: self.sort_by,
            content_type: self.content_type,
            provider_name: self.provider_name,
            creator_name: self.creator_name,
            data_coverage_start: self.data_coverage_start,
            data_coverage_end: self.data_coverage_end,
            published_start: self.published_start,
            published_end: self.published_end,
            page_number: self.page_number.unwrap_or(1),
            page_size: self.page_size.unwrap_or(default_page_size),
        })
    }
}

/// Treat missing and blank parameters alike
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}

/// Search results response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub term: String,
    pub page_number: u32,
    pub page_size: u32,
    pub count: usize,
    pub results: Vec<CatalogRecord>,
}

/// Search handler
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let request = match params
        .into_request(state.default_page_size())
        .and_then(|request| request.validate(&state.limits()).map(|()| request))
    {
        Ok(request) => request,
        Err(e) => {
            state.metrics.record_rejection();
            warn!("Rejected search request: {}", e);
            return Err(e.into());
        }
    };

    let plan = compile(&request);
    debug!(
        "Compiled plan for '{}': {}",
        request.term,
        plan.stage_names().join(" -> ")
    );

    let start = Instant::now();
    let results = match state.executor.execute(&plan).await {
        Ok(results) => results,
        Err(e) => {
            state.metrics.record_failure();
            error!("Search via {} failed: {}", state.executor.name(), e);
            return Err(e.into());
        }
    };
    let elapsed = start.elapsed();
    state.metrics.record_success(elapsed, results.len());

    info!(
        "Search '{}' returned {} records in {:?}",
        request.term,
        results.len(),
        elapsed
    );

    Ok(Json(SearchResponse {
        term: request.term,
        page_number: request.page_number,
        page_size: request.page_size,
        count: results.len(),
        results,
    }))
}

/// Search statistics handler
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.snapshot())
}

/// Health check handler
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}
