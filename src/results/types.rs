//! Result type definitions

use crate::query::fields;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A catalog record returned by the search engine, with the annotation
/// fields lifted out of the raw document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogRecord {
    /// Relevance score assigned by the engine
    pub score: f64,
    /// Matched spans explaining why the record surfaced
    pub highlights: Vec<Highlight>,
    /// Remaining document fields
    #[serde(flatten)]
    pub document: Map<String, Value>,
}

impl CatalogRecord {
    /// Split an annotated document into record, score and highlights
    pub fn from_document(document: Value) -> Result<Self, RecordError> {
        let mut document = match document {
            Value::Object(map) => map,
            other => return Err(RecordError::NotAnObject(type_name(&other))),
        };

        let score = match document.remove(fields::SCORE) {
            None | Some(Value::Null) => 0.0,
            Some(value) => value.as_f64().ok_or(RecordError::InvalidScore)?,
        };

        let highlights = match document.remove(fields::HIGHLIGHTS) {
            None | Some(Value::Null) => Vec::new(),
            Some(value) => serde_json::from_value(value).map_err(RecordError::Highlights)?,
        };

        Ok(Self {
            score,
            highlights,
            document,
        })
    }
}

/// Highlight spans for one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub path: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub texts: Vec<HighlightText>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightText {
    pub value: String,
    #[serde(rename = "type")]
    pub kind: HighlightKind,
}

/// Whether a fragment matched or is surrounding context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightKind {
    Hit,
    Text,
}

/// Why a returned document could not be read as a record
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("expected a document object, got {0}")]
    NotAnObject(&'static str),

    #[error("score is not a number")]
    InvalidScore,

    #[error("malformed highlights: {0}")]
    Highlights(#[source] serde_json::Error),
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
