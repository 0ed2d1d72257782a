//! Query plan compilation
//!
//! Validates structured search requests and compiles them into the
//! ordered stage lists executed by the catalog's full-text search engine.

mod clause;
mod compiler;
pub mod fields;
mod models;
mod plan;

pub use clause::{Clause, FuzzyClause, RangeClause, TextClause};
pub use compiler::{compile, start_of_year, FacetRule, FILTER_RULES, MAX_EDITS, MUST_RULES};
pub use models::{SearchLimits, SearchRequest, ValidationError, DEFAULT_PAGE_SIZE, YEAR_RANGE};
pub use plan::{QueryPlan, SearchStage, Stage};
