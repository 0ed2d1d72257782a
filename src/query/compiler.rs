//! Query plan compiler
//!
//! Turns a [`SearchRequest`] into the ordered stage list the search engine
//! executes: `search, [sort], skip, limit, annotate`. Optional facets are
//! assembled from rule tables, one entry per request field, so an absent
//! field can never leak a clause into the plan.

use super::clause::{Clause, FuzzyClause, RangeClause, TextClause};
use super::fields;
use super::models::SearchRequest;
use super::plan::{QueryPlan, SearchStage, Stage};
use chrono::{DateTime, TimeZone, Utc};

/// Typo distance tolerated by the fuzzy clauses
pub const MAX_EDITS: u8 = 1;

type ClauseBuilder = fn(&SearchRequest) -> Option<Clause>;

/// Maps one optional request field onto the clause it produces
pub struct FacetRule {
    /// Request parameter name
    pub param: &'static str,
    /// Catalog field the clause targets
    pub target: &'static str,
    build: ClauseBuilder,
}

impl FacetRule {
    pub fn apply(&self, request: &SearchRequest) -> Option<Clause> {
        (self.build)(request)
    }
}

/// Mandatory text facets, in emission order
pub const MUST_RULES: &[FacetRule] = &[
    FacetRule {
        param: "creatorName",
        target: fields::CREATOR_NAME,
        build: creator_clause,
    },
    FacetRule {
        param: "providerName",
        target: fields::PROVIDER_NAME,
        build: provider_clause,
    },
    FacetRule {
        param: "contentType",
        target: fields::RECORD_TYPE,
        build: content_type_clause,
    },
];

/// Non-scoring date restrictions, in emission order
pub const FILTER_RULES: &[FacetRule] = &[
    FacetRule {
        param: "publishedStart/publishedEnd",
        target: fields::DATE_PUBLISHED,
        build: published_clause,
    },
    FacetRule {
        param: "dataCoverageStart",
        target: fields::COVERAGE_START,
        build: coverage_start_clause,
    },
    FacetRule {
        param: "dataCoverageEnd",
        target: fields::COVERAGE_END,
        build: coverage_end_clause,
    },
];

/// Compile a request into an executable plan.
///
/// Pure and total. Callers validate the request first; unvalidated years
/// that cannot be represented as dates simply produce no bound.
pub fn compile(request: &SearchRequest) -> QueryPlan {
    let should = fields::SEARCHABLE
        .iter()
        .map(|path| Clause::Fuzzy(FuzzyClause::new(*path, request.term.as_str(), MAX_EDITS)))
        .collect();

    let search = SearchStage {
        must: apply_rules(MUST_RULES, request),
        should,
        filter: apply_rules(FILTER_RULES, request),
        highlight_paths: fields::HIGHLIGHTED.iter().map(|p| p.to_string()).collect(),
    };

    let mut stages = Vec::with_capacity(5);
    stages.push(Stage::Search(search));

    // Sort before pagination, otherwise pages come from an unordered set
    if let Some(ref field) = request.sort_by {
        stages.push(Stage::Sort {
            field: field.clone(),
            ascending: true,
        });
    }

    stages.push(Stage::Skip {
        count: request.skip(),
    });
    stages.push(Stage::Limit {
        count: request.page_size,
    });
    stages.push(Stage::Annotate {
        score_field: fields::SCORE.to_string(),
        highlight_field: fields::HIGHLIGHTS.to_string(),
    });

    QueryPlan::new(stages)
}

fn apply_rules(rules: &[FacetRule], request: &SearchRequest) -> Vec<Clause> {
    rules.iter().filter_map(|rule| rule.apply(request)).collect()
}

/// Midnight UTC on January 1st of `year`
pub fn start_of_year(year: i32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single()
}

fn start_of_following_year(year: i32) -> Option<DateTime<Utc>> {
    year.checked_add(1).and_then(start_of_year)
}

fn text(path: &str, value: Option<&str>) -> Option<Clause> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| Clause::Text(TextClause::new(path, v)))
}

fn creator_clause(request: &SearchRequest) -> Option<Clause> {
    text(fields::CREATOR_NAME, request.creator_name.as_deref())
}

fn provider_clause(request: &SearchRequest) -> Option<Clause> {
    text(fields::PROVIDER_NAME, request.provider_name.as_deref())
}

fn content_type_clause(request: &SearchRequest) -> Option<Clause> {
    text(fields::RECORD_TYPE, request.content_type.as_deref())
}

fn published_clause(request: &SearchRequest) -> Option<Clause> {
    RangeClause::bounded(
        fields::DATE_PUBLISHED,
        request.published_start.and_then(start_of_year),
        request.published_end.and_then(start_of_following_year),
    )
    .map(Clause::Range)
}

fn coverage_start_clause(request: &SearchRequest) -> Option<Clause> {
    RangeClause::bounded(
        fields::COVERAGE_START,
        request.data_coverage_start.and_then(start_of_year),
        None,
    )
    .map(Clause::Range)
}

fn coverage_end_clause(request: &SearchRequest) -> Option<Clause> {
    RangeClause::bounded(
        fields::COVERAGE_END,
        request.data_coverage_end.and_then(start_of_following_year),
        None,
    )
    .map(Clause::Range)
}
