//! Catalog field paths targeted by compiled plans

/// Record name
pub const NAME: &str = "name";
/// Free-text record description
pub const DESCRIPTION: &str = "description";
/// Keyword list
pub const KEYWORDS: &str = "keywords";
/// Names inside the JSON-LD creator list
pub const CREATOR_NAME: &str = "creator.@list.name";
/// Publishing provider
pub const PROVIDER_NAME: &str = "provider.name";
/// JSON-LD record type
pub const RECORD_TYPE: &str = "@type";
pub const DATE_PUBLISHED: &str = "datePublished";
pub const COVERAGE_START: &str = "temporalCoverage.start";
pub const COVERAGE_END: &str = "temporalCoverage.end";

/// Fields matched by the fuzzy autocomplete clauses
pub const SEARCHABLE: [&str; 3] = [NAME, DESCRIPTION, KEYWORDS];

/// Fields the engine returns highlight spans for
pub const HIGHLIGHTED: [&str; 4] = [NAME, DESCRIPTION, KEYWORDS, CREATOR_NAME];

/// Output field carrying the relevance score
pub const SCORE: &str = "score";
/// Output field carrying highlight spans
pub const HIGHLIGHTS: &str = "highlights";
