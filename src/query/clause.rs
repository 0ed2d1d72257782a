//! Matching clauses placed inside a search stage

use chrono::{DateTime, Utc};

/// A single matching condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// Term match against one field
    Text(TextClause),
    /// Bounded date range over one field
    Range(RangeClause),
    /// Typo-tolerant prefix match
    Fuzzy(FuzzyClause),
}

impl Clause {
    /// Field path this clause targets
    pub fn path(&self) -> &str {
        match self {
            Self::Text(c) => &c.path,
            Self::Range(c) => &c.path,
            Self::Fuzzy(c) => &c.path,
        }
    }

    pub fn as_text(&self) -> Option<&TextClause> {
        match self {
            Self::Text(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_range(&self) -> Option<&RangeClause> {
        match self {
            Self::Range(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_fuzzy(&self) -> Option<&FuzzyClause> {
        match self {
            Self::Fuzzy(c) => Some(c),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextClause {
    pub path: String,
    pub query: String,
}

impl TextClause {
    pub fn new(path: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: query.into(),
        }
    }
}

/// Date range with an inclusive lower and an exclusive upper bound.
///
/// Either side may be open, but never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeClause {
    pub path: String,
    pub gte: Option<DateTime<Utc>>,
    pub lt: Option<DateTime<Utc>>,
}

impl RangeClause {
    /// Build a range, or `None` when both bounds are open
    pub fn bounded(
        path: impl Into<String>,
        gte: Option<DateTime<Utc>>,
        lt: Option<DateTime<Utc>>,
    ) -> Option<Self> {
        if gte.is_none() && lt.is_none() {
            return None;
        }
        Some(Self {
            path: path.into(),
            gte,
            lt,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyClause {
    pub path: String,
    pub query: String,
    /// Maximum typo distance tolerated
    pub max_edits: u8,
}

impl FuzzyClause {
    pub fn new(path: impl Into<String>, query: impl Into<String>, max_edits: u8) -> Self {
        Self {
            path: path.into(),
            query: query.into(),
            max_edits,
        }
    }
}
