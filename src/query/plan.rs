//! Compiled query plans

use super::clause::Clause;

/// Full-text search stage combining the three clause groups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchStage {
    /// Clauses every result has to match
    pub must: Vec<Clause>,
    /// Ranking preferences; none is mandatory
    pub should: Vec<Clause>,
    /// Non-scoring restrictions
    pub filter: Vec<Clause>,
    pub highlight_paths: Vec<String>,
}

/// One step of the execution plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Search(SearchStage),
    Sort { field: String, ascending: bool },
    Skip { count: u64 },
    Limit { count: u32 },
    Annotate {
        score_field: String,
        highlight_field: String,
    },
}

impl Stage {
    /// Short stage name, used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Search(_) => "search",
            Self::Sort { .. } => "sort",
            Self::Skip { .. } => "skip",
            Self::Limit { .. } => "limit",
            Self::Annotate { .. } => "annotate",
        }
    }
}

/// Ordered, immutable list of stages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    stages: Vec<Stage>,
}

impl QueryPlan {
    pub(crate) fn new(stages: Vec<Stage>) -> Self {
        Self { stages }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Stage> {
        self.stages.iter()
    }

    /// The search stage, if the plan has one
    pub fn search(&self) -> Option<&SearchStage> {
        self.stages.iter().find_map(|stage| match stage {
            Stage::Search(search) => Some(search),
            _ => None,
        })
    }

    /// Stage names in execution order
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(Stage::name).collect()
    }
}

impl<'a> IntoIterator for &'a QueryPlan {
    type Item = &'a Stage;
    type IntoIter = std::slice::Iter<'a, Stage>;

    fn into_iter(self) -> Self::IntoIter {
        self.stages.iter()
    }
}
