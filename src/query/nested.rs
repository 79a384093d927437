//! Nested-document wrapper.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ScoreMode;
use crate::query::query::Query;

/// Scopes a query to individual nested objects under `path`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedQuery {
    path: String,
    query: Box<Query>,
    score_mode: ScoreMode,
}

impl NestedQuery {
    /// Create a new nested query.
    pub fn new<P: Into<String>>(path: P, query: Query, score_mode: ScoreMode) -> Self {
        NestedQuery {
            path: path.into(),
            query: Box::new(query),
            score_mode,
        }
    }

    /// Get the nested path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get the wrapped query.
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Get the score mode.
    pub fn score_mode(&self) -> ScoreMode {
        self.score_mode
    }
}

impl fmt::Display for NestedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "nested({}, {}, {})", self.path, self.query, self.score_mode)
    }
}
