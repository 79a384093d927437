//! Boolean combinator over must/should/must-not clause lists.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::query::query::Query;

/// Occurrence requirements for boolean clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occur {
    /// The clause must match (equivalent to AND).
    Must,
    /// The clause should match (equivalent to OR).
    Should,
    /// The clause must not match (equivalent to NOT).
    MustNot,
}

/// A boolean query combining clauses by occurrence.
///
/// Empty lists are omitted when serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoolQuery {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    must: Vec<Query>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    should: Vec<Query>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    must_not: Vec<Query>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    boost: Option<f32>,
}

impl BoolQuery {
    /// Create a new empty boolean query.
    pub fn new() -> Self {
        BoolQuery::default()
    }

    /// Create a boolean query from prebuilt clause lists.
    pub fn from_clauses(must: Vec<Query>, should: Vec<Query>, must_not: Vec<Query>) -> Self {
        BoolQuery {
            must,
            should,
            must_not,
            boost: None,
        }
    }

    /// Add a clause with the given occurrence.
    pub fn add_clause(&mut self, occur: Occur, query: Query) {
        match occur {
            Occur::Must => self.must.push(query),
            Occur::Should => self.should.push(query),
            Occur::MustNot => self.must_not.push(query),
        }
    }

    /// Add a MUST clause.
    pub fn add_must(&mut self, query: Query) {
        self.add_clause(Occur::Must, query);
    }

    /// Add a SHOULD clause.
    pub fn add_should(&mut self, query: Query) {
        self.add_clause(Occur::Should, query);
    }

    /// Add a MUST_NOT clause.
    pub fn add_must_not(&mut self, query: Query) {
        self.add_clause(Occur::MustNot, query);
    }

    /// Add a MUST clause, builder style.
    pub fn must(mut self, query: Query) -> Self {
        self.add_must(query);
        self
    }

    /// Add a SHOULD clause, builder style.
    pub fn should(mut self, query: Query) -> Self {
        self.add_should(query);
        self
    }

    /// Add a MUST_NOT clause, builder style.
    pub fn must_not(mut self, query: Query) -> Self {
        self.add_must_not(query);
        self
    }

    /// Set the boost factor.
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = Some(boost);
        self
    }

    /// Get the MUST clauses.
    pub fn must_clauses(&self) -> &[Query] {
        &self.must
    }

    /// Get the SHOULD clauses.
    pub fn should_clauses(&self) -> &[Query] {
        &self.should
    }

    /// Get the MUST_NOT clauses.
    pub fn must_not_clauses(&self) -> &[Query] {
        &self.must_not
    }

    /// Get clauses by occurrence type.
    pub fn clauses_by_occur(&self, occur: Occur) -> &[Query] {
        match occur {
            Occur::Must => &self.must,
            Occur::Should => &self.should,
            Occur::MustNot => &self.must_not,
        }
    }

    /// Get the boost factor, if set.
    pub fn boost(&self) -> Option<f32> {
        self.boost
    }

    /// Total number of clauses.
    pub fn clause_count(&self) -> usize {
        self.must.len() + self.should.len() + self.must_not.len()
    }

    /// Check if this query has no clauses.
    pub fn is_empty(&self) -> bool {
        self.clause_count() == 0
    }

    pub(crate) fn set_boost(&mut self, boost: f32) {
        self.boost = Some(boost);
    }
}

impl fmt::Display for BoolQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .must
            .iter()
            .map(|q| format!("+{q}"))
            .chain(self.should.iter().map(|q| q.to_string()))
            .chain(self.must_not.iter().map(|q| format!("-{q}")))
            .collect();
        write!(f, "({})", parts.join(" "))?;
        if let Some(boost) = self.boost {
            write!(f, "^{boost}")?;
        }
        Ok(())
    }
}
