//! Compilers turning criteria into query expressions.
//!
//! [`QueryCompiler`] compiles query entries into a scored boolean query,
//! [`FilterCompiler`] compiles filter entries into a non-scoring filter. Both
//! are pure functions of the criteria tree: compiling the same tree twice
//! yields equal results, and the tree is never modified.
//!
//! # Examples
//!
//! ```
//! use sarissa_criteria::compiler::compile_criteria;
//! use sarissa_criteria::criteria::Criteria;
//!
//! let criteria = Criteria::new("name")
//!     .is("Alice")
//!     .and("location")
//!     .within("45.7806,3.0875", "20km");
//!
//! let compiled = compile_criteria(&criteria).unwrap();
//! assert!(compiled.query.is_some());
//! assert!(compiled.filter.is_some());
//! ```

pub mod filter;
pub(crate) mod leaf;
pub mod query;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::CompilerConfig;
use crate::criteria::{Criteria, Field};
use crate::error::Result;
use crate::query::{BoolQuery, NestedQuery, Occur, Query};

pub use self::filter::FilterCompiler;
pub use self::query::QueryCompiler;

/// Both compiled parts of a criteria tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompiledCriteria {
    /// Scored query, `None` when the tree has no query entries.
    pub query: Option<Query>,
    /// Non-scoring filter, `None` when the tree has no filter entries.
    pub filter: Option<Query>,
}

impl CompiledCriteria {
    /// Check whether neither part produced a clause.
    pub fn is_empty(&self) -> bool {
        self.query.is_none() && self.filter.is_none()
    }
}

/// Compile both the query and the filter of `criteria` with the default configuration.
pub fn compile_criteria(criteria: &Criteria) -> Result<CompiledCriteria> {
    compile_criteria_with(criteria, &CompilerConfig::default())
}

/// Compile both the query and the filter of `criteria`.
pub fn compile_criteria_with(
    criteria: &Criteria,
    config: &CompilerConfig,
) -> Result<CompiledCriteria> {
    Ok(CompiledCriteria {
        query: QueryCompiler::with_config(config.clone()).compile(criteria)?,
        filter: FilterCompiler::with_config(config.clone()).compile(criteria)?,
    })
}

/// Ordered should/must/must-not lists collected while walking a chain.
#[derive(Debug, Default)]
pub(crate) struct ClauseLists {
    should: Vec<Query>,
    must_not: Vec<Query>,
    must: Vec<Query>,
}

impl ClauseLists {
    pub(crate) fn push(&mut self, occur: Occur, query: Query) {
        trace!(?occur, query = %query, "routing clause");
        match occur {
            Occur::Should => self.should.push(query),
            Occur::MustNot => self.must_not.push(query),
            Occur::Must => self.must.push(query),
        }
    }

    pub(crate) fn prepend(&mut self, occur: Occur, query: Query) {
        trace!(?occur, query = %query, "prepending first clause");
        match occur {
            Occur::Should => self.should.insert(0, query),
            Occur::MustNot => self.must_not.insert(0, query),
            Occur::Must => self.must.insert(0, query),
        }
    }

    /// Only SHOULD clauses were collected so far.
    pub(crate) fn is_should_only(&self) -> bool {
        !self.should.is_empty() && self.must_not.is_empty() && self.must.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.should.len() + self.must_not.len() + self.must.len()
    }

    /// Collapse into a query.
    ///
    /// No clauses yield `None`. A lone MUST or SHOULD clause is returned
    /// unwrapped; a lone MUST_NOT clause keeps its boolean wrapper so the
    /// negation survives.
    pub(crate) fn into_query(self) -> Option<Query> {
        match self.len() {
            0 => None,
            1 if self.must_not.is_empty() => self.must.into_iter().chain(self.should).next(),
            _ => Some(BoolQuery::from_clauses(self.must, self.should, self.must_not).into()),
        }
    }
}

/// Combine the leaves of one node: one leaf stays as is, several are AND-ed.
pub(crate) fn combine_entries(mut leaves: Vec<Query>) -> Option<Query> {
    match leaves.len() {
        0 => None,
        1 => leaves.pop(),
        _ => Some(BoolQuery::from_clauses(leaves, Vec::new(), Vec::new()).into()),
    }
}

/// Wrap `clause` in a nested query when `field` lives in a nested document.
pub(crate) fn wrap_nested(field: &Field, clause: Query, config: &CompilerConfig) -> Query {
    match field.path() {
        Some(path) => NestedQuery::new(path, clause, config.nested_score_mode).into(),
        None => clause,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoreMode;
    use crate::query::{ExistsQuery, WildcardQuery};

    fn leaf(name: &str) -> Query {
        ExistsQuery::new(name).into()
    }

    #[test]
    fn test_clause_lists_collapse() {
        assert_eq!(ClauseLists::default().into_query(), None);

        let mut clauses = ClauseLists::default();
        clauses.push(Occur::Must, leaf("a"));
        assert_eq!(clauses.into_query(), Some(leaf("a")));

        let mut clauses = ClauseLists::default();
        clauses.push(Occur::Should, leaf("a"));
        assert!(clauses.is_should_only());
        assert_eq!(clauses.into_query(), Some(leaf("a")));

        let mut clauses = ClauseLists::default();
        clauses.push(Occur::MustNot, leaf("a"));
        assert_eq!(
            clauses.into_query(),
            Some(BoolQuery::new().must_not(leaf("a")).into())
        );
    }

    #[test]
    fn test_clause_lists_prepend() {
        let mut clauses = ClauseLists::default();
        clauses.push(Occur::Must, leaf("b"));
        clauses.prepend(Occur::Must, leaf("a"));
        assert!(!clauses.is_should_only());
        assert_eq!(clauses.len(), 2);
        assert_eq!(
            clauses.into_query(),
            Some(BoolQuery::new().must(leaf("a")).must(leaf("b")).into())
        );
    }

    #[test]
    fn test_combine_entries() {
        assert_eq!(combine_entries(Vec::new()), None);
        assert_eq!(combine_entries(vec![leaf("a")]), Some(leaf("a")));
        assert_eq!(
            combine_entries(vec![leaf("a"), WildcardQuery::new("a", "*").into()]),
            Some(
                BoolQuery::new()
                    .must(leaf("a"))
                    .must(WildcardQuery::new("a", "*").into())
                    .into()
            )
        );
    }

    #[test]
    fn test_wrap_nested() {
        let config = CompilerConfig::default().with_nested_score_mode(ScoreMode::Sum);
        let plain = Field::new("a");
        assert_eq!(wrap_nested(&plain, leaf("a"), &config), leaf("a"));

        let nested = Field::new("p.a").with_path("p");
        assert_eq!(
            wrap_nested(&nested, leaf("p.a"), &config),
            NestedQuery::new("p", leaf("p.a"), ScoreMode::Sum).into()
        );
    }

    #[test]
    fn test_compile_criteria() {
        let compiled = compile_criteria(&Criteria::anchor()).unwrap();
        assert!(compiled.is_empty());

        let criteria = Criteria::new("name")
            .is("Alice")
            .and("location")
            .within("1,2", "3km");
        let compiled = compile_criteria(&criteria).unwrap();
        assert!(!compiled.is_empty());
        assert_eq!(compiled.query.unwrap().query_type(), "query_string");
        assert_eq!(compiled.filter.unwrap().query_type(), "geo_distance");
    }
}
