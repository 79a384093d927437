//! Compiles criteria query entries into a scored boolean query.
//!
//! The chain is walked root to tail. The first node that yields a clause is
//! held back; every later clause is routed by its node's own flags: OR nodes
//! go to `should`, negated nodes to `must_not`, everything else to `must`.
//! Sub-criteria are compiled recursively and routed by the flags of the node
//! that owns them.
//!
//! Once the walk is done the held-back clause is prepended: to `should` if
//! only `should` clauses were collected (a leading term joins the OR group it
//! starts), otherwise to `must_not` or `must` depending on its negation.
//!
//! # Examples
//!
//! ```
//! use sarissa_criteria::compiler::QueryCompiler;
//! use sarissa_criteria::criteria::Criteria;
//! use sarissa_criteria::query::Query;
//!
//! let criteria = Criteria::new("f1").is("v1").or("f2").is("v2");
//! let query = QueryCompiler::new().compile(&criteria).unwrap().unwrap();
//!
//! let bool_query = query.as_bool().unwrap();
//! assert_eq!(bool_query.should_clauses().len(), 2);
//! assert!(bool_query.must_clauses().is_empty());
//!
//! // nothing to compile
//! assert_eq!(QueryCompiler::new().compile(&Criteria::anchor()).unwrap(), None);
//! ```

use tracing::debug;

use crate::compiler::leaf::query_leaf;
use crate::compiler::{ClauseLists, combine_entries, wrap_nested};
use crate::config::CompilerConfig;
use crate::criteria::{Criteria, CriteriaNode};
use crate::error::{CriteriaError, Result};
use crate::query::{Occur, Query};

/// Compiler for the scored part of a criteria tree.
#[derive(Debug, Clone, Default)]
pub struct QueryCompiler {
    config: CompilerConfig,
}

impl QueryCompiler {
    /// Create a compiler with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a compiler with a custom configuration.
    pub fn with_config(config: CompilerConfig) -> Self {
        QueryCompiler { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile the query entries of `criteria`.
    ///
    /// Returns `Ok(None)` when the tree holds no query entries at all. A single
    /// resulting clause is returned unwrapped, except a lone negated clause,
    /// which stays inside `Bool{must_not: [..]}` so the negation survives.
    pub fn compile(&self, criteria: &Criteria) -> Result<Option<Query>> {
        debug!(nodes = criteria.chain().len(), "compiling criteria query");
        let query = self.compile_chain(criteria)?;
        match &query {
            Some(query) => debug!(query_type = query.query_type(), %query, "compiled criteria query"),
            None => debug!("criteria carry no query entries"),
        }
        Ok(query)
    }

    fn compile_chain(&self, criteria: &Criteria) -> Result<Option<Query>> {
        let mut clauses = ClauseLists::default();
        let mut first: Option<(Query, bool)> = None;

        for node in criteria.chain() {
            if let Some(clause) = self.node_clause(node)? {
                if first.is_none() {
                    first = Some((clause, node.is_negating()));
                } else {
                    clauses.push(occur_for(node), clause);
                }
            }

            for sub_criteria in node.sub_criteria() {
                if let Some(sub_query) = self.compile_chain(sub_criteria)? {
                    clauses.push(occur_for(node), sub_query);
                }
            }
        }

        if let Some((clause, negating)) = first {
            let occur = if clauses.is_should_only() {
                Occur::Should
            } else if negating {
                Occur::MustNot
            } else {
                Occur::Must
            };
            clauses.prepend(occur, clause);
        }

        Ok(clauses.into_query())
    }

    fn node_clause(&self, node: &CriteriaNode) -> Result<Option<Query>> {
        let entries = node.query_entries();
        if entries.is_empty() {
            return Ok(None);
        }
        let field = node.field().ok_or_else(|| {
            CriteriaError::invalid_entry(
                node.field_name(),
                entries[0].operator(),
                "entries require a field",
            )
        })?;

        let leaves = entries
            .iter()
            .map(|entry| query_leaf(field, entry))
            .collect::<Result<Vec<_>>>()?;

        Ok(combine_entries(leaves).map(|clause| {
            let clause = match node.boost() {
                Some(boost) => clause.with_boost(boost),
                None => clause,
            };
            wrap_nested(field, clause, &self.config)
        }))
    }
}

fn occur_for(node: &CriteriaNode) -> Occur {
    if node.is_or() {
        Occur::Should
    } else if node.is_negating() {
        Occur::MustNot
    } else {
        Occur::Must
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoreMode;
    use crate::criteria::{CriteriaEntry, Field, Operator};
    use crate::query::{
        BoolQuery, ExistsQuery, MatchOperator, NestedQuery, QueryStringQuery, RangeQuery,
    };

    fn qs(field: &str, value: &str) -> Query {
        QueryStringQuery::new(field, value)
            .with_default_operator(MatchOperator::And)
            .into()
    }

    fn compile(criteria: &Criteria) -> Option<Query> {
        QueryCompiler::new().compile(criteria).unwrap()
    }

    #[test]
    fn test_empty_criteria_compiles_to_none() {
        assert_eq!(compile(&Criteria::new("f")), None);
        assert_eq!(compile(&Criteria::anchor()), None);
        assert_eq!(
            compile(&Criteria::anchor().sub_criteria(Criteria::anchor_or())),
            None
        );
    }

    #[test]
    fn test_single_entry_is_unwrapped() {
        assert_eq!(compile(&Criteria::new("f1").is("v1")), Some(qs("f1", "v1")));
    }

    #[test]
    fn test_and_chain() {
        let criteria = Criteria::new("f1").is("v1").and("f2").is("v2");
        let expected = BoolQuery::new().must(qs("f1", "v1")).must(qs("f2", "v2"));
        assert_eq!(compile(&criteria), Some(expected.into()));
    }

    #[test]
    fn test_or_chain() {
        let criteria = Criteria::new("f1").is("v1").or("f2").is("v2");
        let expected = BoolQuery::new().should(qs("f1", "v1")).should(qs("f2", "v2"));
        assert_eq!(compile(&criteria), Some(expected.into()));
    }

    #[test]
    fn test_mixed_chain() {
        let criteria = Criteria::new("f1")
            .is("v1")
            .or("f2")
            .is("v2")
            .and("f3")
            .is("v3")
            .or("f4")
            .is("v4");
        let expected = BoolQuery::new()
            .must(qs("f1", "v1"))
            .must(qs("f3", "v3"))
            .should(qs("f2", "v2"))
            .should(qs("f4", "v4"));
        assert_eq!(compile(&criteria), Some(expected.into()));
    }

    #[test]
    fn test_negated_first_clause() {
        let criteria = Criteria::new("f1").is("v1").not().and("f2").is("v2");
        let expected = BoolQuery::new()
            .must(qs("f2", "v2"))
            .must_not(qs("f1", "v1"));
        assert_eq!(compile(&criteria), Some(expected.into()));
    }

    #[test]
    fn test_negated_lone_clause_keeps_wrapper() {
        let criteria = Criteria::new("f1").is("v1").not();
        let expected = BoolQuery::new().must_not(qs("f1", "v1"));
        assert_eq!(compile(&criteria), Some(expected.into()));
    }

    #[test]
    fn test_negated_later_clause() {
        let criteria = Criteria::new("f1").is("v1").and("f2").is("v2").not();
        let expected = BoolQuery::new()
            .must(qs("f1", "v1"))
            .must_not(qs("f2", "v2"));
        assert_eq!(compile(&criteria), Some(expected.into()));
    }

    #[test]
    fn test_sub_criteria() {
        let criteria = Criteria::new("last").is("Miller").sub_criteria(
            Criteria::anchor()
                .or("first")
                .is("John")
                .or("first")
                .is("Jack"),
        );
        let expected = BoolQuery::new().must(qs("last", "Miller")).must(
            BoolQuery::new()
                .should(qs("first", "John"))
                .should(qs("first", "Jack"))
                .into(),
        );
        assert_eq!(compile(&criteria), Some(expected.into()));
    }

    #[test]
    fn test_sub_criteria_routed_by_owner() {
        let criteria = Criteria::new("a")
            .is(1)
            .or_group(Criteria::new("b").is(2).and("c").is(3));
        let expected = BoolQuery::new()
            .should(qs("a", "1"))
            .should(BoolQuery::new().must(qs("b", "2")).must(qs("c", "3")).into());
        assert_eq!(compile(&criteria), Some(expected.into()));

        let criteria = Criteria::new("a").is(1).and_group(Criteria::new("b").is(2)).not();
        let expected = BoolQuery::new()
            .must(qs("a", "1"))
            .must_not(qs("b", "2"));
        assert_eq!(compile(&criteria), Some(expected.into()));
    }

    #[test]
    fn test_sub_criteria_only() {
        let criteria = Criteria::anchor().sub_criteria(Criteria::new("a").is(1));
        assert_eq!(compile(&criteria), Some(qs("a", "1")));
    }

    #[test]
    fn test_multiple_entries_with_boost() {
        let criteria = Criteria::new("age")
            .greater_than_equal(18)
            .less_than(65)
            .boost(2.0);
        let expected = BoolQuery::new()
            .must(RangeQuery::new("age").gte(18).into())
            .must(RangeQuery::new("age").lt(65).into())
            .with_boost(2.0);
        assert_eq!(compile(&criteria), Some(expected.into()));
    }

    #[test]
    fn test_single_entry_boost_on_leaf() {
        let criteria = Criteria::new("title").is("rust").boost(3.0);
        let expected = QueryStringQuery::new("title", "rust")
            .with_default_operator(MatchOperator::And)
            .with_boost(3.0);
        assert_eq!(compile(&criteria), Some(expected.into()));
    }

    #[test]
    fn test_nested_path() {
        let field = Field::new("houses.inhabitants.name").with_path("houses.inhabitants");
        let criteria = Criteria::new(field).exists();
        let expected = NestedQuery::new(
            "houses.inhabitants",
            ExistsQuery::new("houses.inhabitants.name").into(),
            ScoreMode::Avg,
        );
        assert_eq!(compile(&criteria), Some(expected.into()));
    }

    #[test]
    fn test_nested_score_mode_from_config() {
        let field = Field::new("a.b").with_path("a");
        let criteria = Criteria::new(field).exists();
        let compiler =
            QueryCompiler::with_config(CompilerConfig::default().with_nested_score_mode(ScoreMode::Max));
        let expected = NestedQuery::new("a", ExistsQuery::new("a.b").into(), ScoreMode::Max);
        assert_eq!(compiler.compile(&criteria).unwrap(), Some(expected.into()));
    }

    #[test]
    fn test_filter_entries_are_ignored() {
        let criteria = Criteria::new("location").within("1,2", "3km");
        assert_eq!(compile(&criteria), None);
    }

    #[test]
    fn test_entries_on_anchor_are_rejected() {
        let criteria = Criteria::anchor().is("x");
        assert!(matches!(
            QueryCompiler::new().compile(&criteria),
            Err(CriteriaError::InvalidEntry { .. })
        ));
    }

    #[test]
    fn test_filter_operator_in_query_entries() {
        let criteria = Criteria::new("location")
            .query_entry(CriteriaEntry::new(Operator::Within, vec!["1,2", "3km"]));
        assert!(matches!(
            QueryCompiler::new().compile(&criteria),
            Err(CriteriaError::UnsupportedCriteriaType(_))
        ));
    }

    #[test]
    fn test_compile_is_idempotent() {
        let criteria = Criteria::new("a")
            .is("x")
            .or("b")
            .contains("y")
            .not()
            .sub_criteria(Criteria::new("c").empty());
        let compiler = QueryCompiler::new();
        let first = compiler.compile(&criteria).unwrap();
        let second = compiler.compile(&criteria).unwrap();
        assert_eq!(first, second);
        assert!(first.is_some());
    }
}
