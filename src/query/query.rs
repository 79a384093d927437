//! The compiled query expression.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::query::boolean::BoolQuery;
use crate::query::fuzzy::FuzzyQuery;
use crate::query::geo::{GeoBoundingBoxQuery, GeoDistanceQuery};
use crate::query::nested::NestedQuery;
use crate::query::range::RangeQuery;
use crate::query::string::{MatchQuery, QueryStringQuery};
use crate::query::term::{ExistsQuery, TermsQuery};
use crate::query::wildcard::{RegexpQuery, WildcardQuery};

/// An immutable query expression.
///
/// Serializes externally tagged, one key per variant
/// (`{"bool": {...}}`, `{"range": {...}}`, ...), which maps one to one onto the
/// engine's query DSL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Query {
    /// Boolean combinator.
    Bool(BoolQuery),
    /// Query-string leaf.
    QueryString(QueryStringQuery),
    /// Analyzed match leaf.
    Match(MatchQuery),
    /// Range leaf.
    Range(RangeQuery),
    /// Field presence leaf.
    Exists(ExistsQuery),
    /// Wildcard leaf.
    Wildcard(WildcardQuery),
    /// Regular expression leaf.
    Regexp(RegexpQuery),
    /// Exact-values leaf.
    Terms(TermsQuery),
    /// Fuzzy leaf.
    Fuzzy(FuzzyQuery),
    /// Geo-distance filter leaf.
    GeoDistance(GeoDistanceQuery),
    /// Geo bounding box filter leaf.
    GeoBoundingBox(GeoBoundingBoxQuery),
    /// Nested-document wrapper.
    Nested(NestedQuery),
}

impl Query {
    /// Get the query type name for debugging and logging.
    pub fn query_type(&self) -> &'static str {
        match self {
            Query::Bool(_) => "bool",
            Query::QueryString(_) => "query_string",
            Query::Match(_) => "match",
            Query::Range(_) => "range",
            Query::Exists(_) => "exists",
            Query::Wildcard(_) => "wildcard",
            Query::Regexp(_) => "regexp",
            Query::Terms(_) => "terms",
            Query::Fuzzy(_) => "fuzzy",
            Query::GeoDistance(_) => "geo_distance",
            Query::GeoBoundingBox(_) => "geo_bounding_box",
            Query::Nested(_) => "nested",
        }
    }

    /// Check whether this is a leaf clause (not a combinator or wrapper).
    pub fn is_leaf(&self) -> bool {
        !matches!(self, Query::Bool(_) | Query::Nested(_))
    }

    /// Get the boost factor, if this variant carries one and it is set.
    pub fn boost(&self) -> Option<f32> {
        match self {
            Query::Bool(q) => q.boost(),
            Query::QueryString(q) => q.boost(),
            Query::Match(q) => q.boost(),
            Query::Range(q) => q.boost(),
            Query::Wildcard(q) => q.boost(),
            Query::Regexp(q) => q.boost(),
            Query::Terms(q) => q.boost(),
            Query::Fuzzy(q) => q.boost(),
            Query::Exists(_) | Query::GeoDistance(_) | Query::GeoBoundingBox(_) | Query::Nested(_) => {
                None
            }
        }
    }

    /// Apply a boost to variants that carry one. Others are returned unchanged.
    pub fn with_boost(mut self, boost: f32) -> Self {
        match &mut self {
            Query::Bool(q) => q.set_boost(boost),
            Query::QueryString(q) => q.set_boost(boost),
            Query::Match(q) => q.set_boost(boost),
            Query::Range(q) => q.set_boost(boost),
            Query::Wildcard(q) => q.set_boost(boost),
            Query::Regexp(q) => q.set_boost(boost),
            Query::Terms(q) => q.set_boost(boost),
            Query::Fuzzy(q) => q.set_boost(boost),
            Query::Exists(_) | Query::GeoDistance(_) | Query::GeoBoundingBox(_) | Query::Nested(_) => {}
        }
        self
    }

    /// Get the boolean combinator, if this is one.
    pub fn as_bool(&self) -> Option<&BoolQuery> {
        match self {
            Query::Bool(q) => Some(q),
            _ => None,
        }
    }

    /// Convert to a JSON value.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Bool(q) => fmt::Display::fmt(q, f),
            Query::QueryString(q) => fmt::Display::fmt(q, f),
            Query::Match(q) => fmt::Display::fmt(q, f),
            Query::Range(q) => fmt::Display::fmt(q, f),
            Query::Exists(q) => fmt::Display::fmt(q, f),
            Query::Wildcard(q) => fmt::Display::fmt(q, f),
            Query::Regexp(q) => fmt::Display::fmt(q, f),
            Query::Terms(q) => fmt::Display::fmt(q, f),
            Query::Fuzzy(q) => fmt::Display::fmt(q, f),
            Query::GeoDistance(q) => fmt::Display::fmt(q, f),
            Query::GeoBoundingBox(q) => fmt::Display::fmt(q, f),
            Query::Nested(q) => fmt::Display::fmt(q, f),
        }
    }
}

macro_rules! impl_from_leaf {
    ($($leaf:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$leaf> for Query {
                fn from(query: $leaf) -> Self {
                    Query::$variant(query)
                }
            }
        )*
    };
}

impl_from_leaf! {
    BoolQuery => Bool,
    QueryStringQuery => QueryString,
    MatchQuery => Match,
    RangeQuery => Range,
    ExistsQuery => Exists,
    WildcardQuery => Wildcard,
    RegexpQuery => Regexp,
    TermsQuery => Terms,
    FuzzyQuery => Fuzzy,
    GeoDistanceQuery => GeoDistance,
    GeoBoundingBoxQuery => GeoBoundingBox,
    NestedQuery => Nested,
}
