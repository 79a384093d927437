//! Compiled query expressions.
//!
//! A [`Query`] is the output of the compilers: boolean combinators over leaf
//! clauses, serializable one to one onto a search engine's query DSL.

pub mod boolean;
pub mod escape;
pub mod fuzzy;
pub mod geo;
pub mod nested;
#[allow(clippy::module_inception)]
pub mod query;
pub mod range;
pub mod string;
pub mod term;
pub mod wildcard;

pub use self::boolean::{BoolQuery, Occur};
pub use self::fuzzy::FuzzyQuery;
pub use self::geo::{
    Distance, DistanceUnit, GeoBoundingBoxQuery, GeoDistanceQuery, GeoError, GeoLocation, GeoPoint,
};
pub use self::nested::NestedQuery;
pub use self::query::Query;
pub use self::range::RangeQuery;
pub use self::string::{MatchOperator, MatchQuery, QueryStringQuery};
pub use self::term::{ExistsQuery, TermsQuery};
pub use self::wildcard::{RegexpQuery, WildcardQuery};
