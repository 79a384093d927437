//! Operator/value pairs attached to a criteria node.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::criteria::value::Value;

/// The closed set of criteria operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    /// Analyzed phrase match.
    Equals,
    /// `*value*`
    Contains,
    /// `value*`
    StartsWith,
    /// `*value`
    EndsWith,
    /// Raw query-string expression.
    Expression,
    /// Strictly less than.
    Less,
    /// Less than or equal.
    LessEqual,
    /// Strictly greater than.
    Greater,
    /// Greater than or equal.
    GreaterEqual,
    /// Inclusive range, either bound may be open.
    Between,
    /// Fuzzy match.
    Fuzzy,
    /// Match any analyzed term.
    Matches,
    /// Match all analyzed terms.
    MatchesAll,
    /// Value is one of a set.
    In,
    /// Value is none of a set.
    NotIn,
    /// Regular expression.
    Regexp,
    /// Field presence.
    Exists,
    /// Field exists without any non-blank value.
    Empty,
    /// Field has any value.
    NotEmpty,
    /// Geo-distance filter.
    Within,
    /// Geo bounding box filter.
    Bbox,
}

impl Operator {
    /// Check whether this operator is compiled by the filter compiler.
    pub fn is_filter(&self) -> bool {
        matches!(self, Operator::Within | Operator::Bbox)
    }

    /// Check whether this operator reads a flag instead of a value.
    pub fn is_valueless(&self) -> bool {
        matches!(self, Operator::Exists | Operator::Empty | Operator::NotEmpty)
    }

    /// Get the canonical operator name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equals => "EQUALS",
            Operator::Contains => "CONTAINS",
            Operator::StartsWith => "STARTS_WITH",
            Operator::EndsWith => "ENDS_WITH",
            Operator::Expression => "EXPRESSION",
            Operator::Less => "LESS",
            Operator::LessEqual => "LESS_EQUAL",
            Operator::Greater => "GREATER",
            Operator::GreaterEqual => "GREATER_EQUAL",
            Operator::Between => "BETWEEN",
            Operator::Fuzzy => "FUZZY",
            Operator::Matches => "MATCHES",
            Operator::MatchesAll => "MATCHES_ALL",
            Operator::In => "IN",
            Operator::NotIn => "NOT_IN",
            Operator::Regexp => "REGEXP",
            Operator::Exists => "EXISTS",
            Operator::Empty => "EMPTY",
            Operator::NotEmpty => "NOT_EMPTY",
            Operator::Within => "WITHIN",
            Operator::Bbox => "BBOX",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One operator with its value.
///
/// EXISTS, EMPTY and NOT_EMPTY carry no value; EXISTS may carry a boolean
/// flag, defaulting to `true`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriteriaEntry {
    operator: Operator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
}

impl CriteriaEntry {
    /// Create a new entry.
    pub fn new<V: Into<Value>>(operator: Operator, value: V) -> Self {
        CriteriaEntry {
            operator,
            value: Some(value.into()),
        }
    }

    /// Create an entry without a value.
    pub fn flag(operator: Operator) -> Self {
        CriteriaEntry {
            operator,
            value: None,
        }
    }

    /// Get the operator.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Get the value, if any.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }
}
