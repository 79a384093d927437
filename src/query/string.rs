//! Query-string and match leaves.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Operator used to combine analyzed terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchOperator {
    /// All terms must match.
    And,
    /// Any term may match.
    Or,
}

impl fmt::Display for MatchOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchOperator::And => f.write_str("AND"),
            MatchOperator::Or => f.write_str("OR"),
        }
    }
}

/// A query in the engine's query-string micro-syntax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryStringQuery {
    fields: Vec<String>,
    query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_operator: Option<MatchOperator>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    analyze_wildcard: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    boost: Option<f32>,
}

impl QueryStringQuery {
    /// Create a new query-string query over a single field.
    pub fn new<F, Q>(field: F, query: Q) -> Self
    where
        F: Into<String>,
        Q: Into<String>,
    {
        QueryStringQuery {
            fields: vec![field.into()],
            query: query.into(),
            default_operator: None,
            analyze_wildcard: false,
            boost: None,
        }
    }

    /// Set the default operator.
    pub fn with_default_operator(mut self, operator: MatchOperator) -> Self {
        self.default_operator = Some(operator);
        self
    }

    /// Analyze terms containing wildcards.
    pub fn with_analyze_wildcard(mut self) -> Self {
        self.analyze_wildcard = true;
        self
    }

    /// Set the boost factor.
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = Some(boost);
        self
    }

    /// Get the target fields.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Get the query text.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Get the default operator, if set.
    pub fn default_operator(&self) -> Option<MatchOperator> {
        self.default_operator
    }

    /// Check whether wildcard terms are analyzed.
    pub fn analyze_wildcard(&self) -> bool {
        self.analyze_wildcard
    }

    /// Get the boost factor, if set.
    pub fn boost(&self) -> Option<f32> {
        self.boost
    }

    pub(crate) fn set_boost(&mut self, boost: f32) {
        self.boost = Some(boost);
    }
}

impl fmt::Display for QueryStringQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:({})", self.fields.join(","), self.query)?;
        if let Some(boost) = self.boost {
            write!(f, "^{boost}")?;
        }
        Ok(())
    }
}

/// An analyzed full-text match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchQuery {
    field: String,
    query: String,
    operator: MatchOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    boost: Option<f32>,
}

impl MatchQuery {
    /// Create a new match query.
    pub fn new<F, Q>(field: F, query: Q, operator: MatchOperator) -> Self
    where
        F: Into<String>,
        Q: Into<String>,
    {
        MatchQuery {
            field: field.into(),
            query: query.into(),
            operator,
            boost: None,
        }
    }

    /// Set the boost factor.
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = Some(boost);
        self
    }

    /// Get the field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Get the query text.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Get the operator.
    pub fn operator(&self) -> MatchOperator {
        self.operator
    }

    /// Get the boost factor, if set.
    pub fn boost(&self) -> Option<f32> {
        self.boost
    }

    pub(crate) fn set_boost(&mut self, boost: f32) {
        self.boost = Some(boost);
    }
}

impl fmt::Display for MatchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:\"{}\"~{}", self.field, self.query, self.operator)?;
        if let Some(boost) = self.boost {
            write!(f, "^{boost}")?;
        }
        Ok(())
    }
}
