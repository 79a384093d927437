//! Pattern leaves: wildcard and regular expression.
//!
//! Patterns are passed to the engine verbatim. `*` and `?` keep their
//! wildcard meaning; regular expressions use the engine's own syntax.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A query that matches terms against a wildcard pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WildcardQuery {
    field: String,
    pattern: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    boost: Option<f32>,
}

impl WildcardQuery {
    /// Create a new wildcard query.
    pub fn new<F, P>(field: F, pattern: P) -> Self
    where
        F: Into<String>,
        P: Into<String>,
    {
        WildcardQuery {
            field: field.into(),
            pattern: pattern.into(),
            boost: None,
        }
    }

    /// Set the boost factor for this query.
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = Some(boost);
        self
    }

    /// Get the field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Get the wildcard pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Get the boost factor, if set.
    pub fn boost(&self) -> Option<f32> {
        self.boost
    }

    pub(crate) fn set_boost(&mut self, boost: f32) {
        self.boost = Some(boost);
    }
}

impl fmt::Display for WildcardQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field, self.pattern)?;
        if let Some(boost) = self.boost {
            write!(f, "^{boost}")?;
        }
        Ok(())
    }
}

/// A query that matches terms against a regular expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegexpQuery {
    field: String,
    value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    boost: Option<f32>,
}

impl RegexpQuery {
    /// Create a new regexp query.
    pub fn new<F, V>(field: F, value: V) -> Self
    where
        F: Into<String>,
        V: Into<String>,
    {
        RegexpQuery {
            field: field.into(),
            value: value.into(),
            boost: None,
        }
    }

    /// Set the boost factor for this query.
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = Some(boost);
        self
    }

    /// Get the field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Get the regular expression.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Get the boost factor, if set.
    pub fn boost(&self) -> Option<f32> {
        self.boost
    }

    pub(crate) fn set_boost(&mut self, boost: f32) {
        self.boost = Some(boost);
    }
}

impl fmt::Display for RegexpQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:/{}/", self.field, self.value)?;
        if let Some(boost) = self.boost {
            write!(f, "^{boost}")?;
        }
        Ok(())
    }
}
