//! Fuzzy query for approximate term matching.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A query that matches terms within the engine's default edit distance of a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzyQuery {
    field: String,
    value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    boost: Option<f32>,
}

impl FuzzyQuery {
    /// Create a new fuzzy query.
    pub fn new<F, V>(field: F, value: V) -> Self
    where
        F: Into<String>,
        V: Into<String>,
    {
        FuzzyQuery {
            field: field.into(),
            value: value.into(),
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

    /// Get the value.
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

impl fmt::Display for FuzzyQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}~", self.field, self.value)?;
        if let Some(boost) = self.boost {
            write!(f, "^{boost}")?;
        }
        Ok(())
    }
}
