//! Range query over ordered values.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::criteria::Value;

/// A query that matches field values within lower and upper bounds.
///
/// Missing bounds are open and are omitted when serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeQuery {
    field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lt: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lte: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gt: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gte: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    boost: Option<f32>,
}

impl RangeQuery {
    /// Create a new unbounded range query.
    pub fn new<S: Into<String>>(field: S) -> Self {
        RangeQuery {
            field: field.into(),
            lt: None,
            lte: None,
            gt: None,
            gte: None,
            boost: None,
        }
    }

    /// Create a range query for values less than the given value.
    pub fn less_than<S: Into<String>, V: Into<Value>>(field: S, value: V) -> Self {
        Self::new(field).lt(value)
    }

    /// Create a range query for values less than or equal to the given value.
    pub fn less_than_or_equal<S: Into<String>, V: Into<Value>>(field: S, value: V) -> Self {
        Self::new(field).lte(value)
    }

    /// Create a range query for values greater than the given value.
    pub fn greater_than<S: Into<String>, V: Into<Value>>(field: S, value: V) -> Self {
        Self::new(field).gt(value)
    }

    /// Create a range query for values greater than or equal to the given value.
    pub fn greater_than_or_equal<S: Into<String>, V: Into<Value>>(field: S, value: V) -> Self {
        Self::new(field).gte(value)
    }

    /// Set the exclusive upper bound.
    pub fn lt<V: Into<Value>>(mut self, value: V) -> Self {
        self.lt = bound(value);
        self
    }

    /// Set the inclusive upper bound.
    pub fn lte<V: Into<Value>>(mut self, value: V) -> Self {
        self.lte = bound(value);
        self
    }

    /// Set the exclusive lower bound.
    pub fn gt<V: Into<Value>>(mut self, value: V) -> Self {
        self.gt = bound(value);
        self
    }

    /// Set the inclusive lower bound.
    pub fn gte<V: Into<Value>>(mut self, value: V) -> Self {
        self.gte = bound(value);
        self
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

    /// Get the exclusive upper bound.
    pub fn lt_value(&self) -> Option<&Value> {
        self.lt.as_ref()
    }

    /// Get the inclusive upper bound.
    pub fn lte_value(&self) -> Option<&Value> {
        self.lte.as_ref()
    }

    /// Get the exclusive lower bound.
    pub fn gt_value(&self) -> Option<&Value> {
        self.gt.as_ref()
    }

    /// Get the inclusive lower bound.
    pub fn gte_value(&self) -> Option<&Value> {
        self.gte.as_ref()
    }

    /// Check if no bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.lt.is_none() && self.lte.is_none() && self.gt.is_none() && self.gte.is_none()
    }

    /// Get the boost factor, if set.
    pub fn boost(&self) -> Option<f32> {
        self.boost
    }

    pub(crate) fn set_boost(&mut self, boost: f32) {
        self.boost = Some(boost);
    }
}

// Null is an open bound, not a value.
fn bound<V: Into<Value>>(value: V) -> Option<Value> {
    let value = value.into();
    if value.is_null() { None } else { Some(value) }
}

impl fmt::Display for RangeQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (open, lower) = match (&self.gte, &self.gt) {
            (Some(v), _) => ('[', v.to_string()),
            (None, Some(v)) => ('{', v.to_string()),
            (None, None) => ('[', "*".to_string()),
        };
        let (close, upper) = match (&self.lte, &self.lt) {
            (Some(v), _) => (']', v.to_string()),
            (None, Some(v)) => ('}', v.to_string()),
            (None, None) => (']', "*".to_string()),
        };
        write!(f, "{}:{open}{lower} TO {upper}{close}", self.field)?;
        if let Some(boost) = self.boost {
            write!(f, "^{boost}")?;
        }
        Ok(())
    }
}
