//! Exact-value leaves: terms membership and field existence.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::criteria::Value;

/// A query that matches documents whose field holds one of several exact values.
///
/// Like Lucene term queries, the values are not analyzed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermsQuery {
    field: String,
    values: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    boost: Option<f32>,
}

impl TermsQuery {
    /// Create a new terms query.
    pub fn new<F, I, V>(field: F, values: I) -> Self
    where
        F: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        TermsQuery {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
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

    /// Get the values.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Get the boost factor, if set.
    pub fn boost(&self) -> Option<f32> {
        self.boost
    }

    pub(crate) fn set_boost(&mut self, boost: f32) {
        self.boost = Some(boost);
    }
}

impl fmt::Display for TermsQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: Vec<String> = self.values.iter().map(Value::to_string).collect();
        write!(f, "{}:({})", self.field, values.join(" "))?;
        if let Some(boost) = self.boost {
            write!(f, "^{boost}")?;
        }
        Ok(())
    }
}

/// A query that matches documents where the field is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistsQuery {
    field: String,
}

impl ExistsQuery {
    /// Create a new exists query.
    pub fn new<S: Into<String>>(field: S) -> Self {
        ExistsQuery {
            field: field.into(),
        }
    }

    /// Get the field name.
    pub fn field(&self) -> &str {
        &self.field
    }
}

impl fmt::Display for ExistsQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_exists_:{}", self.field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terms_query() {
        let query = TermsQuery::new("tags", vec!["rust", "search"]);
        assert_eq!(query.field(), "tags");
        assert_eq!(query.values(), [Value::from("rust"), Value::from("search")]);
        assert_eq!(query.to_string(), "tags:(rust search)");
    }

    #[test]
    fn test_terms_query_json() {
        let query = TermsQuery::new("ids", vec![1, 2]).with_boost(3.0);
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"field": "ids", "values": [1, 2], "boost": 3.0})
        );
    }

    #[test]
    fn test_exists_query() {
        let query = ExistsQuery::new("email");
        assert_eq!(query.field(), "email");
        assert_eq!(query.to_string(), "_exists_:email");
    }
}
