//! Target fields of criteria entries.

use serde::{Deserialize, Serialize};

/// How string values are matched against a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Analyzed text field.
    #[default]
    Default,
    /// Exact-value keyword field.
    Keyword,
}

/// A resolved field name, optionally living inside a nested document.
///
/// Names are taken as-is: mapping a logical property to a stored field name
/// happens before criteria are built.
///
/// # Examples
///
/// ```
/// use sarissa_criteria::criteria::{Field, FieldKind};
///
/// let field = Field::new("houses.inhabitants.name").with_path("houses.inhabitants");
/// assert_eq!(field.path(), Some("houses.inhabitants"));
///
/// let tags = Field::keyword("tags");
/// assert_eq!(tags.kind(), FieldKind::Keyword);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(default)]
    kind: FieldKind,
}

impl Field {
    /// Create a new field with the default kind and no nested path.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Field {
            name: name.into(),
            path: None,
            kind: FieldKind::Default,
        }
    }

    /// Create a new keyword field.
    pub fn keyword<S: Into<String>>(name: S) -> Self {
        Field::new(name).with_kind(FieldKind::Keyword)
    }

    /// Set the nested document path.
    pub fn with_path<S: Into<String>>(mut self, path: S) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the field kind.
    pub fn with_kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    /// Get the field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the nested document path, if any.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the field kind.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Check whether this is a keyword field.
    pub fn is_keyword(&self) -> bool {
        self.kind == FieldKind::Keyword
    }
}

impl From<&str> for Field {
    fn from(name: &str) -> Self {
        Field::new(name)
    }
}

impl From<String> for Field {
    fn from(name: String) -> Self {
        Field::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_creation() {
        let field = Field::new("title");
        assert_eq!(field.name(), "title");
        assert_eq!(field.path(), None);
        assert_eq!(field.kind(), FieldKind::Default);
        assert!(!field.is_keyword());

        let field: Field = "title".into();
        assert_eq!(field, Field::new("title"));
    }

    #[test]
    fn test_nested_keyword_field() {
        let field = Field::keyword("houses.street").with_path("houses");
        assert_eq!(field.path(), Some("houses"));
        assert!(field.is_keyword());
    }
}
