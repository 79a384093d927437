//! Values carried by criteria entries.
//!
//! [`Value`] is the dynamically shaped payload of a [`CriteriaEntry`](super::CriteriaEntry).
//! Operators decide which shapes they accept; the shape check happens when the
//! entry is built (for the typed builder methods) or when it is compiled.
//!
//! # Examples
//!
//! ```
//! use sarissa_criteria::criteria::Value;
//!
//! let value: Value = "Rust".into();
//! assert_eq!(value.as_text(), Some("Rust".to_string()));
//!
//! let value: Value = vec![1, 2, 3].into();
//! assert_eq!(value.as_list().map(|l| l.len()), Some(3));
//!
//! let value: Value = None::<i64>.into();
//! assert!(value.is_null());
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::query::geo::{Distance, GeoPoint};

/// A criteria value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent value, also used for open range bounds.
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// DateTime value, listed before `String` so RFC 3339 text reads back as a datetime
    DateTime(DateTime<Utc>),
    /// Text value
    String(String),
    /// Geographic point value
    GeoPoint(GeoPoint),
    /// Distance with a unit
    Distance(Distance),
    /// Ordered list of values
    List(Vec<Value>),
}

impl Value {
    /// Check if this is the null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get the value as query text.
    ///
    /// Scalars render as their literal text, datetimes as RFC 3339. Null,
    /// lists, points and distances have no text form.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Bool(b) => Some(b.to_string()),
            Value::Integer(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::String(s) => Some(s.clone()),
            Value::DateTime(dt) => Some(dt.to_rfc3339()),
            Value::Null | Value::GeoPoint(_) | Value::Distance(_) | Value::List(_) => None,
        }
    }

    /// Get the value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the value as a list.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(values) => Some(values),
            _ => None,
        }
    }

    /// Name of the value shape, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::DateTime(_) => "datetime",
            Value::GeoPoint(_) => "geo_point",
            Value::Distance(_) => "distance",
            Value::List(_) => "list",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("*"),
            Value::GeoPoint(point) => write!(f, "{},{}", point.lat, point.lon),
            Value::Distance(distance) => write!(f, "{distance}"),
            Value::List(values) => {
                f.write_str("[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
            other => match other.as_text() {
                Some(text) => f.write_str(&text),
                None => Ok(()),
            },
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value as f64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::DateTime(value)
    }
}

impl From<GeoPoint> for Value {
    fn from(value: GeoPoint) -> Self {
        Value::GeoPoint(value)
    }
}

impl From<Distance> for Value {
    fn from(value: Distance) -> Self {
        Value::Distance(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::query::geo::DistanceUnit;

    #[test]
    fn test_value_as_text() {
        assert_eq!(Value::from("abc").as_text(), Some("abc".to_string()));
        assert_eq!(Value::from(42).as_text(), Some("42".to_string()));
        assert_eq!(Value::from(1.5).as_text(), Some("1.5".to_string()));
        assert_eq!(Value::from(true).as_text(), Some("true".to_string()));
        assert_eq!(Value::Null.as_text(), None);
        assert_eq!(Value::from(vec!["a", "b"]).as_text(), None);

        let dt = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(
            Value::from(dt).as_text(),
            Some("2024-01-02T03:04:05+00:00".to_string())
        );
    }

    #[test]
    fn test_value_display() {
        let value = Value::from(vec![Value::from(1), Value::Null]);
        assert_eq!(value.to_string(), "[1, *]");

        let value = Value::from(Distance::new(5.0, DistanceUnit::Kilometers));
        assert_eq!(value.to_string(), "5km");
    }

    #[test]
    fn test_value_json() {
        let value = Value::from(vec![Value::from("a"), Value::from(2), Value::Null]);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"["a",2,null]"#);
    }

    #[test]
    fn test_value_json_keeps_datetime() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let json = serde_json::to_string(&Value::from(dt)).unwrap();
        assert_eq!(serde_json::from_str::<Value>(&json).unwrap(), Value::DateTime(dt));

        // plain text still reads back as text
        let parsed: Value = serde_json::from_str(r#""Alice""#).unwrap();
        assert_eq!(parsed, Value::from("Alice"));
    }
}
