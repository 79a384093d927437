//! Error types for criteria construction and compilation.
//!
//! All failures are represented by the [`CriteriaError`] enum. Compilers never
//! recover from malformed input locally: the first offending entry aborts the
//! compilation and is reported with its field and operator.
//!
//! An empty criteria tree is not an error. Compilers return `Ok(None)` for it.
//!
//! # Examples
//!
//! ```
//! use sarissa_criteria::criteria::Criteria;
//! use sarissa_criteria::error::CriteriaError;
//!
//! let err = Criteria::new("price").try_between("cheap".into()).unwrap_err();
//! assert!(matches!(err, CriteriaError::InvalidEntry { .. }));
//! ```

use thiserror::Error;

use crate::criteria::Operator;
use crate::query::geo::GeoError;

/// The main error type for criteria operations.
#[derive(Error, Debug)]
pub enum CriteriaError {
    /// An operator received a value of the wrong shape.
    #[error("Invalid entry for field '{field}' ({operator}): {message}")]
    InvalidEntry {
        /// The field the entry is attached to.
        field: String,
        /// The operator of the offending entry.
        operator: Operator,
        /// What was wrong with the value.
        message: String,
    },

    /// An operator or criteria shape that the compiler does not handle.
    #[error("Unsupported criteria type: {0}")]
    UnsupportedCriteriaType(String),

    /// Invalid geographical value built outside an entry.
    #[error("Geo error: {0}")]
    Geo(#[from] GeoError),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with CriteriaError.
pub type Result<T> = std::result::Result<T, CriteriaError>;

impl CriteriaError {
    /// Create a new invalid entry error.
    pub fn invalid_entry<F, M>(field: F, operator: Operator, message: M) -> Self
    where
        F: Into<String>,
        M: Into<String>,
    {
        CriteriaError::InvalidEntry {
            field: field.into(),
            operator,
            message: message.into(),
        }
    }

    /// Create a new unsupported criteria type error.
    pub fn unsupported<S: Into<String>>(msg: S) -> Self {
        CriteriaError::UnsupportedCriteriaType(msg.into())
    }
}
