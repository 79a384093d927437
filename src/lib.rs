//! # Sarissa Criteria
//!
//! Fluent search criteria for Rust, compiled into boolean full-text query
//! expressions.
//!
//! ## Features
//!
//! - Chainable criteria builder with AND/OR/NOT and grouping
//! - Query compiler producing a scored boolean query
//! - Filter compiler for geographical constraints
//! - Nested document paths and keyword fields
//! - Serializable query tree
//!
//! ## Example
//!
//! ```
//! use sarissa_criteria::prelude::*;
//!
//! let criteria = Criteria::new("name")
//!     .is("Alice")
//!     .and("age")
//!     .less_than_equal(30)
//!     .not();
//!
//! let query = QueryCompiler::new().compile(&criteria).unwrap().unwrap();
//! assert_eq!(query.to_string(), "(+name:(Alice) -age:[* TO 30])");
//! ```

pub mod compiler;
pub mod config;
pub mod criteria;
pub mod error;
pub mod query;

pub mod prelude {
    pub use crate::compiler::{
        CompiledCriteria, FilterCompiler, QueryCompiler, compile_criteria, compile_criteria_with,
    };
    pub use crate::config::{CompilerConfig, GeoDistanceType, ScoreMode};
    pub use crate::criteria::{
        Conjunction, Criteria, CriteriaEntry, CriteriaNode, Field, FieldKind, Operator, Value,
    };
    pub use crate::error::{CriteriaError, Result};
    pub use crate::query::{
        BoolQuery, Distance, DistanceUnit, GeoLocation, GeoPoint, Occur, Query,
    };
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
