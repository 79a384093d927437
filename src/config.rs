//! Configuration for the criteria compilers.
//!
//! The defaults produce the canonical output shapes: nested clauses are scored
//! with `avg`, geo-distance filters use the `plane` calculation.
//!
//! # Examples
//!
//! ```
//! use sarissa_criteria::config::{CompilerConfig, GeoDistanceType, ScoreMode};
//!
//! let config = CompilerConfig::default();
//! assert_eq!(config.nested_score_mode, ScoreMode::Avg);
//! assert_eq!(config.geo_distance_type, GeoDistanceType::Plane);
//!
//! let config = CompilerConfig::from_json(r#"{"nested_score_mode":"max"}"#).unwrap();
//! assert_eq!(config.nested_score_mode, ScoreMode::Max);
//! assert_eq!(config.geo_distance_type, GeoDistanceType::Plane);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// How the scores of matching nested documents are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreMode {
    /// Average of all matching nested documents.
    #[default]
    Avg,
    /// Highest score.
    Max,
    /// Lowest score.
    Min,
    /// Sum of all scores.
    Sum,
    /// Nested scores are ignored.
    None,
}

impl fmt::Display for ScoreMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScoreMode::Avg => "avg",
            ScoreMode::Max => "max",
            ScoreMode::Min => "min",
            ScoreMode::Sum => "sum",
            ScoreMode::None => "none",
        };
        f.write_str(name)
    }
}

/// Distance calculation used by geo-distance filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeoDistanceType {
    /// Fast planar approximation.
    #[default]
    Plane,
    /// Great-circle distance.
    Arc,
}

/// Configuration shared by the query and filter compilers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Score mode written into every nested wrapper.
    pub nested_score_mode: ScoreMode,
    /// Calculation type written into every geo-distance filter.
    pub geo_distance_type: GeoDistanceType,
}

impl CompilerConfig {
    /// Load a configuration from JSON. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the nested score mode.
    pub fn with_nested_score_mode(mut self, mode: ScoreMode) -> Self {
        self.nested_score_mode = mode;
        self
    }

    /// Set the geo distance type.
    pub fn with_geo_distance_type(mut self, distance_type: GeoDistanceType) -> Self {
        self.geo_distance_type = distance_type;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CompilerConfig::default();
        assert_eq!(config.nested_score_mode, ScoreMode::Avg);
        assert_eq!(config.geo_distance_type, GeoDistanceType::Plane);
    }

    #[test]
    fn test_config_from_json() {
        let config =
            CompilerConfig::from_json(r#"{"nested_score_mode":"sum","geo_distance_type":"arc"}"#)
                .unwrap();
        assert_eq!(config.nested_score_mode, ScoreMode::Sum);
        assert_eq!(config.geo_distance_type, GeoDistanceType::Arc);

        assert!(CompilerConfig::from_json(r#"{"nested_score_mode":"median"}"#).is_err());
    }

    #[test]
    fn test_config_builder() {
        let config = CompilerConfig::default()
            .with_nested_score_mode(ScoreMode::Max)
            .with_geo_distance_type(GeoDistanceType::Arc);
        assert_eq!(config.nested_score_mode, ScoreMode::Max);
        assert_eq!(config.geo_distance_type, GeoDistanceType::Arc);
        assert_eq!(config.nested_score_mode.to_string(), "max");
    }
}
