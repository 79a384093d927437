//! Compiles criteria filter entries into a non-scoring filter.
//!
//! Only geographical operators are filter operators. Unlike the query side
//! there is no held-back first clause: every node is routed by its own flags
//! as it is visited, negation taking precedence over OR.

use tracing::debug;

use crate::compiler::{ClauseLists, combine_entries, wrap_nested};
use crate::config::CompilerConfig;
use crate::criteria::{Criteria, CriteriaEntry, CriteriaNode, Field, Operator, Value};
use crate::error::{CriteriaError, Result};
use crate::query::{GeoBoundingBoxQuery, GeoDistanceQuery, GeoError, GeoLocation, Occur, Query};

/// Compiler for the filter part of a criteria tree.
#[derive(Debug, Clone, Default)]
pub struct FilterCompiler {
    config: CompilerConfig,
}

impl FilterCompiler {
    /// Create a compiler with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a compiler with a custom configuration.
    pub fn with_config(config: CompilerConfig) -> Self {
        FilterCompiler { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile the filter entries of `criteria`.
    ///
    /// Returns `Ok(None)` when the tree holds no filter entries at all.
    pub fn compile(&self, criteria: &Criteria) -> Result<Option<Query>> {
        debug!(nodes = criteria.chain().len(), "compiling criteria filter");
        let filter = self.compile_chain(criteria)?;
        match &filter {
            Some(filter) => debug!(query_type = filter.query_type(), %filter, "compiled criteria filter"),
            None => debug!("criteria carry no filter entries"),
        }
        Ok(filter)
    }

    fn compile_chain(&self, criteria: &Criteria) -> Result<Option<Query>> {
        let mut clauses = ClauseLists::default();

        for node in criteria.chain() {
            if let Some(clause) = self.node_clause(node)? {
                clauses.push(occur_for(node), clause);
            }
            for sub_criteria in node.sub_criteria() {
                if let Some(sub_filter) = self.compile_chain(sub_criteria)? {
                    clauses.push(occur_for(node), sub_filter);
                }
            }
        }

        Ok(clauses.into_query())
    }

    fn node_clause(&self, node: &CriteriaNode) -> Result<Option<Query>> {
        let entries = node.filter_entries();
        if entries.is_empty() {
            return Ok(None);
        }
        let field = node.field().ok_or_else(|| {
            CriteriaError::invalid_entry(
                node.field_name(),
                entries[0].operator(),
                "entries require a field",
            )
        })?;

        let leaves = entries
            .iter()
            .map(|entry| self.filter_leaf(field, entry))
            .collect::<Result<Vec<_>>>()?;

        Ok(combine_entries(leaves).map(|clause| wrap_nested(field, clause, &self.config)))
    }

    fn filter_leaf(&self, field: &Field, entry: &CriteriaEntry) -> Result<Query> {
        let operator = entry.operator();
        match operator {
            Operator::Within => {
                let (location, distance) = pair(field, entry)?;
                let location = location_value(field, operator, location)?;
                let distance = distance_value(field, operator, distance)?;
                Ok(GeoDistanceQuery::new(
                    field.name(),
                    location,
                    distance,
                    self.config.geo_distance_type,
                )
                .into())
            }
            Operator::Bbox => {
                let (top_left, bottom_right) = pair(field, entry)?;
                let top_left = location_value(field, operator, top_left)?;
                let bottom_right = location_value(field, operator, bottom_right)?;
                GeoBoundingBoxQuery::new(field.name(), top_left, bottom_right)
                    .map(Query::from)
                    .map_err(|e| geo_invalid(field, operator, e))
            }
            _ => Err(CriteriaError::unsupported(format!(
                "{operator} on field '{}' is a query operator and cannot be compiled into a filter",
                field.name()
            ))),
        }
    }
}

fn occur_for(node: &CriteriaNode) -> Occur {
    if node.is_negating() {
        Occur::MustNot
    } else if node.is_or() {
        Occur::Should
    } else {
        Occur::Must
    }
}

fn geo_invalid(field: &Field, operator: Operator, error: GeoError) -> CriteriaError {
    CriteriaError::invalid_entry(field.name(), operator, error.to_string())
}

fn pair<'a>(field: &Field, entry: &'a CriteriaEntry) -> Result<(&'a Value, &'a Value)> {
    let operator = entry.operator();
    let value = entry
        .value()
        .ok_or_else(|| CriteriaError::invalid_entry(field.name(), operator, "missing value"))?;
    match value.as_list() {
        Some([first, second]) => Ok((first, second)),
        _ => Err(CriteriaError::invalid_entry(
            field.name(),
            operator,
            format!("expected a 2-element list, got {}", value.type_name()),
        )),
    }
}

fn location_value(field: &Field, operator: Operator, value: &Value) -> Result<GeoLocation> {
    match value {
        Value::String(text) => {
            GeoLocation::parse(text).map_err(|e| geo_invalid(field, operator, e))
        }
        Value::GeoPoint(point) => {
            point
                .validate()
                .map_err(|e| geo_invalid(field, operator, e))?;
            Ok(GeoLocation::Point(*point))
        }
        other => Err(CriteriaError::invalid_entry(
            field.name(),
            operator,
            format!("expected a location, got {}", other.type_name()),
        )),
    }
}

fn distance_value(field: &Field, operator: Operator, value: &Value) -> Result<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Ok(text.clone()),
        Value::Distance(distance) if distance.value.is_finite() && distance.value >= 0.0 => {
            Ok(distance.to_string())
        }
        Value::Distance(distance) => Err(CriteriaError::invalid_entry(
            field.name(),
            operator,
            format!("distance must be a finite non-negative amount, got {}", distance.value),
        )),
        other => Err(CriteriaError::invalid_entry(
            field.name(),
            operator,
            format!("expected a distance, got {}", other.type_name()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GeoDistanceType, ScoreMode};
    use crate::query::{BoolQuery, Distance, GeoPoint, NestedQuery};

    fn within(field: &str, location: &str, distance: &str) -> Query {
        GeoDistanceQuery::new(
            field,
            GeoLocation::parse(location).unwrap(),
            distance,
            GeoDistanceType::Plane,
        )
        .into()
    }

    fn compile(criteria: &Criteria) -> Option<Query> {
        FilterCompiler::new().compile(criteria).unwrap()
    }

    #[test]
    fn test_no_filter_entries() {
        assert_eq!(compile(&Criteria::new("name").is("x")), None);
        assert_eq!(compile(&Criteria::anchor()), None);
    }

    #[test]
    fn test_single_within() {
        let criteria = Criteria::new("location").within("45.7806,3.0875", "20km");
        assert_eq!(
            compile(&criteria),
            Some(within("location", "45.7806,3.0875", "20km"))
        );
    }

    #[test]
    fn test_within_typed_values() {
        let point = GeoPoint::new(45.7806, 3.0875).unwrap();
        let criteria = Criteria::new("location").within(point, Distance::kilometers(12.9));
        let expected = GeoDistanceQuery::new(
            "location",
            GeoLocation::Point(point),
            "12km",
            GeoDistanceType::Plane,
        );
        assert_eq!(compile(&criteria), Some(expected.into()));
    }

    #[test]
    fn test_within_geohash() {
        let criteria = Criteria::new("location").within("u0qvy", Distance::miles(3.0));
        let expected = GeoDistanceQuery::new(
            "location",
            GeoLocation::geohash("u0qvy"),
            "3mi",
            GeoDistanceType::Plane,
        );
        assert_eq!(compile(&criteria), Some(expected.into()));
    }

    #[test]
    fn test_distance_type_from_config() {
        let compiler = FilterCompiler::with_config(
            CompilerConfig::default().with_geo_distance_type(GeoDistanceType::Arc),
        );
        let criteria = Criteria::new("location").within("1,2", "5km");
        let expected =
            GeoDistanceQuery::new("location", GeoLocation::parse("1,2").unwrap(), "5km", GeoDistanceType::Arc);
        assert_eq!(compiler.compile(&criteria).unwrap(), Some(expected.into()));
    }

    #[test]
    fn test_bounding_box() {
        let criteria = Criteria::new("location").bounding_box("53.5,-5.0", "50.0,1.5");
        let expected = GeoBoundingBoxQuery::new(
            "location",
            GeoLocation::parse("53.5,-5.0").unwrap(),
            GeoLocation::parse("50.0,1.5").unwrap(),
        )
        .unwrap();
        assert_eq!(compile(&criteria), Some(expected.into()));
    }

    #[test]
    fn test_inverted_bounding_box_is_rejected() {
        let criteria = Criteria::new("location").bounding_box("50.0,-5.0", "53.5,1.5");
        assert!(matches!(
            FilterCompiler::new().compile(&criteria),
            Err(CriteriaError::InvalidEntry { .. })
        ));
    }

    #[test]
    fn test_and_or_not_routing() {
        let criteria = Criteria::new("a")
            .within("1,1", "1km")
            .or("b")
            .within("2,2", "2km")
            .and("c")
            .within("3,3", "3km")
            .not();
        let expected = BoolQuery::new()
            .must(within("a", "1,1", "1km"))
            .should(within("b", "2,2", "2km"))
            .must_not(within("c", "3,3", "3km"));
        assert_eq!(compile(&criteria), Some(expected.into()));
    }

    #[test]
    fn test_negated_or_goes_to_must_not() {
        let criteria = Criteria::new("a")
            .within("1,1", "1km")
            .or("b")
            .within("2,2", "2km")
            .not();
        let expected = BoolQuery::new()
            .must(within("a", "1,1", "1km"))
            .must_not(within("b", "2,2", "2km"));
        assert_eq!(compile(&criteria), Some(expected.into()));
    }

    #[test]
    fn test_lone_negated_filter_keeps_wrapper() {
        let criteria = Criteria::new("a").within("1,1", "1km").not();
        let expected = BoolQuery::new().must_not(within("a", "1,1", "1km"));
        assert_eq!(compile(&criteria), Some(expected.into()));
    }

    #[test]
    fn test_sub_criteria() {
        let criteria = Criteria::new("a").within("1,1", "1km").or_group(
            Criteria::new("b")
                .within("2,2", "2km")
                .and("c")
                .within("3,3", "3km"),
        );
        let expected = BoolQuery::new().must(within("a", "1,1", "1km")).should(
            BoolQuery::new()
                .must(within("b", "2,2", "2km"))
                .must(within("c", "3,3", "3km"))
                .into(),
        );
        assert_eq!(compile(&criteria), Some(expected.into()));
    }

    #[test]
    fn test_nested_filter() {
        let field = Field::new("shops.location").with_path("shops");
        let criteria = Criteria::new(field).within("1,2", "3km");
        let expected = NestedQuery::new("shops", within("shops.location", "1,2", "3km"), ScoreMode::Avg);
        assert_eq!(compile(&criteria), Some(expected.into()));
    }

    #[test]
    fn test_invalid_shapes() {
        let compiler = FilterCompiler::new();
        let bad = [
            Criteria::new("l").within("91,0", "1km"),
            Criteria::new("l").within("not a hash!", "1km"),
            Criteria::new("l").within("1,2", ""),
            Criteria::new("l").within(3, "1km"),
            Criteria::new("l").filter_entry(CriteriaEntry::new(Operator::Within, "1,2")),
            Criteria::new("l").filter_entry(CriteriaEntry::new(Operator::Within, vec!["1,2"])),
            Criteria::new("l").filter_entry(CriteriaEntry::flag(Operator::Bbox)),
        ];
        for criteria in &bad {
            assert!(
                matches!(compiler.compile(criteria), Err(CriteriaError::InvalidEntry { .. })),
                "{criteria:?}"
            );
        }
    }

    #[test]
    fn test_malformed_distances_are_rejected() {
        let compiler = FilterCompiler::new();
        for distance in [
            Distance::kilometers(f64::NAN),
            Distance::kilometers(f64::INFINITY),
            Distance::miles(-5.0),
        ] {
            let criteria = Criteria::new("l").within("1,2", distance);
            assert!(
                matches!(compiler.compile(&criteria), Err(CriteriaError::InvalidEntry { .. })),
                "{distance:?}"
            );
        }

        let criteria = Criteria::new("l").within("1,2", Distance::kilometers(0.0));
        assert!(compiler.compile(&criteria).unwrap().is_some());
    }

    #[test]
    fn test_query_operator_in_filter_entries() {
        let criteria = Criteria::new("name").filter_entry(CriteriaEntry::new(Operator::Equals, "x"));
        assert!(matches!(
            FilterCompiler::new().compile(&criteria),
            Err(CriteriaError::UnsupportedCriteriaType(_))
        ));
    }
}
