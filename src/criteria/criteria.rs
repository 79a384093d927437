//! The criteria chain and its fluent builder.
//!
//! A [`Criteria`] is an ordered, append-only chain of [`CriteriaNode`]s. Each
//! node targets one field, carries its own conjunction relative to its
//! predecessor, may be negated, and owns query entries, filter entries and
//! independent sub-criteria trees.
//!
//! Builder methods consume the criteria and return it, so a chain reads left
//! to right. Entry methods always attach to the most recently appended node.
//!
//! # Examples
//!
//! ```
//! use sarissa_criteria::criteria::{Conjunction, Criteria};
//!
//! // (last:Miller) AND (first:John OR first:Jack)
//! let criteria = Criteria::new("last").is("Miller").sub_criteria(
//!     Criteria::anchor().or("first").is("John").or("first").is("Jack"),
//! );
//!
//! assert_eq!(criteria.chain().len(), 1);
//! assert_eq!(criteria.chain()[0].sub_criteria().len(), 1);
//!
//! let chain = Criteria::new("a").is(1).or("b").is(2).not();
//! assert_eq!(chain.chain()[1].conjunction(), Conjunction::Or);
//! assert!(chain.chain()[1].is_negating());
//! ```

use std::ops::Bound;

use serde::{Deserialize, Serialize};

use crate::criteria::entry::{CriteriaEntry, Operator};
use crate::criteria::field::Field;
use crate::criteria::value::Value;
use crate::error::{CriteriaError, Result};

/// How a chain node combines with its predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Conjunction {
    /// Both must match.
    #[default]
    And,
    /// Either may match.
    Or,
}

/// One element of a criteria chain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CriteriaNode {
    field: Option<Field>,
    conjunction: Conjunction,
    negating: bool,
    boost: Option<f32>,
    query_entries: Vec<CriteriaEntry>,
    filter_entries: Vec<CriteriaEntry>,
    sub_criteria: Vec<Criteria>,
}

impl CriteriaNode {
    fn new(field: Option<Field>, conjunction: Conjunction) -> Self {
        CriteriaNode {
            field,
            conjunction,
            ..Default::default()
        }
    }

    /// Get the target field. `None` for a pure grouping anchor.
    pub fn field(&self) -> Option<&Field> {
        self.field.as_ref()
    }

    /// Get the field name, or `<none>` for a grouping anchor.
    pub fn field_name(&self) -> &str {
        self.field.as_ref().map_or("<none>", |f| f.name())
    }

    /// Get the conjunction with the previous node.
    pub fn conjunction(&self) -> Conjunction {
        self.conjunction
    }

    /// Check whether this node is OR-ed with its predecessor.
    pub fn is_or(&self) -> bool {
        self.conjunction == Conjunction::Or
    }

    /// Check whether this node is AND-ed with its predecessor.
    pub fn is_and(&self) -> bool {
        self.conjunction == Conjunction::And
    }

    /// Check whether this node is negated.
    pub fn is_negating(&self) -> bool {
        self.negating
    }

    /// Get the boost, if one was set.
    pub fn boost(&self) -> Option<f32> {
        self.boost
    }

    /// Get the entries compiled into the scored query.
    pub fn query_entries(&self) -> &[CriteriaEntry] {
        &self.query_entries
    }

    /// Get the entries compiled into the non-scoring filter.
    pub fn filter_entries(&self) -> &[CriteriaEntry] {
        &self.filter_entries
    }

    /// Get the attached sub-criteria trees.
    pub fn sub_criteria(&self) -> &[Criteria] {
        &self.sub_criteria
    }

    fn push_query_entry(&mut self, entry: CriteriaEntry) {
        if !self.query_entries.contains(&entry) {
            self.query_entries.push(entry);
        }
    }

    fn push_filter_entry(&mut self, entry: CriteriaEntry) {
        if !self.filter_entries.contains(&entry) {
            self.filter_entries.push(entry);
        }
    }
}

/// A chain of criteria nodes, built fluently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CriteriaChain")]
pub struct Criteria {
    /// Never empty: the root is created with the criteria.
    chain: Vec<CriteriaNode>,
}

/// Deserialized form of [`Criteria`], checked before use.
#[derive(Deserialize)]
struct CriteriaChain {
    chain: Vec<CriteriaNode>,
}

impl TryFrom<CriteriaChain> for Criteria {
    type Error = CriteriaError;

    fn try_from(raw: CriteriaChain) -> Result<Self> {
        if raw.chain.is_empty() {
            return Err(CriteriaError::unsupported(
                "criteria chain must hold at least a root node",
            ));
        }
        Ok(Criteria { chain: raw.chain })
    }
}

impl Default for Criteria {
    fn default() -> Self {
        Self::anchor()
    }
}

impl Criteria {
    /// Create a criteria whose root targets `field`.
    pub fn new<F: Into<Field>>(field: F) -> Self {
        Criteria {
            chain: vec![CriteriaNode::new(Some(field.into()), Conjunction::And)],
        }
    }

    /// Create a criteria whose root is a field-less AND anchor.
    pub fn anchor() -> Self {
        Criteria {
            chain: vec![CriteriaNode::new(None, Conjunction::And)],
        }
    }

    /// Create a criteria whose root is a field-less OR anchor.
    ///
    /// Sub-criteria attached to the root are routed as `should` clauses.
    pub fn anchor_or() -> Self {
        Criteria {
            chain: vec![CriteriaNode::new(None, Conjunction::Or)],
        }
    }

    /// Get the chain, root first.
    pub fn chain(&self) -> &[CriteriaNode] {
        &self.chain
    }

    /// Check whether no node of this tree carries any entry.
    pub fn is_empty(&self) -> bool {
        self.chain.iter().all(|node| {
            node.query_entries.is_empty()
                && node.filter_entries.is_empty()
                && node.sub_criteria.iter().all(Criteria::is_empty)
        })
    }

    fn current(&mut self) -> &mut CriteriaNode {
        let last = self.chain.len() - 1;
        &mut self.chain[last]
    }

    fn current_field_name(&self) -> String {
        self.chain
            .last()
            .map_or("<none>", CriteriaNode::field_name)
            .to_string()
    }

    fn with_query_entry(mut self, operator: Operator, value: Value) -> Self {
        self.current().push_query_entry(CriteriaEntry::new(operator, value));
        self
    }

    // Chain composition

    /// Append a node AND-ed with the chain.
    pub fn and<F: Into<Field>>(mut self, field: F) -> Self {
        self.chain
            .push(CriteriaNode::new(Some(field.into()), Conjunction::And));
        self
    }

    /// Append a node OR-ed with the chain.
    pub fn or<F: Into<Field>>(mut self, field: F) -> Self {
        self.chain
            .push(CriteriaNode::new(Some(field.into()), Conjunction::Or));
        self
    }

    /// Append a field-less node AND-ed with the chain, grouping `criteria`.
    pub fn and_group(mut self, criteria: Criteria) -> Self {
        let mut node = CriteriaNode::new(None, Conjunction::And);
        node.sub_criteria.push(criteria);
        self.chain.push(node);
        self
    }

    /// Append a field-less node OR-ed with the chain, grouping `criteria`.
    pub fn or_group(mut self, criteria: Criteria) -> Self {
        let mut node = CriteriaNode::new(None, Conjunction::Or);
        node.sub_criteria.push(criteria);
        self.chain.push(node);
        self
    }

    /// Negate the most recently appended node.
    pub fn not(mut self) -> Self {
        self.current().negating = true;
        self
    }

    /// Set the boost of the current node. NaN clears it.
    pub fn boost(mut self, boost: f32) -> Self {
        self.current().boost = if boost.is_nan() { None } else { Some(boost) };
        self
    }

    /// Attach an independent sub-tree to the current node.
    pub fn sub_criteria(mut self, criteria: Criteria) -> Self {
        self.current().sub_criteria.push(criteria);
        self
    }

    /// Attach several independent sub-trees to the current node.
    pub fn with_sub_criteria<I>(mut self, criteria: I) -> Self
    where
        I: IntoIterator<Item = Criteria>,
    {
        self.current().sub_criteria.extend(criteria);
        self
    }

    // Raw entries

    /// Attach a prebuilt entry to the current node's query entries.
    pub fn query_entry(mut self, entry: CriteriaEntry) -> Self {
        self.current().push_query_entry(entry);
        self
    }

    /// Attach a prebuilt entry to the current node's filter entries.
    pub fn filter_entry(mut self, entry: CriteriaEntry) -> Self {
        self.current().push_filter_entry(entry);
        self
    }

    // Query entries

    /// Field matches `value` as an analyzed phrase.
    pub fn is<V: Into<Value>>(self, value: V) -> Self {
        self.with_query_entry(Operator::Equals, value.into())
    }

    /// Field contains `value`.
    pub fn contains<V: Into<Value>>(self, value: V) -> Self {
        self.with_query_entry(Operator::Contains, value.into())
    }

    /// Field starts with `value`.
    pub fn starts_with<V: Into<Value>>(self, value: V) -> Self {
        self.with_query_entry(Operator::StartsWith, value.into())
    }

    /// Field ends with `value`.
    pub fn ends_with<V: Into<Value>>(self, value: V) -> Self {
        self.with_query_entry(Operator::EndsWith, value.into())
    }

    /// Field matches a raw query-string expression.
    pub fn expression<S: Into<String>>(self, expression: S) -> Self {
        self.with_query_entry(Operator::Expression, Value::String(expression.into()))
    }

    /// Field fuzzily matches `value`.
    pub fn fuzzy<V: Into<Value>>(self, value: V) -> Self {
        self.with_query_entry(Operator::Fuzzy, value.into())
    }

    /// Field matches any analyzed term of `value`.
    pub fn matches<V: Into<Value>>(self, value: V) -> Self {
        self.with_query_entry(Operator::Matches, value.into())
    }

    /// Field matches all analyzed terms of `value`.
    pub fn matches_all<V: Into<Value>>(self, value: V) -> Self {
        self.with_query_entry(Operator::MatchesAll, value.into())
    }

    /// Field matches the regular expression `pattern`.
    pub fn regexp<S: Into<String>>(self, pattern: S) -> Self {
        self.with_query_entry(Operator::Regexp, Value::String(pattern.into()))
    }

    /// Field is strictly less than `value`.
    pub fn less_than<V: Into<Value>>(self, value: V) -> Self {
        self.with_query_entry(Operator::Less, value.into())
    }

    /// Field is less than or equal to `value`.
    pub fn less_than_equal<V: Into<Value>>(self, value: V) -> Self {
        self.with_query_entry(Operator::LessEqual, value.into())
    }

    /// Field is strictly greater than `value`.
    pub fn greater_than<V: Into<Value>>(self, value: V) -> Self {
        self.with_query_entry(Operator::Greater, value.into())
    }

    /// Field is greater than or equal to `value`.
    pub fn greater_than_equal<V: Into<Value>>(self, value: V) -> Self {
        self.with_query_entry(Operator::GreaterEqual, value.into())
    }

    /// Field lies in the inclusive range. A [`Value::Null`] bound is open.
    pub fn between<L, U>(self, lower: L, upper: U) -> Self
    where
        L: Into<Value>,
        U: Into<Value>,
    {
        let range = Value::List(vec![lower.into(), upper.into()]);
        self.with_query_entry(Operator::Between, range)
    }

    /// Field lies in the inclusive range given as a 2-element list.
    pub fn try_between(self, range: Value) -> Result<Self> {
        match range.as_list() {
            Some([lower, upper]) if is_bound(lower) && is_bound(upper) => {}
            _ => {
                return Err(CriteriaError::invalid_entry(
                    self.current_field_name(),
                    Operator::Between,
                    format!("expected a 2-element range, got {}", describe(&range)),
                ));
            }
        }
        Ok(self.with_query_entry(Operator::Between, range))
    }

    /// Field lies within the given bounds.
    ///
    /// Inclusive or open bounds produce a single BETWEEN entry. As soon as one
    /// bound is exclusive, each bound becomes its own GREATER/LESS entry on
    /// the current node instead.
    pub fn between_bounds(self, lower: Bound<Value>, upper: Bound<Value>) -> Self {
        let exclusive =
            matches!(lower, Bound::Excluded(_)) || matches!(upper, Bound::Excluded(_));
        if !exclusive {
            return self.between(bound_value(lower), bound_value(upper));
        }

        let mut criteria = self;
        criteria = match lower {
            Bound::Included(v) => criteria.greater_than_equal(v),
            Bound::Excluded(v) => criteria.greater_than(v),
            Bound::Unbounded => criteria,
        };
        match upper {
            Bound::Included(v) => criteria.less_than_equal(v),
            Bound::Excluded(v) => criteria.less_than(v),
            Bound::Unbounded => criteria,
        }
    }

    /// Field is one of `values`.
    pub fn in_values<I, V>(self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = Value::List(values.into_iter().map(Into::into).collect());
        self.with_query_entry(Operator::In, values)
    }

    /// Field is none of `values`.
    pub fn not_in<I, V>(self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = Value::List(values.into_iter().map(Into::into).collect());
        self.with_query_entry(Operator::NotIn, values)
    }

    /// Field is one of the values of a list value.
    pub fn try_in(self, values: Value) -> Result<Self> {
        self.try_set_entry(Operator::In, values)
    }

    /// Field is none of the values of a list value.
    pub fn try_not_in(self, values: Value) -> Result<Self> {
        self.try_set_entry(Operator::NotIn, values)
    }

    fn try_set_entry(self, operator: Operator, values: Value) -> Result<Self> {
        if values.as_list().is_none() {
            return Err(CriteriaError::invalid_entry(
                self.current_field_name(),
                operator,
                format!("expected a list of values, got {}", values.type_name()),
            ));
        }
        Ok(self.with_query_entry(operator, values))
    }

    /// Field is present.
    pub fn exists(mut self) -> Self {
        self.current()
            .push_query_entry(CriteriaEntry::flag(Operator::Exists));
        self
    }

    /// Field is present (`true`) or absent (`false`).
    pub fn exists_flag(self, present: bool) -> Self {
        self.with_query_entry(Operator::Exists, Value::Bool(present))
    }

    /// Field exists but holds no non-blank value.
    pub fn empty(mut self) -> Self {
        self.current()
            .push_query_entry(CriteriaEntry::flag(Operator::Empty));
        self
    }

    /// Field holds any value.
    pub fn not_empty(mut self) -> Self {
        self.current()
            .push_query_entry(CriteriaEntry::flag(Operator::NotEmpty));
        self
    }

    // Filter entries

    /// Field lies within `distance` of `location`.
    ///
    /// `location` is a "lat,lon" string, a geohash or a [`GeoPoint`](crate::query::geo::GeoPoint);
    /// `distance` is a preformatted string such as `"12km"` or a
    /// [`Distance`](crate::query::geo::Distance). Shapes are checked by the
    /// filter compiler.
    pub fn within<L, D>(mut self, location: L, distance: D) -> Self
    where
        L: Into<Value>,
        D: Into<Value>,
    {
        let value = Value::List(vec![location.into(), distance.into()]);
        self.current()
            .push_filter_entry(CriteriaEntry::new(Operator::Within, value));
        self
    }

    /// Field lies inside the box spanned by two corners.
    pub fn bounding_box<T, B>(mut self, top_left: T, bottom_right: B) -> Self
    where
        T: Into<Value>,
        B: Into<Value>,
    {
        let value = Value::List(vec![top_left.into(), bottom_right.into()]);
        self.current()
            .push_filter_entry(CriteriaEntry::new(Operator::Bbox, value));
        self
    }
}

fn is_bound(value: &Value) -> bool {
    !matches!(
        value,
        Value::List(_) | Value::GeoPoint(_) | Value::Distance(_)
    )
}

fn bound_value(bound: Bound<Value>) -> Value {
    match bound {
        Bound::Included(v) | Bound::Excluded(v) => v,
        Bound::Unbounded => Value::Null,
    }
}

fn describe(value: &Value) -> String {
    match value.as_list() {
        Some(values) => format!("a list of {} values", values.len()),
        None => value.type_name().to_string(),
    }
}
