//! Leaf clauses for query entries.
//!
//! One exhaustive match maps each operator to the clause it compiles to.
//! Text operators escape their value for the query-string syntax, except
//! EXPRESSION and REGEXP which are passed through verbatim.

use crate::criteria::{CriteriaEntry, Field, Operator, Value};
use crate::error::{CriteriaError, Result};
use crate::query::escape::{escape, or_query_string};
use crate::query::{
    BoolQuery, ExistsQuery, FuzzyQuery, MatchOperator, MatchQuery, Query, QueryStringQuery,
    RangeQuery, RegexpQuery, TermsQuery, WildcardQuery,
};

/// Build the leaf clause for a single query entry on `field`.
pub(crate) fn query_leaf(field: &Field, entry: &CriteriaEntry) -> Result<Query> {
    let name = field.name();
    let operator = entry.operator();

    let query = match operator {
        Operator::Equals => {
            let text = escape(&text_value(field, entry)?);
            QueryStringQuery::new(name, text)
                .with_default_operator(MatchOperator::And)
                .into()
        }
        Operator::Contains => {
            let text = escape(&text_value(field, entry)?);
            QueryStringQuery::new(name, format!("*{text}*"))
                .with_analyze_wildcard()
                .into()
        }
        Operator::StartsWith => {
            let text = escape(&text_value(field, entry)?);
            QueryStringQuery::new(name, format!("{text}*"))
                .with_analyze_wildcard()
                .into()
        }
        Operator::EndsWith => {
            let text = escape(&text_value(field, entry)?);
            QueryStringQuery::new(name, format!("*{text}"))
                .with_analyze_wildcard()
                .into()
        }
        Operator::Expression => QueryStringQuery::new(name, text_value(field, entry)?)
            .with_default_operator(MatchOperator::And)
            .into(),
        Operator::Less => RangeQuery::new(name).lt(scalar_value(field, entry)?).into(),
        Operator::LessEqual => RangeQuery::new(name).lte(scalar_value(field, entry)?).into(),
        Operator::Greater => RangeQuery::new(name).gt(scalar_value(field, entry)?).into(),
        Operator::GreaterEqual => RangeQuery::new(name).gte(scalar_value(field, entry)?).into(),
        Operator::Between => between_leaf(field, entry)?,
        Operator::Fuzzy => FuzzyQuery::new(name, text_value(field, entry)?).into(),
        Operator::Matches => {
            MatchQuery::new(name, text_value(field, entry)?, MatchOperator::Or).into()
        }
        Operator::MatchesAll => {
            MatchQuery::new(name, text_value(field, entry)?, MatchOperator::And).into()
        }
        Operator::In => in_leaf(field, entry, false)?,
        Operator::NotIn => in_leaf(field, entry, true)?,
        Operator::Regexp => RegexpQuery::new(name, text_value(field, entry)?).into(),
        Operator::Exists => {
            let present = match entry.value() {
                None => true,
                Some(value) => value.as_bool().ok_or_else(|| {
                    invalid(
                        field,
                        operator,
                        format!("expected a boolean flag, got {}", value.type_name()),
                    )
                })?,
            };
            let exists: Query = ExistsQuery::new(name).into();
            if present {
                exists
            } else {
                BoolQuery::new().must_not(exists).into()
            }
        }
        Operator::Empty => BoolQuery::new()
            .must(ExistsQuery::new(name).into())
            .must_not(WildcardQuery::new(name, "*").into())
            .into(),
        Operator::NotEmpty => WildcardQuery::new(name, "*").into(),
        Operator::Within | Operator::Bbox => {
            return Err(CriteriaError::unsupported(format!(
                "{operator} on field '{name}' is a filter operator and cannot be compiled into a query"
            )));
        }
    };

    Ok(query)
}

fn invalid<M: Into<String>>(field: &Field, operator: Operator, message: M) -> CriteriaError {
    CriteriaError::invalid_entry(field.name(), operator, message)
}

fn required_value<'a>(field: &Field, entry: &'a CriteriaEntry) -> Result<&'a Value> {
    entry
        .value()
        .ok_or_else(|| invalid(field, entry.operator(), "missing value"))
}

fn text_value(field: &Field, entry: &CriteriaEntry) -> Result<String> {
    let value = required_value(field, entry)?;
    value.as_text().ok_or_else(|| {
        invalid(
            field,
            entry.operator(),
            format!("expected a textual value, got {}", value.type_name()),
        )
    })
}

fn scalar_value(field: &Field, entry: &CriteriaEntry) -> Result<Value> {
    let value = required_value(field, entry)?;
    if value.as_text().is_none() {
        return Err(invalid(
            field,
            entry.operator(),
            format!("expected a scalar value, got {}", value.type_name()),
        ));
    }
    Ok(value.clone())
}

fn between_leaf(field: &Field, entry: &CriteriaEntry) -> Result<Query> {
    let value = required_value(field, entry)?;
    let (lower, upper) = match value.as_list() {
        Some([lower, upper]) => (lower, upper),
        _ => {
            return Err(invalid(
                field,
                Operator::Between,
                format!("expected a 2-element range, got {}", value.type_name()),
            ));
        }
    };

    for bound in [lower, upper] {
        if !bound.is_null() && bound.as_text().is_none() {
            return Err(invalid(
                field,
                Operator::Between,
                format!("range bounds must be scalars, got {}", bound.type_name()),
            ));
        }
    }
    if lower.is_null() && upper.is_null() {
        return Err(invalid(
            field,
            Operator::Between,
            "at least one range bound is required",
        ));
    }

    Ok(RangeQuery::new(field.name())
        .gte(lower.clone())
        .lte(upper.clone())
        .into())
}

fn in_leaf(field: &Field, entry: &CriteriaEntry, negated: bool) -> Result<Query> {
    let operator = entry.operator();
    let value = required_value(field, entry)?;
    let values = value.as_list().ok_or_else(|| {
        invalid(
            field,
            operator,
            format!("expected a list of values, got {}", value.type_name()),
        )
    })?;
    if values.is_empty() {
        return Err(invalid(field, operator, "expected at least one value"));
    }

    let texts = values
        .iter()
        .map(|v| {
            v.as_text().ok_or_else(|| {
                invalid(
                    field,
                    operator,
                    format!("list elements must be scalars, got {}", v.type_name()),
                )
            })
        })
        .collect::<Result<Vec<String>>>()?;

    if field.is_keyword() {
        let terms: Query = TermsQuery::new(field.name(), values.iter().cloned()).into();
        if negated {
            Ok(BoolQuery::new().must_not(terms).into())
        } else {
            Ok(terms)
        }
    } else {
        let joined = or_query_string(&texts);
        let text = if negated {
            format!("NOT({joined})")
        } else {
            joined
        };
        Ok(QueryStringQuery::new(field.name(), text).into())
    }
}
