//! The inline filter/order grammar and the shared WHERE-clause compiler.

use crate::entity::{Descriptor, Entity};
use crate::value::Value;

use super::errors::BuildError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operator {
    LessThan,
    LessOrEqual,
    Equal,
    GreaterOrEqual,
    GreaterThan,
}

impl Operator {
    pub(crate) fn as_cql(self) -> &'static str {
        match self {
            Operator::LessThan => "<",
            Operator::LessOrEqual => "<=",
            Operator::Equal => "=",
            Operator::GreaterOrEqual => ">=",
            Operator::GreaterThan => ">",
        }
    }
}

/// A conditional filter on query results.
#[derive(Debug, Clone)]
pub(crate) struct Filter {
    pub(crate) field: String,
    pub(crate) op: Operator,
    pub(crate) value: Value,
}

/// Parse a `"field op"` expression: the field name is the expression with
/// trailing operator characters stripped, and the remainder must be one of
/// the five comparison tokens.
pub(crate) fn parse_filter(expr: &str, value: Value) -> Result<Filter, BuildError> {
    let expr = expr.trim();
    if expr.is_empty() {
        return Err(BuildError::InvalidFilter(expr.to_owned()));
    }
    let field = expr.trim_end_matches([' ', '>', '<', '=', '!']);
    let op = match expr[field.len()..].trim() {
        "<=" => Operator::LessOrEqual,
        ">=" => Operator::GreaterOrEqual,
        "<" => Operator::LessThan,
        ">" => Operator::GreaterThan,
        "=" => Operator::Equal,
        other => {
            return Err(BuildError::InvalidOperator {
                operator: other.to_owned(),
                filter: expr.to_owned(),
            })
        }
    };
    Ok(Filter {
        field: field.to_owned(),
        op,
        value,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Ascending,
    Descending,
}

/// A sort order on query results. Recorded by the builder but not rendered
/// into statements.
#[derive(Debug, Clone)]
#[allow(dead_code)] // read once ORDER BY rendering lands
pub(crate) struct Order {
    pub(crate) field: String,
    pub(crate) direction: Direction,
}

/// Parse an order expression: a leading `-` sorts descending; a leading `+`
/// is rejected as invalid syntax.
pub(crate) fn parse_order(raw: &str) -> Result<Order, BuildError> {
    let raw = raw.trim();
    let (field, direction) = if let Some(rest) = raw.strip_prefix('-') {
        (rest.trim(), Direction::Descending)
    } else if raw.starts_with('+') {
        return Err(BuildError::InvalidOrder(raw.to_owned()));
    } else {
        (raw, Direction::Ascending)
    };
    if field.is_empty() {
        return Err(BuildError::EmptyOrder);
    }
    Ok(Order {
        field: field.to_owned(),
        direction,
    })
}

/// Compile filters into a ` WHERE ...` clause and its argument vector, in
/// filter order. Both builders compile their WHERE clause here.
pub(crate) fn where_clause<T: Entity>(
    codec: &Descriptor<T>,
    filters: &[Filter],
) -> Result<(String, Vec<Value>), BuildError> {
    if filters.is_empty() {
        return Ok((String::new(), Vec::new()));
    }
    let mut conditions = Vec::with_capacity(filters.len());
    let mut args = Vec::with_capacity(filters.len());
    for filter in filters {
        if !codec.contains(&filter.field) {
            return Err(BuildError::UnknownField(filter.field.clone()));
        }
        conditions.push(format!("{} {} ?", filter.field, filter.op.as_cql()));
        args.push(filter.value.clone());
    }
    Ok((format!(" WHERE {}", conditions.join(" AND ")), args))
}
