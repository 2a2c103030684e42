use super::Combine;
use crate::{
    driver::Document,
    stmt::{self, Operator, Type, Value},
    Error, Result,
};

use std::cmp::Ordering;

/// Predicate evaluated in process, for stores that have no query language.
///
/// Built with the same rules as SQL predicates, so null handling, `IN`
/// degradation and OR-absorption behave identically on every backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Compare {
        column: String,
        op: Operator,
        value: Value,

        /// Declared type of the column. Both operands are read as this type
        /// before comparing.
        ty: Option<Type>,
    },
    IsNull(String),
    IsNotNull(String),
    In {
        column: String,
        values: Vec<Value>,
        ty: Option<Type>,
    },

    /// Matches nothing. Produced by `IN` with an empty list.
    False,

    Or(Box<Filter>, Box<Filter>),
}

impl Filter {
    /// Builds a filter for `column op value`. `value` must already be in
    /// the store's representation.
    pub fn build(column: &str, op: Operator, value: Value) -> Result<Filter> {
        Filter::typed(column.to_string(), None, op, value)
    }

    /// Like [`build`](Self::build) for a column declared as `ty`. Stored
    /// text such as a decimal then compares by its typed value rather than
    /// as a string.
    pub fn build_field(column: &str, ty: Type, op: Operator, value: Value) -> Result<Filter> {
        Filter::typed(column.to_string(), Some(ty), op, value)
    }

    fn typed(column: String, ty: Option<Type>, op: Operator, value: Value) -> Result<Filter> {
        match (op, value) {
            (Operator::In, Value::List(mut values)) => Ok(match values.len() {
                0 => Filter::False,
                1 => Filter::typed(column, ty, Operator::Equal, values.remove(0))?,
                _ => Filter::In {
                    column,
                    values: values.into_iter().map(|value| read_as(value, ty)).collect(),
                    ty,
                },
            }),
            (Operator::In, _) => Err(Error::unsupported_predicate(column, op)),
            (Operator::Equal, Value::Null) => Ok(Filter::IsNull(column)),
            (Operator::NotEqual, Value::Null) => Ok(Filter::IsNotNull(column)),
            (op, Value::Null) => Err(Error::unsupported_predicate(column, op)),
            (op, value) => Ok(Filter::Compare {
                column,
                op,
                value: read_as(value, ty),
                ty,
            }),
        }
    }

    /// Evaluates the filter against one document. A missing key reads as
    /// null, and null never satisfies a comparison.
    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Filter::Compare {
                column,
                op,
                value,
                ty,
            } => match lookup(document, column) {
                Value::Null => false,
                stored => compare(&read_as(stored.clone(), *ty), *op, value),
            },
            Filter::IsNull(column) => lookup(document, column).is_null(),
            Filter::IsNotNull(column) => !lookup(document, column).is_null(),
            Filter::In { column, values, ty } => {
                let stored = lookup(document, column);
                if stored.is_null() {
                    return false;
                }
                let stored = read_as(stored.clone(), *ty);
                values
                    .iter()
                    .any(|value| compare(&stored, Operator::Equal, value))
            }
            Filter::False => false,
            Filter::Or(lhs, rhs) => lhs.matches(document) || rhs.matches(document),
        }
    }
}

impl Combine for Filter {
    fn or(self, other: Self) -> Self {
        Filter::Or(Box::new(self), Box::new(other))
    }
}

static NULL: Value = Value::Null;

/// Reads `value` as `ty`, leaving it untouched when it does not convert.
fn read_as(value: Value, ty: Option<Type>) -> Value {
    match ty {
        Some(ty) => stmt::from_backend(value.clone(), &ty).unwrap_or(value),
        None => value,
    }
}

fn lookup<'a>(document: &'a Document, column: &str) -> &'a Value {
    document
        .get(column)
        .or_else(|| {
            document
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(column))
                .map(|(_, value)| value)
        })
        .unwrap_or(&NULL)
}

fn compare(stored: &Value, op: Operator, value: &Value) -> bool {
    let ordering = stored.partial_cmp_value(value);

    match op {
        Operator::Equal => ordering == Some(Ordering::Equal),
        Operator::NotEqual => !value.is_null() && ordering != Some(Ordering::Equal),
        Operator::GreaterThan => ordering == Some(Ordering::Greater),
        Operator::LessThan => ordering == Some(Ordering::Less),
        Operator::GreaterThanOrEqual => {
            matches!(ordering, Some(Ordering::Greater | Ordering::Equal))
        }
        Operator::LessThanOrEqual => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
        Operator::In => false,
    }
}
