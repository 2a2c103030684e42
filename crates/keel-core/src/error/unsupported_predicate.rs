use super::Error;
use crate::stmt::Operator;

/// Error when a predicate cannot be built, e.g. an ordering comparison
/// against NULL.
#[derive(Debug)]
pub(super) struct UnsupportedPredicate {
    column: Box<str>,
    operator: Operator,
}

impl std::error::Error for UnsupportedPredicate {}

impl core::fmt::Display for UnsupportedPredicate {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self.operator {
            Operator::In => write!(
                f,
                "unsupported predicate: `{} IN` requires a list operand",
                self.column
            ),
            op => write!(
                f,
                "unsupported predicate: `{} {} NULL` has no defined result",
                self.column,
                op.symbol()
            ),
        }
    }
}

impl Error {
    pub fn unsupported_predicate(column: impl Into<String>, operator: Operator) -> Error {
        Error::from(super::ErrorKind::UnsupportedPredicate(UnsupportedPredicate {
            column: column.into().into(),
            operator,
        }))
    }

    pub fn is_unsupported_predicate(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnsupportedPredicate(_))
    }
}
