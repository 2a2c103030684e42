use super::Capability;
use crate::{stmt::Value, Result};

/// A connection to a SQL backend.
///
/// Parameters arrive already converted by the dialect's coercion matrix.
/// Every method blocks; implementations wrap their library errors with
/// [`Error::backend_execution_failure`](crate::Error::backend_execution_failure).
pub trait SqlDriver: core::fmt::Debug + Send + Sync + 'static {
    fn capability(&self) -> &'static Capability;

    /// Executes a statement without parameters. Returns true when the
    /// statement produced rows.
    fn execute(&self, sql: &str) -> Result<bool>;

    /// Executes a parameterized statement and returns the affected row
    /// count.
    fn execute_update(&self, sql: &str, params: &[Value]) -> Result<u64>;

    /// Executes one statement once per parameter list and returns the total
    /// affected row count.
    fn execute_batch(&self, sql: &str, batch: &[Vec<Value>]) -> Result<u64>;

    /// Runs a query and returns every row.
    fn query(&self, sql: &str, params: &[Value]) -> Result<Rows>;

    fn begin(&self) -> Result<()>;

    fn commit(&self) -> Result<()>;

    fn rollback(&self) -> Result<()>;
}

/// Rows returned by a query, with their column labels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rows {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Rows {
    /// Position of a column label, ignoring case.
    pub fn position(&self, column: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|label| label.eq_ignore_ascii_case(column))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A live column found by schema introspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
}

/// A live index found by schema introspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexInfo {
    pub name: String,
}
