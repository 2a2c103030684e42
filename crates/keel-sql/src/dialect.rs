use crate::{stmt::Filter, ColumnType, SqlFragment, Statement};

use keel_core::{
    schema::{FieldMetadata, IndexMetadata},
    stmt::{self, Coercion, Operator, Type, Value},
    EntityMetadata, Result,
};

use chrono::{DateTime, NaiveDateTime, Utc};

const MYSQL_DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// The SQL family a statement is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flavor {
    Sqlite,
    Mysql,
    Postgresql,
}

/// Renders statements, predicates and introspection queries for one flavor,
/// and owns that flavor's coercion matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    flavor: Flavor,
}

impl Dialect {
    pub const fn new(flavor: Flavor) -> Self {
        Self { flavor }
    }

    pub const fn sqlite() -> Self {
        Self::new(Flavor::Sqlite)
    }

    pub const fn mysql() -> Self {
        Self::new(Flavor::Mysql)
    }

    pub const fn postgresql() -> Self {
        Self::new(Flavor::Postgresql)
    }

    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    /// Quotes a table, column or index name. Embedded quote characters are
    /// doubled.
    pub fn quote_identifier(&self, name: &str) -> String {
        let quote = match self.flavor {
            Flavor::Mysql => '`',
            Flavor::Sqlite | Flavor::Postgresql => '"',
        };

        let mut ret = String::with_capacity(name.len() + 2);
        ret.push(quote);
        for ch in name.chars() {
            if ch == quote {
                ret.push(quote);
            }
            ret.push(ch);
        }
        ret.push(quote);
        ret
    }

    pub fn column_type_name(&self, ty: ColumnType) -> &'static str {
        ty.name(self.flavor)
    }

    pub fn limit_clause(&self, n: usize) -> String {
        format!(" LIMIT {n}")
    }

    pub fn create_table<E>(&self, metadata: &EntityMetadata<E>) -> String {
        self.render(&Statement::create_table(metadata))
    }

    pub fn drop_table<E>(&self, metadata: &EntityMetadata<E>) -> String {
        self.render(&Statement::drop_table(metadata))
    }

    pub fn upsert<E>(&self, metadata: &EntityMetadata<E>) -> String {
        self.render(&Statement::upsert(metadata))
    }

    pub fn add_column<E>(&self, metadata: &EntityMetadata<E>, field: &FieldMetadata<E>) -> String {
        self.render(&Statement::add_column(metadata, field))
    }

    pub fn create_index<E>(&self, metadata: &EntityMetadata<E>, index: &IndexMetadata) -> String {
        self.render(&Statement::create_index(metadata, index))
    }

    pub fn drop_index<E>(&self, metadata: &EntityMetadata<E>, name: &str) -> String {
        self.render(&Statement::drop_index(metadata, name))
    }

    /// SELECT over every column with the given conditions. Bound parameters
    /// are appended to `params`.
    pub fn select<E>(
        &self,
        metadata: &EntityMetadata<E>,
        filter: Filter,
        limit: Option<usize>,
        params: &mut Vec<Value>,
    ) -> String {
        self.serialize(&Statement::select(metadata, filter, limit), params)
    }

    pub fn count<E>(
        &self,
        metadata: &EntityMetadata<E>,
        filter: Filter,
        params: &mut Vec<Value>,
    ) -> String {
        self.serialize(&Statement::count(metadata, filter), params)
    }

    pub fn delete<E>(
        &self,
        metadata: &EntityMetadata<E>,
        filter: Filter,
        params: &mut Vec<Value>,
    ) -> String {
        self.serialize(&Statement::delete(metadata, filter), params)
    }

    /// Builds the fragment for `column op value`.
    ///
    /// `value` is an application value; it is coerced here, so the fragment's
    /// parameters are ready to bind.
    pub fn build_predicate(&self, column: &str, op: Operator, value: Value) -> Result<SqlFragment> {
        self.predicate(column, None, op, value)
    }

    /// Builds the fragment for `column op value` against a column declared
    /// as `ty`.
    ///
    /// SQLite keeps decimals as text, so comparisons on a decimal column are
    /// made on `CAST(.. AS NUMERIC)` of both operands.
    pub fn build_field_predicate(
        &self,
        column: &str,
        ty: &Type,
        op: Operator,
        value: Value,
    ) -> Result<SqlFragment> {
        self.predicate(column, Some(ty), op, value)
    }

    fn predicate(
        &self,
        column: &str,
        ty: Option<&Type>,
        op: Operator,
        value: Value,
    ) -> Result<SqlFragment> {
        let value = self.to_backend(value);
        let numeric = self.flavor == Flavor::Sqlite && ty == Some(&Type::Decimal);

        match (op, value) {
            (Operator::In, Value::List(mut values)) => match values.len() {
                0 => Ok(SqlFragment::always_false()),
                1 => self.compare(column, numeric, Operator::Equal, values.remove(0)),
                _ => {
                    let placeholder = if numeric { "CAST(? AS NUMERIC)" } else { "?" };
                    let placeholders = vec![placeholder; values.len()].join(", ");
                    Ok(SqlFragment::new(
                        format!("{} IN ({placeholders})", self.operand(column, numeric)),
                        values,
                    ))
                }
            },
            (Operator::In, _) => Err(keel_core::Error::unsupported_predicate(column, op)),
            (op, value) => self.compare(column, numeric, op, value),
        }
    }

    fn compare(&self, column: &str, numeric: bool, op: Operator, value: Value) -> Result<SqlFragment> {
        let quoted = self.quote_identifier(column);

        match (op, value) {
            (Operator::Equal, Value::Null) => Ok(SqlFragment::new(format!("{quoted} IS NULL"), vec![])),
            (Operator::NotEqual, Value::Null) => {
                Ok(SqlFragment::new(format!("{quoted} IS NOT NULL"), vec![]))
            }
            (op, Value::Null) => Err(keel_core::Error::unsupported_predicate(column, op)),
            (op, value) if numeric => Ok(SqlFragment::new(
                format!("{} {} CAST(? AS NUMERIC)", self.operand(column, true), op.symbol()),
                vec![value],
            )),
            (op, value) => Ok(SqlFragment::new(
                format!("{quoted} {} ?", op.symbol()),
                vec![value],
            )),
        }
    }

    fn operand(&self, column: &str, numeric: bool) -> String {
        let quoted = self.quote_identifier(column);
        if numeric {
            format!("CAST({quoted} AS NUMERIC)")
        } else {
            quoted
        }
    }

    /// Query listing the live column names of `table`, as a `name` column.
    pub fn list_columns_query(&self, table: &str) -> (String, Vec<Value>) {
        match self.flavor {
            Flavor::Sqlite => (
                "SELECT name FROM pragma_table_info(?)".to_string(),
                vec![Value::from(table)],
            ),
            Flavor::Mysql => (
                "SELECT COLUMN_NAME AS name FROM INFORMATION_SCHEMA.COLUMNS \
                 WHERE TABLE_SCHEMA = DATABASE() AND LOWER(TABLE_NAME) = ?"
                    .to_string(),
                vec![Value::from(table.to_lowercase())],
            ),
            Flavor::Postgresql => (
                "SELECT column_name AS name FROM information_schema.columns \
                 WHERE table_schema = current_schema() AND table_name = $1"
                    .to_string(),
                vec![Value::from(table)],
            ),
        }
    }

    /// Query listing the live index names of `table`, as a `name` column.
    pub fn list_indexes_query(&self, table: &str) -> (String, Vec<Value>) {
        match self.flavor {
            Flavor::Sqlite => (
                "SELECT name FROM pragma_index_list(?)".to_string(),
                vec![Value::from(table)],
            ),
            Flavor::Mysql => (
                "SELECT DISTINCT INDEX_NAME AS name FROM INFORMATION_SCHEMA.STATISTICS \
                 WHERE TABLE_SCHEMA = DATABASE() AND LOWER(TABLE_NAME) = ?"
                    .to_string(),
                vec![Value::from(table.to_lowercase())],
            ),
            Flavor::Postgresql => (
                "SELECT indexname AS name FROM pg_indexes \
                 WHERE schemaname = current_schema() AND tablename = $1"
                    .to_string(),
                vec![Value::from(table)],
            ),
        }
    }

    fn render(&self, stmt: &Statement) -> String {
        self.serialize(stmt, &mut vec![])
    }
}

impl Coercion for Dialect {
    fn to_backend(&self, value: Value) -> Value {
        match (self.flavor, value) {
            (_, Value::List(items)) => {
                Value::List(items.into_iter().map(|item| self.to_backend(item)).collect())
            }
            (Flavor::Sqlite | Flavor::Mysql, Value::Bool(v)) => Value::I64(v as i64),
            (Flavor::Mysql, Value::DateTime(v)) => Value::String(mysql_date_time(&v)),
            (Flavor::Mysql, Value::Timestamp(v)) => Value::String(mysql_timestamp(&v)),
            (_, value) => stmt::to_backend(value),
        }
    }
}

fn mysql_date_time(value: &NaiveDateTime) -> String {
    value.format(MYSQL_DATE_TIME_FORMAT).to_string()
}

fn mysql_timestamp(value: &DateTime<Utc>) -> String {
    mysql_date_time(&value.naive_utc())
}
