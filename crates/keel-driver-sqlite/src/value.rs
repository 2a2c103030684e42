use keel_core::stmt::Value as CoreValue;
use rusqlite::{
    types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef},
    Row,
};

/// Binds a core value as a SQLite parameter.
///
/// Values reach the driver already coerced by the dialect, so only the
/// storage classes SQLite knows about appear here.
#[derive(Debug)]
pub(crate) struct Value<'a>(pub(crate) &'a CoreValue);

impl Value<'_> {
    /// Reads column `index` of `row` in its storage class.
    pub(crate) fn from_sql(row: &Row<'_>, index: usize) -> rusqlite::Result<CoreValue> {
        Ok(match row.get_ref(index)? {
            ValueRef::Null => CoreValue::Null,
            ValueRef::Integer(value) => CoreValue::I64(value),
            ValueRef::Real(value) => CoreValue::F64(value),
            ValueRef::Text(value) => CoreValue::String(String::from_utf8_lossy(value).into_owned()),
            ValueRef::Blob(value) => CoreValue::Bytes(value.to_vec()),
        })
    }
}

impl ToSql for Value<'_> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self.0 {
            CoreValue::Null => Ok(ToSqlOutput::Owned(SqlValue::Null)),
            CoreValue::Bool(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v as i64))),
            CoreValue::I64(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v))),
            CoreValue::F64(v) => Ok(ToSqlOutput::Owned(SqlValue::Real(*v))),
            CoreValue::String(v) => Ok(ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes()))),
            CoreValue::Bytes(v) => Ok(ToSqlOutput::Borrowed(ValueRef::Blob(&v[..]))),
            value => Err(rusqlite::Error::ToSqlConversionFailure(
                format!("{} values must be coerced before binding", value.kind_name()).into(),
            )),
        }
    }
}
