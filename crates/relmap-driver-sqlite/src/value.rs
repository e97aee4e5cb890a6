use relmap_core::stmt::Value as CoreValue;

use rusqlite::types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef};

/// Timestamps are stored as text in this format; reading them back yields a
/// string value that the demultiplexer coerces to a timestamp.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Newtype bridging core values and rusqlite's binding traits.
#[derive(Debug)]
pub(crate) struct Value(CoreValue);

impl From<CoreValue> for Value {
    fn from(value: CoreValue) -> Self {
        Self(value)
    }
}

impl Value {
    pub(crate) fn into_inner(self) -> CoreValue {
        self.0
    }

    /// Converts a SQLite storage value to a core value. SQLite is
    /// dynamically typed, so the mapping follows storage class; declared
    /// types are coerced downstream against the mapped property type.
    pub(crate) fn from_sql(value: SqlValue) -> Self {
        let core_value = match value {
            SqlValue::Null => CoreValue::Null,
            SqlValue::Integer(value) => CoreValue::I64(value),
            SqlValue::Real(value) => CoreValue::F64(value),
            SqlValue::Text(value) => CoreValue::String(value),
            SqlValue::Blob(value) => CoreValue::Bytes(value),
        };
        Value(core_value)
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match &self.0 {
            CoreValue::Null => Ok(ToSqlOutput::Owned(SqlValue::Null)),
            CoreValue::Bool(true) => Ok(ToSqlOutput::Owned(SqlValue::Integer(1))),
            CoreValue::Bool(false) => Ok(ToSqlOutput::Owned(SqlValue::Integer(0))),
            CoreValue::I32(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(i64::from(*v)))),
            CoreValue::I64(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v))),
            CoreValue::F64(v) => Ok(ToSqlOutput::Owned(SqlValue::Real(*v))),
            CoreValue::String(v) => Ok(ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes()))),
            CoreValue::Bytes(v) => Ok(ToSqlOutput::Borrowed(ValueRef::Blob(&v[..]))),
            CoreValue::Timestamp(v) => Ok(ToSqlOutput::Owned(SqlValue::Text(
                v.format(TIMESTAMP_FORMAT).to_string(),
            ))),
        }
    }
}
