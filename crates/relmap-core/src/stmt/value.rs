use super::Type;
use crate::{Error, Result};

use chrono::{DateTime, NaiveDateTime};

/// Formats accepted when coercing a string to [`Value::Timestamp`].
const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    /// Null value
    #[default]
    Null,

    /// Boolean value
    Bool(bool),

    /// Signed 32-bit integer
    I32(i32),

    /// Signed 64-bit integer
    I64(i64),

    /// 64-bit floating point
    F64(f64),

    /// String value
    String(String),

    /// Binary data
    Bytes(Vec<u8>),

    /// Date-time without a timezone
    Timestamp(NaiveDateTime),
}

impl Value {
    /// Returns a `Value` representing null
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the value as a positive row identifier, if it is one.
    ///
    /// Null, non-numeric, zero, and negative values all return `None`; they
    /// signal "no relation" or an outer-join miss rather than an error.
    pub fn as_positive_id(&self) -> Option<i64> {
        match *self {
            Self::I32(v) if v > 0 => Some(i64::from(v)),
            Self::I64(v) if v > 0 => Some(v),
            _ => None,
        }
    }

    pub fn to_bool(self) -> Result<bool> {
        match self {
            Self::Bool(v) => Ok(v),
            value => Err(Error::type_conversion(value, Type::Bool)),
        }
    }

    pub fn to_i32(self) -> Result<i32> {
        match self {
            Self::I32(v) => Ok(v),
            value => Err(Error::type_conversion(value, Type::I32)),
        }
    }

    pub fn to_i64(self) -> Result<i64> {
        match self {
            Self::I64(v) => Ok(v),
            value => Err(Error::type_conversion(value, Type::I64)),
        }
    }

    pub fn to_string(self) -> Result<String> {
        match self {
            Self::String(v) => Ok(v),
            value => Err(Error::type_conversion(value, Type::String)),
        }
    }

    pub fn to_option_i32(self) -> Result<Option<i32>> {
        match self {
            Self::Null => Ok(None),
            value => value.to_i32().map(Some),
        }
    }

    pub fn to_option_i64(self) -> Result<Option<i64>> {
        match self {
            Self::Null => Ok(None),
            value => value.to_i64().map(Some),
        }
    }

    pub fn to_option_string(self) -> Result<Option<String>> {
        match self {
            Self::Null => Ok(None),
            value => value.to_string().map(Some),
        }
    }

    pub fn to_option_timestamp(self) -> Result<Option<NaiveDateTime>> {
        match self {
            Self::Null => Ok(None),
            value => value.to_timestamp().map(Some),
        }
    }

    pub fn to_timestamp(self) -> Result<NaiveDateTime> {
        match self {
            Self::Timestamp(v) => Ok(v),
            value => Err(Error::type_conversion(value, Type::Timestamp)),
        }
    }

    /// Returns the type this value would map to, or `None` for null.
    pub fn infer_ty(&self) -> Option<Type> {
        match self {
            Self::Null => None,
            Self::Bool(_) => Some(Type::Bool),
            Self::I32(_) => Some(Type::I32),
            Self::I64(_) => Some(Type::I64),
            Self::F64(_) => Some(Type::F64),
            Self::String(_) => Some(Type::String),
            Self::Bytes(_) => Some(Type::Bytes),
            Self::Timestamp(_) => Some(Type::Timestamp),
        }
    }

    /// Converts this value to the given target type.
    ///
    /// Null passes through unchanged for every target. Numeric values widen
    /// freely and narrow when the value fits; strings and integer unix
    /// seconds coerce to timestamps. Anything else is a type conversion
    /// error naming the value and target.
    pub fn coerce(self, ty: Type) -> Result<Value> {
        if self.is_null() {
            return Ok(Value::Null);
        }

        match (ty, self) {
            (Type::Bool, Value::Bool(v)) => Ok(Value::Bool(v)),
            (Type::Bool, Value::I32(v)) => Ok(Value::Bool(v != 0)),
            (Type::Bool, Value::I64(v)) => Ok(Value::Bool(v != 0)),

            (Type::I32, Value::I32(v)) => Ok(Value::I32(v)),
            (Type::I32, Value::I64(v)) => match i32::try_from(v) {
                Ok(v) => Ok(Value::I32(v)),
                Err(_) => Err(Error::type_conversion(Value::I64(v), Type::I32)),
            },
            (Type::I32, Value::Bool(v)) => Ok(Value::I32(v as i32)),

            (Type::I64, Value::I64(v)) => Ok(Value::I64(v)),
            (Type::I64, Value::I32(v)) => Ok(Value::I64(i64::from(v))),

            (Type::F64, Value::F64(v)) => Ok(Value::F64(v)),
            (Type::F64, Value::I32(v)) => Ok(Value::F64(f64::from(v))),
            (Type::F64, Value::I64(v)) => Ok(Value::F64(v as f64)),

            (Type::String, Value::String(v)) => Ok(Value::String(v)),

            (Type::Bytes, Value::Bytes(v)) => Ok(Value::Bytes(v)),

            (Type::Timestamp, Value::Timestamp(v)) => Ok(Value::Timestamp(v)),
            (Type::Timestamp, Value::String(v)) => parse_timestamp(&v)
                .ok_or_else(|| Error::type_conversion(Value::String(v), Type::Timestamp)),
            (Type::Timestamp, Value::I64(v)) => match DateTime::from_timestamp(v, 0) {
                Some(dt) => Ok(Value::Timestamp(dt.naive_utc())),
                None => Err(Error::type_conversion(Value::I64(v), Type::Timestamp)),
            },

            (ty, value) => Err(Error::type_conversion(value, ty)),
        }
    }
}

fn parse_timestamp(src: &str) -> Option<Value> {
    for format in TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(src, format) {
            return Some(Value::Timestamp(dt));
        }
    }

    // Date-only strings carry no time component and need a separate parse.
    if let Ok(date) = chrono::NaiveDate::parse_from_str(src, "%Y-%m-%d") {
        return Some(Value::Timestamp(date.and_hms_opt(0, 0, 0)?));
    }

    None
}

impl From<bool> for Value {
    fn from(src: bool) -> Self {
        Self::Bool(src)
    }
}

impl From<i32> for Value {
    fn from(src: i32) -> Self {
        Self::I32(src)
    }
}

impl From<i64> for Value {
    fn from(src: i64) -> Self {
        Self::I64(src)
    }
}

impl From<f64> for Value {
    fn from(src: f64) -> Self {
        Self::F64(src)
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Self {
        Self::String(src.to_string())
    }
}

impl From<String> for Value {
    fn from(src: String) -> Self {
        Self::String(src)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(src: NaiveDateTime) -> Self {
        Self::Timestamp(src)
    }
}

impl<T> From<Option<T>> for Value
where
    Value: From<T>,
{
    fn from(src: Option<T>) -> Self {
        match src {
            Some(value) => value.into(),
            None => Self::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_passes_through_any_target() {
        for ty in [Type::Bool, Type::I32, Type::I64, Type::String, Type::Timestamp] {
            assert_eq!(Value::Null.coerce(ty).unwrap(), Value::Null);
        }
    }

    #[test]
    fn numeric_widening_and_narrowing() {
        assert_eq!(Value::I32(7).coerce(Type::I64).unwrap(), Value::I64(7));
        assert_eq!(Value::I64(7).coerce(Type::I32).unwrap(), Value::I32(7));
        assert_eq!(Value::I64(3).coerce(Type::F64).unwrap(), Value::F64(3.0));

        let err = Value::I64(i64::MAX).coerce(Type::I32).unwrap_err();
        assert!(err.is_type_conversion());
    }

    #[test]
    fn string_to_timestamp() {
        let coerced = Value::from("2024-03-01 10:30:00").coerce(Type::Timestamp).unwrap();
        let Value::Timestamp(dt) = coerced else {
            panic!("expected timestamp, got {coerced:?}")
        };
        assert_eq!(dt.to_string(), "2024-03-01 10:30:00");

        let err = Value::from("not a time").coerce(Type::Timestamp).unwrap_err();
        assert!(err.is_type_conversion());
    }

    #[test]
    fn positive_id_extraction() {
        assert_eq!(Value::I64(3).as_positive_id(), Some(3));
        assert_eq!(Value::I32(3).as_positive_id(), Some(3));
        assert_eq!(Value::I64(0).as_positive_id(), None);
        assert_eq!(Value::I64(-1).as_positive_id(), None);
        assert_eq!(Value::Null.as_positive_id(), None);
        assert_eq!(Value::from("3").as_positive_id(), None);
    }
}
