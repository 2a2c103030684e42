use super::{Type, Value};
use crate::{Error, Result};

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use rust_decimal::{prelude::ToPrimitive, Decimal};
use std::str::FromStr;
use tracing::warn;
use uuid::Uuid;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
pub(crate) const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";
const DATE_TIME_READ_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Conversion between application values and the representation a backend
/// stores.
///
/// Every backend has its own matrix. The provided methods are the shared
/// fallback; a backend overrides only the conversions it disagrees with.
pub trait Coercion {
    /// Converts an application value into the backend's representation.
    fn to_backend(&self, value: Value) -> Value {
        to_backend(value)
    }

    /// Converts a backend value into the representation of `ty`.
    ///
    /// Null is always passed through; mapping it to a zero value is the
    /// caller's decision.
    fn from_backend(&self, value: Value, ty: &Type) -> Result<Value> {
        from_backend(value, ty)
    }
}

/// The shared matrix with no overrides.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultCoercion;

impl Coercion for DefaultCoercion {}

/// Shared `to_backend` conversion: identifiers and values with no portable
/// native representation are encoded as canonical strings.
pub fn to_backend(value: Value) -> Value {
    match value {
        Value::Uuid(v) => Value::String(v.hyphenated().to_string()),
        Value::Decimal(v) => Value::String(v.to_string()),
        Value::Date(v) => Value::String(v.format(DATE_FORMAT).to_string()),
        Value::DateTime(v) => Value::String(v.format(DATE_TIME_FORMAT).to_string()),
        Value::Timestamp(v) => Value::String(v.to_rfc3339_opts(SecondsFormat::Micros, true)),
        Value::List(items) => Value::List(items.into_iter().map(to_backend).collect()),
        value => value,
    }
}

/// Shared `from_backend` conversion.
pub fn from_backend(value: Value, ty: &Type) -> Result<Value> {
    if value.is_null() {
        return Ok(Value::Null);
    }

    match ty {
        Type::Bool => to_bool(value).map(Value::Bool),
        ty if ty.is_integer() => to_integer(value, ty),
        Type::F32 | Type::F64 => to_float(value, ty).map(Value::F64),
        Type::Char => to_char(value, ty),
        Type::String => to_string(value, ty).map(Value::String),
        Type::Uuid => to_uuid(value, ty).map(Value::Uuid),
        Type::Decimal => to_decimal(value, ty).map(Value::Decimal),
        Type::Date => to_date(value, ty).map(Value::Date),
        Type::DateTime => to_date_time(value, ty).map(Value::DateTime),
        Type::Timestamp => to_timestamp(value, ty).map(Value::Timestamp),
        Type::Bytes | Type::Blob => to_bytes(value, ty).map(Value::Bytes),
        _ => Err(Error::type_conversion(value, ty)),
    }
}

/// Parses text as a number, choosing float or integer by the presence of a
/// decimal point or exponent marker.
///
/// Unparseable text yields zero and logs a warning: stored data that
/// drifted from the declared type degrades instead of failing the read.
pub fn parse_lenient_number(text: &str) -> Value {
    let text = text.trim();

    if text.contains(['.', 'e', 'E']) {
        match text.parse::<f64>() {
            Ok(v) => Value::F64(v),
            Err(_) => {
                warn!(value = text, "unparseable numeric value; reading as 0");
                Value::F64(0.0)
            }
        }
    } else {
        match text.parse::<i64>() {
            Ok(v) => Value::I64(v),
            Err(_) => {
                warn!(value = text, "unparseable numeric value; reading as 0");
                Value::I64(0)
            }
        }
    }
}

fn to_bool(value: Value) -> Result<bool> {
    Ok(match value {
        Value::Bool(v) => v,
        Value::I64(v) => v != 0,
        Value::F64(v) => v != 0.0,
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.eq_ignore_ascii_case("true") {
                true
            } else if trimmed.eq_ignore_ascii_case("false") {
                false
            } else {
                match parse_lenient_number(trimmed) {
                    Value::I64(v) => v != 0,
                    Value::F64(v) => v != 0.0,
                    _ => false,
                }
            }
        }
        value => return Err(Error::type_conversion(value, &Type::Bool)),
    })
}

fn to_integer(value: Value, ty: &Type) -> Result<Value> {
    let n = match value {
        Value::I64(v) => v,
        Value::F64(v) => v as i64,
        Value::Bool(v) => i64::from(v),
        Value::Decimal(v) => match v.trunc().to_i64() {
            Some(n) => n,
            None => return Err(Error::type_conversion(Value::Decimal(v), ty)),
        },
        Value::String(ref text) => match parse_lenient_number(text) {
            Value::I64(v) => v,
            Value::F64(v) => v as i64,
            _ => 0,
        },
        value => return Err(Error::type_conversion(value, ty)),
    };

    match ty.integer_range() {
        Some((min, max)) if n < min || n > max => Err(Error::type_conversion(Value::I64(n), ty)),
        _ => Ok(Value::I64(n)),
    }
}

fn to_float(value: Value, ty: &Type) -> Result<f64> {
    Ok(match value {
        Value::F64(v) => v,
        Value::I64(v) => v as f64,
        Value::Bool(v) => f64::from(u8::from(v)),
        Value::Decimal(v) => v.to_f64().unwrap_or_default(),
        Value::String(text) => match parse_lenient_number(&text) {
            Value::I64(v) => v as f64,
            Value::F64(v) => v,
            _ => 0.0,
        },
        value => return Err(Error::type_conversion(value, ty)),
    })
}

fn to_char(value: Value, ty: &Type) -> Result<Value> {
    let text = to_string(value, ty)?;
    Ok(Value::String(text.chars().next().unwrap_or('\0').to_string()))
}

fn to_string(value: Value, ty: &Type) -> Result<String> {
    Ok(match value {
        Value::String(v) => v,
        Value::Bool(v) => v.to_string(),
        Value::I64(v) => v.to_string(),
        Value::F64(v) => v.to_string(),
        Value::Uuid(v) => v.hyphenated().to_string(),
        Value::Decimal(v) => v.to_string(),
        Value::Date(v) => v.format(DATE_FORMAT).to_string(),
        Value::DateTime(v) => v.format(DATE_TIME_FORMAT).to_string(),
        Value::Timestamp(v) => v.to_rfc3339_opts(SecondsFormat::Micros, true),
        Value::Bytes(bytes) => match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => return Err(Error::type_conversion(Value::Bytes(err.into_bytes()), ty)),
        },
        value => return Err(Error::type_conversion(value, ty)),
    })
}

fn to_uuid(value: Value, ty: &Type) -> Result<Uuid> {
    match value {
        Value::Uuid(v) => Ok(v),
        Value::String(ref text) => {
            Uuid::parse_str(text.trim()).map_err(|_| Error::type_conversion(value.clone(), ty))
        }
        Value::Bytes(ref bytes) => {
            Uuid::from_slice(bytes).map_err(|_| Error::type_conversion(value.clone(), ty))
        }
        value => Err(Error::type_conversion(value, ty)),
    }
}

fn to_decimal(value: Value, ty: &Type) -> Result<Decimal> {
    match value {
        Value::Decimal(v) => Ok(v),
        Value::I64(v) => Ok(Decimal::from(v)),
        Value::F64(v) => Decimal::try_from(v).map_err(|_| Error::type_conversion(value, ty)),
        Value::String(text) => {
            let trimmed = text.trim();
            match Decimal::from_str(trimmed).or_else(|_| Decimal::from_scientific(trimmed)) {
                Ok(v) => Ok(v),
                Err(_) => {
                    warn!(value = trimmed, "unparseable decimal value; reading as 0");
                    Ok(Decimal::ZERO)
                }
            }
        }
        value => Err(Error::type_conversion(value, ty)),
    }
}

fn to_date(value: Value, ty: &Type) -> Result<NaiveDate> {
    match value {
        Value::Date(v) => Ok(v),
        Value::DateTime(v) => Ok(v.date()),
        Value::Timestamp(v) => Ok(v.date_naive()),
        Value::String(ref text) => {
            let text = text.trim();
            let date = text.get(..10).unwrap_or(text);
            NaiveDate::parse_from_str(date, DATE_FORMAT)
                .map_err(|_| Error::type_conversion(value.clone(), ty))
        }
        value => Err(Error::type_conversion(value, ty)),
    }
}

fn to_date_time(value: Value, ty: &Type) -> Result<NaiveDateTime> {
    match value {
        Value::DateTime(v) => Ok(v),
        Value::Timestamp(v) => Ok(v.naive_utc()),
        Value::Date(v) => v
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| Error::type_conversion(Value::Date(v), ty)),
        Value::I64(millis) => DateTime::<Utc>::from_timestamp_millis(millis)
            .map(|v| v.naive_utc())
            .ok_or_else(|| Error::type_conversion(Value::I64(millis), ty)),
        Value::String(ref text) => {
            parse_date_time(text.trim()).ok_or_else(|| Error::type_conversion(value.clone(), ty))
        }
        value => Err(Error::type_conversion(value, ty)),
    }
}

fn to_timestamp(value: Value, ty: &Type) -> Result<DateTime<Utc>> {
    match value {
        Value::Timestamp(v) => Ok(v),
        Value::DateTime(v) => Ok(v.and_utc()),
        Value::I64(millis) => DateTime::<Utc>::from_timestamp_millis(millis)
            .ok_or_else(|| Error::type_conversion(Value::I64(millis), ty)),
        Value::String(ref text) => parse_date_time(text.trim())
            .map(|v| v.and_utc())
            .ok_or_else(|| Error::type_conversion(value.clone(), ty)),
        value => Err(Error::type_conversion(value, ty)),
    }
}

fn parse_date_time(text: &str) -> Option<NaiveDateTime> {
    if let Ok(v) = DateTime::parse_from_rfc3339(text) {
        return Some(v.naive_utc());
    }

    DATE_TIME_READ_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}

fn to_bytes(value: Value, ty: &Type) -> Result<Vec<u8>> {
    match value {
        Value::Bytes(v) => Ok(v),
        Value::String(v) => Ok(v.into_bytes()),
        Value::List(ref items) => items
            .iter()
            .map(|item| match item {
                Value::I64(n) => u8::try_from(*n).ok(),
                _ => None,
            })
            .collect::<Option<Vec<u8>>>()
            .ok_or_else(|| Error::type_conversion(value.clone(), ty)),
        value => Err(Error::type_conversion(value, ty)),
    }
}
