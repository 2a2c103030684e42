use crate::{Error, Result};

use keel_core::stmt::{self, Type, Value};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// A Rust type that can be stored in a single column.
///
/// `load` accepts a value in any representation the shared coercion matrix
/// understands. A null loads as the type's zero value, except for
/// `Option<T>` where it loads as `None`.
pub trait Primitive: Sized {
    /// Declared type used for column mapping and coercion.
    const TYPE: Type;

    fn to_value(&self) -> Value;

    fn load(value: Value) -> Result<Self>;
}

/// Runs `value` through the shared matrix into the representation of `ty`.
fn normalize(value: Value, ty: Type) -> Result<Value> {
    stmt::from_backend(value, &ty)
}

macro_rules! impl_integer {
    ( $( $ty:ty => $variant:ident, )* ) => {
        $(
            impl Primitive for $ty {
                const TYPE: Type = Type::$variant;

                fn to_value(&self) -> Value {
                    Value::from(*self)
                }

                fn load(value: Value) -> Result<Self> {
                    match normalize(value, Self::TYPE)? {
                        Value::Null => Ok(0),
                        Value::I64(v) => <$ty>::try_from(v)
                            .map_err(|_| Error::type_conversion(Value::I64(v), &Self::TYPE)),
                        value => Err(Error::type_conversion(value, &Self::TYPE)),
                    }
                }
            }
        )*
    };
}

impl_integer! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
}

impl Primitive for f32 {
    const TYPE: Type = Type::F32;

    fn to_value(&self) -> Value {
        Value::from(*self)
    }

    fn load(value: Value) -> Result<Self> {
        f64::load(value).map(|v| v as f32)
    }
}

impl Primitive for f64 {
    const TYPE: Type = Type::F64;

    fn to_value(&self) -> Value {
        Value::F64(*self)
    }

    fn load(value: Value) -> Result<Self> {
        match normalize(value, Self::TYPE)? {
            Value::Null => Ok(0.0),
            Value::F64(v) => Ok(v),
            value => Err(Error::type_conversion(value, &Self::TYPE)),
        }
    }
}

impl Primitive for bool {
    const TYPE: Type = Type::Bool;

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn load(value: Value) -> Result<Self> {
        match normalize(value, Self::TYPE)? {
            Value::Null => Ok(false),
            Value::Bool(v) => Ok(v),
            value => Err(Error::type_conversion(value, &Self::TYPE)),
        }
    }
}

impl Primitive for char {
    const TYPE: Type = Type::Char;

    fn to_value(&self) -> Value {
        Value::from(*self)
    }

    fn load(value: Value) -> Result<Self> {
        match normalize(value, Self::TYPE)? {
            Value::Null => Ok('\0'),
            Value::String(v) => Ok(v.chars().next().unwrap_or('\0')),
            value => Err(Error::type_conversion(value, &Self::TYPE)),
        }
    }
}

impl Primitive for String {
    const TYPE: Type = Type::String;

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn load(value: Value) -> Result<Self> {
        match normalize(value, Self::TYPE)? {
            Value::Null => Ok(String::new()),
            Value::String(v) => Ok(v),
            value => Err(Error::type_conversion(value, &Self::TYPE)),
        }
    }
}

impl Primitive for Vec<u8> {
    const TYPE: Type = Type::Bytes;

    fn to_value(&self) -> Value {
        Value::Bytes(self.clone())
    }

    fn load(value: Value) -> Result<Self> {
        match normalize(value, Self::TYPE)? {
            Value::Null => Ok(vec![]),
            Value::Bytes(v) => Ok(v),
            value => Err(Error::type_conversion(value, &Self::TYPE)),
        }
    }
}

impl Primitive for Uuid {
    const TYPE: Type = Type::Uuid;

    fn to_value(&self) -> Value {
        Value::Uuid(*self)
    }

    fn load(value: Value) -> Result<Self> {
        match normalize(value, Self::TYPE)? {
            Value::Null => Ok(Uuid::nil()),
            Value::Uuid(v) => Ok(v),
            value => Err(Error::type_conversion(value, &Self::TYPE)),
        }
    }
}

impl Primitive for Decimal {
    const TYPE: Type = Type::Decimal;

    fn to_value(&self) -> Value {
        Value::Decimal(*self)
    }

    fn load(value: Value) -> Result<Self> {
        match normalize(value, Self::TYPE)? {
            Value::Null => Ok(Decimal::ZERO),
            Value::Decimal(v) => Ok(v),
            value => Err(Error::type_conversion(value, &Self::TYPE)),
        }
    }
}

impl Primitive for NaiveDate {
    const TYPE: Type = Type::Date;

    fn to_value(&self) -> Value {
        Value::Date(*self)
    }

    fn load(value: Value) -> Result<Self> {
        match normalize(value, Self::TYPE)? {
            Value::Null => Ok(DateTime::<Utc>::default().date_naive()),
            Value::Date(v) => Ok(v),
            value => Err(Error::type_conversion(value, &Self::TYPE)),
        }
    }
}

impl Primitive for NaiveDateTime {
    const TYPE: Type = Type::DateTime;

    fn to_value(&self) -> Value {
        Value::DateTime(*self)
    }

    fn load(value: Value) -> Result<Self> {
        match normalize(value, Self::TYPE)? {
            Value::Null => Ok(DateTime::<Utc>::default().naive_utc()),
            Value::DateTime(v) => Ok(v),
            value => Err(Error::type_conversion(value, &Self::TYPE)),
        }
    }
}

impl Primitive for DateTime<Utc> {
    const TYPE: Type = Type::Timestamp;

    fn to_value(&self) -> Value {
        Value::Timestamp(*self)
    }

    fn load(value: Value) -> Result<Self> {
        match normalize(value, Self::TYPE)? {
            Value::Null => Ok(DateTime::<Utc>::default()),
            Value::Timestamp(v) => Ok(v),
            value => Err(Error::type_conversion(value, &Self::TYPE)),
        }
    }
}

impl<T: Primitive> Primitive for Option<T> {
    const TYPE: Type = T::TYPE;

    fn to_value(&self) -> Value {
        match self {
            Some(value) => value.to_value(),
            None => Value::Null,
        }
    }

    fn load(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            value => T::load(value).map(Some),
        }
    }
}
