//! Codec for fields tagged `blob`.
//!
//! The payload is serialized with `serde_json` into an opaque byte sequence.
//! Backends only ever see bytes, so this path is independent of the rest of
//! the coercion matrix.

use super::{Type, Value};
use crate::{Error, Result};

use serde::{de::DeserializeOwned, Serialize};

/// Encodes a field value. A payload that serializes to JSON `null` (such as
/// `None`) is stored as a backend null.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    let bytes = serde_json::to_vec(value)?;
    if bytes == b"null" {
        return Ok(Value::Null);
    }
    Ok(Value::Bytes(bytes))
}

/// Decodes bytes read from the backend back into the declared type.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    match value {
        Value::Null => serde_json::from_value(serde_json::Value::Null)
            .map_err(|_| Error::type_conversion(Value::Null, &Type::Blob)),
        Value::Bytes(bytes) => serde_json::from_slice(&bytes)
            .map_err(|err| Error::from(err).context("decoding blob payload")),
        Value::String(text) => serde_json::from_str(&text)
            .map_err(|err| Error::from(err).context("decoding blob payload")),
        value => Err(Error::type_conversion(value, &Type::Blob)),
    }
}

/// Like [`decode`], but a backend null that the declared type cannot take
/// loads the type's zero value. Rows written before a blob column existed
/// read this way.
pub fn decode_or_default<T: DeserializeOwned + Default>(value: Value) -> Result<T> {
    match value {
        Value::Null => Ok(serde_json::from_value(serde_json::Value::Null).unwrap_or_default()),
        value => decode(value),
    }
}
