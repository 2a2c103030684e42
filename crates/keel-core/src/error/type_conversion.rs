use super::Error;
use crate::stmt::{Type, Value};

/// Error when a backend value cannot be converted to a field's declared type.
#[derive(Debug)]
pub(super) struct TypeConversionError {
    value: Value,
    to_type: Type,
}

impl std::error::Error for TypeConversionError {}

impl core::fmt::Display for TypeConversionError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "cannot convert {} to {:?}",
            self.value.kind_name(),
            self.to_type
        )
    }
}

impl Error {
    pub fn type_conversion(value: Value, to_type: &Type) -> Error {
        Error::from(super::ErrorKind::TypeConversion(TypeConversionError {
            value,
            to_type: *to_type,
        }))
    }

    pub fn is_type_conversion(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::TypeConversion(_)))
    }
}
