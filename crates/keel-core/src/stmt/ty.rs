/// Declared type of an entity field.
///
/// This is the application-side view. Each dialect maps it onto a physical
/// column type, and the coercion matrix uses it as the read target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    F32,
    F64,

    /// A single character, stored as a one-character string.
    Char,

    String,
    Uuid,
    Decimal,

    /// Calendar date without time zone.
    Date,

    /// Date and time without time zone.
    DateTime,

    /// UTC instant.
    Timestamp,

    Bytes,

    /// Structured payload serialized to an opaque byte sequence.
    Blob,
}

impl Type {
    pub fn is_integer(self) -> bool {
        self.integer_range().is_some()
    }

    pub fn is_float(self) -> bool {
        matches!(self, Type::F32 | Type::F64)
    }

    /// Inclusive value range of an integer type.
    pub fn integer_range(self) -> Option<(i64, i64)> {
        Some(match self {
            Type::I8 => (i8::MIN.into(), i8::MAX.into()),
            Type::I16 => (i16::MIN.into(), i16::MAX.into()),
            Type::I32 => (i32::MIN.into(), i32::MAX.into()),
            Type::I64 => (i64::MIN, i64::MAX),
            Type::U8 => (0, u8::MAX.into()),
            Type::U16 => (0, u16::MAX.into()),
            Type::U32 => (0, u32::MAX.into()),
            _ => return None,
        })
    }
}
