use crate::Flavor;

use keel_core::stmt::Type;

/// Abstract column type, mapped to a physical type name per flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Integer,
    BigInt,
    Boolean,
    Float,
    Double,
    Decimal,
    Char,
    Varchar,
    Text,
    Date,
    Timestamp,
    Uuid,
    Blob,
}

impl ColumnType {
    /// Column type for a field's declared type.
    pub fn from_ty(ty: Type) -> ColumnType {
        match ty {
            Type::I8 | Type::I16 | Type::I32 | Type::U8 | Type::U16 => ColumnType::Integer,
            Type::I64 | Type::U32 => ColumnType::BigInt,
            Type::Bool => ColumnType::Boolean,
            Type::F32 => ColumnType::Float,
            Type::F64 => ColumnType::Double,
            Type::Decimal => ColumnType::Decimal,
            Type::Char => ColumnType::Char,
            Type::String => ColumnType::Varchar,
            Type::Uuid => ColumnType::Uuid,
            Type::Date => ColumnType::Date,
            Type::DateTime | Type::Timestamp => ColumnType::Timestamp,
            Type::Bytes | Type::Blob => ColumnType::Blob,
        }
    }

    /// Physical type name in `flavor`.
    ///
    /// SQLite collapses everything onto its storage classes. Decimals are
    /// kept as TEXT there so that REAL affinity does not round them.
    pub fn name(self, flavor: Flavor) -> &'static str {
        use ColumnType::*;

        match flavor {
            Flavor::Sqlite => match self {
                Integer | BigInt | Boolean => "INTEGER",
                Float | Double => "REAL",
                Decimal | Char | Varchar | Text | Date | Timestamp | Uuid => "TEXT",
                Blob => "BLOB",
            },
            Flavor::Mysql => match self {
                Integer => "INT",
                BigInt => "BIGINT",
                Boolean => "TINYINT(1)",
                Float => "FLOAT",
                Double => "DOUBLE",
                Decimal => "DECIMAL(38,10)",
                Char => "CHAR(1)",
                Varchar => "VARCHAR(255)",
                Text => "TEXT",
                Date => "DATE",
                Timestamp => "DATETIME(6)",
                Uuid => "CHAR(36)",
                Blob => "BLOB",
            },
            Flavor::Postgresql => match self {
                Integer => "INTEGER",
                BigInt => "BIGINT",
                Boolean => "BOOLEAN",
                Float => "REAL",
                Double => "DOUBLE PRECISION",
                Decimal => "NUMERIC",
                Char => "CHAR(1)",
                Varchar => "VARCHAR(255)",
                Text => "TEXT",
                Date => "DATE",
                Timestamp => "TIMESTAMP",
                Uuid => "UUID",
                Blob => "BYTEA",
            },
        }
    }
}
