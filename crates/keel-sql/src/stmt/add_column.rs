use super::{ColumnDef, Statement};

use keel_core::{schema::FieldMetadata, EntityMetadata};

#[derive(Debug, Clone)]
pub struct AddColumn {
    pub table: String,
    pub column: ColumnDef,
}

impl Statement {
    /// Adds a column to an existing table.
    ///
    /// The column is always nullable: existing rows get no backfill value.
    pub fn add_column<E>(metadata: &EntityMetadata<E>, field: &FieldMetadata<E>) -> Self {
        let mut column = ColumnDef::from_field(field, false);
        column.not_null = false;

        AddColumn {
            table: metadata.entity_name().to_string(),
            column,
        }
        .into()
    }
}

impl From<AddColumn> for Statement {
    fn from(value: AddColumn) -> Self {
        Self::AddColumn(value)
    }
}
