use super::{ColumnDef, Statement};

use keel_core::EntityMetadata;

#[derive(Debug, Clone)]
pub struct CreateTable {
    pub table: String,

    /// Column definitions, id first.
    pub columns: Vec<ColumnDef>,
}

impl Statement {
    /// `CREATE TABLE IF NOT EXISTS` for an entity.
    pub fn create_table<E>(metadata: &EntityMetadata<E>) -> Self {
        CreateTable {
            table: metadata.entity_name().to_string(),
            columns: metadata
                .all_fields()
                .enumerate()
                .map(|(position, field)| ColumnDef::from_field(field, position == 0))
                .collect(),
        }
        .into()
    }
}

impl From<CreateTable> for Statement {
    fn from(value: CreateTable) -> Self {
        Self::CreateTable(value)
    }
}
