use super::Statement;

use keel_core::EntityMetadata;

/// Drops an index if it exists. MySQL needs the owning table.
#[derive(Debug, Clone)]
pub struct DropIndex {
    pub name: String,
    pub table: String,
}

impl Statement {
    pub fn drop_index<E>(metadata: &EntityMetadata<E>, name: &str) -> Self {
        DropIndex {
            name: name.to_string(),
            table: metadata.entity_name().to_string(),
        }
        .into()
    }
}

impl From<DropIndex> for Statement {
    fn from(value: DropIndex) -> Self {
        Self::DropIndex(value)
    }
}
