use super::Statement;

use keel_core::EntityMetadata;

/// `DROP TABLE IF EXISTS`.
#[derive(Debug, Clone)]
pub struct DropTable {
    pub table: String,
}

impl Statement {
    pub fn drop_table<E>(metadata: &EntityMetadata<E>) -> Self {
        DropTable {
            table: metadata.entity_name().to_string(),
        }
        .into()
    }
}

impl From<DropTable> for Statement {
    fn from(value: DropTable) -> Self {
        Self::DropTable(value)
    }
}
