use super::Statement;

use keel_core::EntityMetadata;

/// Insert-or-replace keyed by the id column.
#[derive(Debug, Clone)]
pub struct Upsert {
    pub table: String,

    /// Every column, id first. Parameters bind in this order.
    pub columns: Vec<String>,
}

impl Upsert {
    pub fn id_column(&self) -> &str {
        &self.columns[0]
    }

    /// Columns other than the id.
    pub fn value_columns(&self) -> &[String] {
        &self.columns[1..]
    }
}

impl Statement {
    pub fn upsert<E>(metadata: &EntityMetadata<E>) -> Self {
        Upsert {
            table: metadata.entity_name().to_string(),
            columns: metadata
                .all_fields()
                .map(|field| field.column_name.clone())
                .collect(),
        }
        .into()
    }
}

impl From<Upsert> for Statement {
    fn from(value: Upsert) -> Self {
        Self::Upsert(value)
    }
}
