use super::{Filter, Statement};

use keel_core::EntityMetadata;

/// Deletes every matching row. Deletion takes no limit.
#[derive(Debug, Clone)]
pub struct Delete {
    pub table: String,
    pub filter: Filter,
}

impl Statement {
    pub fn delete<E>(metadata: &EntityMetadata<E>, filter: Filter) -> Self {
        Delete {
            table: metadata.entity_name().to_string(),
            filter,
        }
        .into()
    }
}

impl From<Delete> for Statement {
    fn from(value: Delete) -> Self {
        Self::Delete(value)
    }
}
