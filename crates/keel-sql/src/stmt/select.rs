use super::{Filter, Statement};

use keel_core::EntityMetadata;

#[derive(Debug, Clone)]
pub struct Select {
    pub table: String,
    pub projection: Projection,
    pub filter: Filter,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone)]
pub enum Projection {
    /// Named columns, id first.
    Columns(Vec<String>),

    /// `COUNT(*)`.
    Count,
}

impl Statement {
    pub fn select<E>(metadata: &EntityMetadata<E>, filter: Filter, limit: Option<usize>) -> Self {
        Select {
            table: metadata.entity_name().to_string(),
            projection: Projection::Columns(
                metadata
                    .all_fields()
                    .map(|field| field.column_name.clone())
                    .collect(),
            ),
            filter,
            limit,
        }
        .into()
    }

    pub fn count<E>(metadata: &EntityMetadata<E>, filter: Filter) -> Self {
        Select {
            table: metadata.entity_name().to_string(),
            projection: Projection::Count,
            filter,
            limit: None,
        }
        .into()
    }
}

impl From<Select> for Statement {
    fn from(value: Select) -> Self {
        Self::Select(value)
    }
}
