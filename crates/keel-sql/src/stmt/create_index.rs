use super::Statement;

use keel_core::{schema::IndexMetadata, EntityMetadata};

#[derive(Debug, Clone)]
pub struct CreateIndex {
    pub name: String,
    pub table: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

impl Statement {
    pub fn create_index<E>(metadata: &EntityMetadata<E>, index: &IndexMetadata) -> Self {
        CreateIndex {
            name: index.name.clone(),
            table: metadata.entity_name().to_string(),
            columns: index.columns.clone(),
            unique: index.unique,
        }
        .into()
    }
}

impl From<CreateIndex> for Statement {
    fn from(value: CreateIndex) -> Self {
        Self::CreateIndex(value)
    }
}
