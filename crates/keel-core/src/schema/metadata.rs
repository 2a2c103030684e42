use super::{Entity, EntityDescriptor, FieldAccessor, FieldDescriptor, IndexDescriptor};
use crate::{stmt::Type, stmt::Value, Error, Result};

use indexmap::IndexMap;
use std::collections::HashSet;

/// Structural description of an entity type, derived once from its
/// descriptor and shared by every repository for the type.
#[derive(Debug)]
pub struct EntityMetadata<E> {
    entity_name: String,
    id: FieldMetadata<E>,

    /// Non-id fields keyed by lowercased column name, in declaration order.
    fields: IndexMap<String, FieldMetadata<E>>,

    indexes: Vec<IndexMetadata>,
    instance: fn() -> E,
}

/// One persisted field.
#[derive(Debug)]
pub struct FieldMetadata<E> {
    pub column_name: String,
    pub field_name: &'static str,
    pub nullable: bool,
    pub raw_type: Option<String>,
    pub blob: bool,
    pub ty: Type,
    pub accessor: FieldAccessor<E>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexMetadata {
    pub name: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

impl<E: Entity> EntityMetadata<E> {
    /// Builds metadata for `E` from its descriptor.
    pub fn build() -> Result<Self> {
        Self::from_descriptor(E::descriptor())
    }
}

impl<E> EntityMetadata<E> {
    /// Validates a descriptor and turns it into metadata.
    pub fn from_descriptor(descriptor: EntityDescriptor<E>) -> Result<Self> {
        let entity_name = descriptor.name.trim();
        if entity_name.is_empty() {
            return Err(Error::invalid_entity_definition(
                "entity name must not be empty",
            ));
        }

        let id_count = descriptor.fields.iter().filter(|field| field.id).count();
        match id_count {
            1 => {}
            0 => {
                return Err(Error::invalid_entity_definition(format!(
                    "entity `{entity_name}` declares no id field"
                )))
            }
            n => {
                return Err(Error::invalid_entity_definition(format!(
                    "entity `{entity_name}` declares {n} id fields; exactly one is required"
                )))
            }
        }

        let instance = descriptor
            .instance
            .ok_or_else(|| Error::no_default_constructor(entity_name))?;

        let mut id = None;
        let mut fields = IndexMap::new();
        let mut field_indexes = vec![];

        for field in descriptor.fields {
            let Some(metadata) = FieldMetadata::from_descriptor(&field) else {
                if field.id {
                    return Err(Error::invalid_entity_definition(format!(
                        "id field `{}` of entity `{entity_name}` has no column tag",
                        field.name
                    )));
                }
                if field.index.is_some() {
                    return Err(Error::invalid_entity_definition(format!(
                        "field `{}` of entity `{entity_name}` is indexed but has no column tag",
                        field.name
                    )));
                }
                continue;
            };

            let key = metadata.column_name.to_lowercase();
            let clashes_with_id = id
                .as_ref()
                .is_some_and(|id: &FieldMetadata<E>| id.column_name.to_lowercase() == key);
            if fields.contains_key(&key) || clashes_with_id {
                return Err(Error::invalid_entity_definition(format!(
                    "column `{}` is declared more than once on entity `{entity_name}`",
                    metadata.column_name
                )));
            }

            if let Some(index) = field.index {
                let name = match index.name {
                    Some(name) => name.to_string(),
                    None => format!("idx_{entity_name}_{}", metadata.column_name),
                };
                field_indexes.push(IndexMetadata {
                    name,
                    columns: vec![metadata.column_name.clone()],
                    unique: index.unique,
                });
            }

            if field.id {
                id = Some(metadata);
            } else {
                fields.insert(key, metadata);
            }
        }

        let Some(id) = id else {
            return Err(Error::invalid_entity_definition(format!(
                "entity `{entity_name}` declares no id field"
            )));
        };

        let mut metadata = EntityMetadata {
            entity_name: entity_name.to_string(),
            id,
            fields,
            indexes: vec![],
            instance,
        };

        let mut indexes = Vec::with_capacity(descriptor.indexes.len() + field_indexes.len());
        for index in &descriptor.indexes {
            indexes.push(metadata.type_index(index)?);
        }
        indexes.extend(field_indexes);

        let mut names = HashSet::new();
        for index in &indexes {
            if !names.insert(index.name.to_lowercase()) {
                return Err(Error::invalid_entity_definition(format!(
                    "index `{}` is declared more than once on entity `{}`",
                    index.name, metadata.entity_name
                )));
            }
        }

        metadata.indexes = indexes;
        Ok(metadata)
    }

    fn type_index(&self, index: &IndexDescriptor) -> Result<IndexMetadata> {
        if index.columns.is_empty() {
            return Err(Error::invalid_entity_definition(format!(
                "type-level index on entity `{}` lists no columns",
                self.entity_name
            )));
        }

        let columns = index
            .columns
            .iter()
            .map(|column| {
                let resolved = self.resolve_column(column);
                if self.field(&resolved).is_none() {
                    return Err(Error::invalid_entity_definition(format!(
                        "index on entity `{}` references unknown column `{column}`",
                        self.entity_name
                    )));
                }
                Ok(resolved)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(IndexMetadata {
            name: match index.name {
                Some(name) => name.to_string(),
                None => format!("idx_{}", self.entity_name),
            },
            columns,
            unique: index.unique,
        })
    }

    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    pub fn id(&self) -> &FieldMetadata<E> {
        &self.id
    }

    /// Non-id fields in declaration order.
    pub fn fields(&self) -> impl ExactSizeIterator<Item = &FieldMetadata<E>> + '_ {
        self.fields.values()
    }

    /// The id field followed by every other field. This is the column order
    /// of every rendered statement.
    pub fn all_fields(&self) -> impl Iterator<Item = &FieldMetadata<E>> + '_ {
        core::iter::once(&self.id).chain(self.fields.values())
    }

    /// Number of persisted columns, id included.
    pub fn column_count(&self) -> usize {
        self.fields.len() + 1
    }

    /// Looks up a field (id included) by column name, ignoring case.
    pub fn field(&self, column: &str) -> Option<&FieldMetadata<E>> {
        if self.id.column_name.eq_ignore_ascii_case(column) {
            return Some(&self.id);
        }
        self.fields.get(&column.to_lowercase())
    }

    pub fn indexes(&self) -> &[IndexMetadata] {
        &self.indexes
    }

    /// Resolves a user-supplied name to a column name.
    ///
    /// Tried in order: a non-id column name, a non-id field name, the id
    /// column name, the id field name. All comparisons ignore case. An
    /// unmatched name is returned trimmed, as a literal column name.
    pub fn resolve_column(&self, name: &str) -> String {
        let name = name.trim();

        if let Some(field) = self.fields.get(&name.to_lowercase()) {
            return field.column_name.clone();
        }

        if let Some(field) = self
            .fields
            .values()
            .find(|field| field.field_name.eq_ignore_ascii_case(name))
        {
            return field.column_name.clone();
        }

        if self.id.column_name.eq_ignore_ascii_case(name)
            || self.id.field_name.eq_ignore_ascii_case(name)
        {
            return self.id.column_name.clone();
        }

        name.to_string()
    }

    /// Creates an empty instance with every field at its default.
    pub fn instantiate(&self) -> E {
        (self.instance)()
    }

    /// Reads the id value of `entity`.
    pub fn id_value(&self, entity: &E) -> Result<Value> {
        self.id.accessor.get(entity)
    }

    /// Reads every persisted field of `entity`, in [`all_fields`] order.
    ///
    /// [`all_fields`]: Self::all_fields
    pub fn extract(&self, entity: &E) -> Result<Vec<Value>> {
        self.all_fields()
            .map(|field| {
                field
                    .accessor
                    .get(entity)
                    .map_err(|err| err.context(format!("reading field `{}`", field.field_name)))
            })
            .collect()
    }

    /// Builds a record, asking `value_of` for each field's value in
    /// [`all_fields`] order.
    ///
    /// [`all_fields`]: Self::all_fields
    pub fn materialize(
        &self,
        mut value_of: impl FnMut(usize, &FieldMetadata<E>) -> Result<Value>,
    ) -> Result<E> {
        let mut entity = self.instantiate();
        for (position, field) in self.all_fields().enumerate() {
            let value = value_of(position, field)?;
            field
                .accessor
                .set(&mut entity, value)
                .map_err(|err| err.context(format!("loading field `{}`", field.field_name)))?;
        }
        Ok(entity)
    }
}

impl<E> FieldMetadata<E> {
    fn from_descriptor(field: &FieldDescriptor<E>) -> Option<Self> {
        let column = field.column.as_ref()?;

        Some(FieldMetadata {
            column_name: column.name.trim().to_string(),
            field_name: field.name,
            nullable: column.nullable,
            raw_type: column
                .raw_type
                .map(str::trim)
                .filter(|raw| !raw.is_empty())
                .map(str::to_string),
            blob: column.blob,
            ty: if column.blob { Type::Blob } else { field.ty },
            accessor: field.accessor,
        })
    }
}
