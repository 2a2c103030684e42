use super::FieldAccessor;
use crate::stmt::Type;

/// A record type that can be persisted.
///
/// Usually implemented with `#[derive(Entity)]`. The descriptor is static
/// data; validation happens when the registry first builds
/// [`EntityMetadata`](super::EntityMetadata) from it.
pub trait Entity: Sized + Send + Sync + 'static {
    fn descriptor() -> EntityDescriptor<Self>;
}

/// Declarative description of an entity type, as written on the type.
#[derive(Debug)]
pub struct EntityDescriptor<E> {
    /// Logical table or collection name.
    pub name: &'static str,

    /// Fields carrying an id, column or index tag, in declaration order.
    pub fields: Vec<FieldDescriptor<E>>,

    /// Type-level (composite) indexes.
    pub indexes: Vec<IndexDescriptor>,

    /// Zero-argument constructor used to materialize rows.
    pub instance: Option<fn() -> E>,
}

#[derive(Debug)]
pub struct FieldDescriptor<E> {
    /// Declared field name.
    pub name: &'static str,

    /// Carries the identifier tag.
    pub id: bool,

    pub column: Option<ColumnDescriptor>,

    /// Single-column index declared on the field.
    pub index: Option<IndexDescriptor>,

    pub ty: Type,

    pub accessor: FieldAccessor<E>,
}

#[derive(Debug, Clone)]
pub struct ColumnDescriptor {
    pub name: &'static str,
    pub nullable: bool,
    pub raw_type: Option<&'static str>,
    pub blob: bool,
}

impl ColumnDescriptor {
    /// A nullable column with no type override.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            nullable: true,
            raw_type: None,
            blob: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct IndexDescriptor {
    /// Explicit name; derived from the entity name when absent.
    pub name: Option<&'static str>,

    /// Columns of a type-level index. Empty on field-level indexes, which
    /// cover their own column.
    pub columns: Vec<&'static str>,

    pub unique: bool,
}
