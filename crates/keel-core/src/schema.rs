mod accessor;
pub use accessor::FieldAccessor;

mod entity;
pub use entity::{ColumnDescriptor, Entity, EntityDescriptor, FieldDescriptor, IndexDescriptor};

mod metadata;
pub use metadata::{EntityMetadata, FieldMetadata, IndexMetadata};

mod registry;
pub use registry::Registry;
