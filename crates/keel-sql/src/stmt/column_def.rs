use crate::ColumnType;

use keel_core::schema::FieldMetadata;

#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub name: String,
    pub ty: ColumnTy,
    pub primary_key: bool,
    pub not_null: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnTy {
    /// Mapped through the flavor's type table.
    Mapped(ColumnType),

    /// A raw type override, written verbatim.
    Raw(String),
}

impl ColumnDef {
    pub(crate) fn from_field<E>(field: &FieldMetadata<E>, primary_key: bool) -> ColumnDef {
        let ty = match &field.raw_type {
            Some(raw) => ColumnTy::Raw(raw.clone()),
            None => ColumnTy::Mapped(ColumnType::from_ty(field.ty)),
        };

        ColumnDef {
            name: field.column_name.clone(),
            ty,
            primary_key,
            not_null: !field.nullable,
        }
    }
}
