use super::{Column, ErrorSet, Index};

#[derive(Debug)]
pub(crate) struct Field {
    /// Field identifier
    pub(crate) ident: syn::Ident,

    /// Declared Rust type
    pub(crate) ty: syn::Type,

    pub(crate) attrs: FieldAttr,
}

#[derive(Debug, Default)]
pub(crate) struct FieldAttr {
    /// Set when the field is annotated with `#[id]`
    pub(crate) id: bool,

    /// Present when the field is persisted
    pub(crate) column: Option<Column>,

    /// Single-column index on this field
    pub(crate) index: Option<Index>,
}

impl FieldAttr {
    /// Fields with no tag are transient and left out of the descriptor.
    pub(crate) fn is_tagged(&self) -> bool {
        self.id || self.column.is_some() || self.index.is_some()
    }
}

impl Field {
    pub(super) fn from_ast(field: &syn::Field) -> syn::Result<Self> {
        let Some(ident) = &field.ident else {
            return Err(syn::Error::new_spanned(field, "entity fields must be named"));
        };

        let mut errs = ErrorSet::new();
        let mut attrs = FieldAttr::default();

        for attr in &field.attrs {
            if attr.path().is_ident("id") {
                if attrs.id {
                    errs.push(syn::Error::new_spanned(attr, "duplicate #[id] attribute"));
                }
                attrs.id = true;
            } else if attr.path().is_ident("column") {
                if attrs.column.is_some() {
                    errs.push(syn::Error::new_spanned(attr, "duplicate #[column] attribute"));
                } else {
                    attrs.column = errs.check(Column::from_ast(attr));
                }
            } else if attr.path().is_ident("index") {
                if attrs.index.is_some() {
                    errs.push(syn::Error::new_spanned(attr, "duplicate #[index] attribute"));
                    continue;
                }

                let Some(index) = errs.check(Index::from_ast(attr)) else {
                    continue;
                };
                if !index.columns.is_empty() {
                    errs.push(syn::Error::new_spanned(
                        attr,
                        "a field index covers its own column; `columns` belongs on the type",
                    ));
                }
                attrs.index = Some(index);
            }
        }

        errs.finish()?;

        Ok(Field {
            ident: ident.clone(),
            ty: field.ty.clone(),
            attrs,
        })
    }

    /// Column name: the `#[column]` name, or the field name.
    pub(crate) fn column_name(&self) -> String {
        self.attrs
            .column
            .as_ref()
            .and_then(|column| column.name.as_ref())
            .map(syn::LitStr::value)
            .unwrap_or_else(|| self.ident.to_string())
    }
}
