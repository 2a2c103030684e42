use super::Expand;
use crate::schema::{Column, Field};

use proc_macro2::TokenStream;
use quote::quote;

impl Expand<'_> {
    pub(super) fn expand_field(&self, field: &Field) -> TokenStream {
        let keel = &self.keel;
        let ident = &field.ident;
        let ty = &field.ty;
        let name = ident.to_string();
        let id = field.attrs.id;
        let column = self.expand_column(field);
        let index = match &field.attrs.index {
            Some(index) => {
                let index = self.expand_index(index);
                quote!(Some(#index))
            }
            None => quote!(None),
        };

        let blob = field.attrs.column.as_ref().is_some_and(|column| column.blob);

        let (field_ty, get, load) = if blob {
            (
                quote!(#keel::Type::Blob),
                quote!(#keel::blob::encode(&entity.#ident)),
                quote!(#keel::blob::decode_or_default::<#ty>(value)?),
            )
        } else {
            (
                quote!(<#ty as #keel::Primitive>::TYPE),
                quote!(Ok(#keel::Primitive::to_value(&entity.#ident))),
                quote!(<#ty as #keel::Primitive>::load(value)?),
            )
        };

        quote! {
            #keel::FieldDescriptor {
                name: #name,
                id: #id,
                column: #column,
                index: #index,
                ty: #field_ty,
                accessor: #keel::FieldAccessor::new(
                    |entity: &Self| -> #keel::Result<#keel::Value> { #get },
                    |entity: &mut Self, value: #keel::Value| -> #keel::Result<()> {
                        entity.#ident = #load;
                        Ok(())
                    },
                ),
            }
        }
    }

    fn expand_column(&self, field: &Field) -> TokenStream {
        let keel = &self.keel;

        let Some(Column {
            nullable,
            raw_type,
            blob,
            ..
        }) = &field.attrs.column
        else {
            return quote!(None);
        };

        let name = field.column_name();
        let nullable = nullable.as_ref().map_or(true, |lit| lit.value);
        let raw_type = match raw_type {
            Some(raw) => quote!(Some(#raw)),
            None => quote!(None),
        };

        quote! {
            Some(#keel::ColumnDescriptor {
                name: #name,
                nullable: #nullable,
                raw_type: #raw_type,
                blob: #blob,
            })
        }
    }
}
