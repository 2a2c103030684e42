use super::Expand;
use crate::schema::Index;

use proc_macro2::TokenStream;
use quote::quote;

impl Expand<'_> {
    pub(super) fn expand_index(&self, index: &Index) -> TokenStream {
        let keel = &self.keel;
        let columns = &index.columns;
        let unique = index.unique;
        let name = match &index.name {
            Some(name) => quote!(Some(#name)),
            None => quote!(None),
        };

        quote! {
            #keel::IndexDescriptor {
                name: #name,
                columns: vec![#( #columns ),*],
                unique: #unique,
            }
        }
    }
}
