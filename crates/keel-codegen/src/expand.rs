mod field;
mod index;

use crate::schema::Entity;

use proc_macro2::TokenStream;
use quote::quote;

struct Expand<'a> {
    /// The entity being expanded
    entity: &'a Entity,

    /// Path prefix for keel types
    keel: TokenStream,
}

impl Expand<'_> {
    fn expand(&self) -> TokenStream {
        let keel = &self.keel;
        let ident = &self.entity.ident;
        let name = &self.entity.name;
        let fields = self.entity.fields.iter().map(|field| self.expand_field(field));
        let indexes = self
            .entity
            .indexes
            .iter()
            .map(|index| self.expand_index(index));

        quote! {
            impl #keel::Entity for #ident {
                fn descriptor() -> #keel::EntityDescriptor<Self> {
                    #keel::EntityDescriptor {
                        name: #name,
                        fields: vec![#( #fields ),*],
                        indexes: vec![#( #indexes ),*],
                        instance: Some(<Self as #keel::Default>::default),
                    }
                }
            }
        }
    }
}

pub(super) fn entity(entity: &Entity) -> TokenStream {
    let expand = Expand {
        entity,
        keel: quote!(_keel::codegen_support),
    };

    wrap_in_const(expand.expand())
}

fn wrap_in_const(code: TokenStream) -> TokenStream {
    quote! {
        const _: () = {
            use keel as _keel;
            #code
        };
    }
}
