extern crate proc_macro;

use proc_macro::TokenStream;

/// Derives `keel::Entity` from `#[entity]`, `#[id]`, `#[column]` and
/// `#[index]` attributes.
#[proc_macro_derive(Entity, attributes(entity, id, column, index))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    match keel_codegen::generate(input.into()) {
        Ok(output) => output.into(),
        Err(e) => e.to_compile_error().into(),
    }
}
