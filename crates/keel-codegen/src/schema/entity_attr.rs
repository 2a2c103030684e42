use super::{kw, ErrorSet, Index};

/// Attributes placed on the entity type.
#[derive(Debug, Default)]
pub(crate) struct EntityAttr {
    /// Table or collection name from `#[entity("...")]`.
    pub(crate) name: Option<syn::LitStr>,

    /// Composite indexes.
    pub(crate) indexes: Vec<Index>,
}

impl EntityAttr {
    pub(super) fn populate_from_ast(&mut self, attrs: &[syn::Attribute]) -> syn::Result<()> {
        let mut errs = ErrorSet::new();

        for attr in attrs {
            if attr.path().is_ident("entity") {
                if self.name.is_some() {
                    errs.push(syn::Error::new_spanned(attr, "duplicate #[entity] attribute"));
                } else if let Some(name) = errs.check(attr.parse_args_with(parse_entity_name)) {
                    self.name = Some(name);
                }
            } else if attr.path().is_ident("index") {
                let Some(index) = errs.check(Index::from_ast(attr)) else {
                    continue;
                };

                if index.columns.is_empty() {
                    errs.push(syn::Error::new_spanned(
                        attr,
                        "an index on the type must list its columns: #[index(columns(\"a\", \"b\"))]",
                    ));
                } else {
                    self.indexes.push(index);
                }
            }
        }

        errs.finish()
    }
}

/// `"users"` or `name = "users"`.
fn parse_entity_name(input: syn::parse::ParseStream) -> syn::Result<syn::LitStr> {
    if input.peek(kw::name) {
        input.parse::<kw::name>()?;
        input.parse::<syn::Token![=]>()?;
    }
    input.parse()
}
