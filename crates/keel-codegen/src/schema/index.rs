use super::kw;

/// An `#[index]` attribute, on a field or on the entity type.
#[derive(Debug, Default)]
pub(crate) struct Index {
    pub(crate) name: Option<syn::LitStr>,

    /// Only allowed, and required, on the type.
    pub(crate) columns: Vec<syn::LitStr>,

    pub(crate) unique: bool,
}

impl Index {
    pub(super) fn from_ast(attr: &syn::Attribute) -> syn::Result<Index> {
        match &attr.meta {
            syn::Meta::Path(_) => Ok(Index::default()),
            _ => attr.parse_args(),
        }
    }
}

impl syn::parse::Parse for Index {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let mut result = Index::default();
        let mut seen_columns = false;

        // Allowed syntax:
        //
        // #[index]
        // #[index(unique)]
        // #[index(name = "idx_users_email", unique)]
        // #[index(columns("last_name", "first_name"))]
        while !input.is_empty() {
            let lookahead = input.lookahead1();

            if lookahead.peek(kw::name) {
                if result.name.is_some() {
                    return Err(syn::Error::new(input.span(), "duplicate index name"));
                }
                input.parse::<kw::name>()?;
                input.parse::<syn::Token![=]>()?;
                result.name = Some(input.parse()?);
            } else if lookahead.peek(kw::unique) {
                input.parse::<kw::unique>()?;
                result.unique = true;
            } else if lookahead.peek(kw::columns) {
                if seen_columns {
                    return Err(syn::Error::new(input.span(), "duplicate `columns`"));
                }
                seen_columns = true;
                input.parse::<kw::columns>()?;

                let content;
                syn::parenthesized!(content in input);
                let columns =
                    content.parse_terminated(<syn::LitStr as syn::parse::Parse>::parse, syn::Token![,])?;
                result.columns = columns.into_iter().collect();
            } else {
                return Err(lookahead.error());
            }

            if input.is_empty() {
                break;
            }
            input.parse::<syn::Token![,]>()?;
        }

        Ok(result)
    }
}
