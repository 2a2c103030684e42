use super::kw;

/// Arguments of a field's `#[column]` attribute.
#[derive(Debug, Default)]
pub(crate) struct Column {
    /// Column name; the field name when absent.
    pub(crate) name: Option<syn::LitStr>,

    /// Defaults to nullable.
    pub(crate) nullable: Option<syn::LitBool>,

    /// Physical type written verbatim in place of the mapped one.
    pub(crate) raw_type: Option<syn::LitStr>,

    /// Store the field as a serialized payload.
    pub(crate) blob: bool,
}

impl Column {
    pub(super) fn from_ast(attr: &syn::Attribute) -> syn::Result<Column> {
        match &attr.meta {
            syn::Meta::Path(_) => Ok(Column::default()),
            _ => attr.parse_args(),
        }
    }
}

impl syn::parse::Parse for Column {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let mut result = Column::default();

        // Allowed syntax:
        //
        // #[column("name")]
        // #[column(name = "name", nullable = false)]
        // #[column("name", raw_type = "VARCHAR(320)")]
        // #[column(blob)]
        while !input.is_empty() {
            let lookahead = input.lookahead1();

            if lookahead.peek(syn::LitStr) || lookahead.peek(kw::name) {
                if result.name.is_some() {
                    return Err(syn::Error::new(input.span(), "duplicate column name"));
                }
                if input.peek(kw::name) {
                    input.parse::<kw::name>()?;
                    input.parse::<syn::Token![=]>()?;
                }
                result.name = Some(input.parse()?);
            } else if lookahead.peek(kw::nullable) {
                if result.nullable.is_some() {
                    return Err(syn::Error::new(input.span(), "duplicate `nullable`"));
                }
                input.parse::<kw::nullable>()?;
                input.parse::<syn::Token![=]>()?;
                result.nullable = Some(input.parse()?);
            } else if lookahead.peek(kw::raw_type) {
                if result.raw_type.is_some() {
                    return Err(syn::Error::new(input.span(), "duplicate `raw_type`"));
                }
                input.parse::<kw::raw_type>()?;
                input.parse::<syn::Token![=]>()?;
                result.raw_type = Some(input.parse()?);
            } else if lookahead.peek(kw::blob) {
                input.parse::<kw::blob>()?;
                result.blob = true;
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_and_full_forms() {
        let attr: syn::Attribute = syn::parse_quote!(#[column]);
        let column = Column::from_ast(&attr).unwrap();
        assert!(column.name.is_none());
        assert!(!column.blob);

        let attr: syn::Attribute =
            syn::parse_quote!(#[column("mail", nullable = false, raw_type = "VARCHAR(320)")]);
        let column = Column::from_ast(&attr).unwrap();
        assert_eq!(column.name.unwrap().value(), "mail");
        assert!(!column.nullable.unwrap().value);
        assert_eq!(column.raw_type.unwrap().value(), "VARCHAR(320)");

        let attr: syn::Attribute = syn::parse_quote!(#[column(name = "payload", blob)]);
        let column = Column::from_ast(&attr).unwrap();
        assert_eq!(column.name.unwrap().value(), "payload");
        assert!(column.blob);
    }

    #[test]
    fn rejects_unknown_arguments() {
        let attr: syn::Attribute = syn::parse_quote!(#[column(size = 3)]);
        assert!(Column::from_ast(&attr).is_err());

        let attr: syn::Attribute = syn::parse_quote!(#[column("a", "b")]);
        assert!(Column::from_ast(&attr).is_err());
    }
}
