use super::{EntityAttr, ErrorSet, Field, Index};

use heck::ToSnakeCase;

#[derive(Debug)]
pub(crate) struct Entity {
    /// Type identifier
    pub(crate) ident: syn::Ident,

    /// Table or collection name
    pub(crate) name: String,

    /// Tagged fields, in declaration order
    pub(crate) fields: Vec<Field>,

    /// Composite indexes declared on the type
    pub(crate) indexes: Vec<Index>,
}

impl Entity {
    pub(crate) fn from_ast(ast: &syn::ItemStruct) -> syn::Result<Self> {
        let syn::Fields::Named(node) = &ast.fields else {
            return Err(syn::Error::new_spanned(
                &ast.fields,
                "entity fields must be named",
            ));
        };

        if !ast.generics.params.is_empty() {
            return Err(syn::Error::new_spanned(
                &ast.generics,
                "entity generics are not supported",
            ));
        }

        let mut errs = ErrorSet::new();
        let mut attr = EntityAttr::default();
        errs.check(attr.populate_from_ast(&ast.attrs));

        let fields = node
            .named
            .iter()
            .filter_map(|field| errs.check(Field::from_ast(field)))
            .filter(|field| field.attrs.is_tagged())
            .collect();

        errs.finish()?;

        let name = match attr.name {
            Some(name) => name.value(),
            None => ast.ident.to_string().to_snake_case(),
        };

        Ok(Entity {
            ident: ast.ident.clone(),
            name,
            fields,
            indexes: attr.indexes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn collects_tagged_fields() {
        let item: syn::ItemStruct = syn::parse_quote! {
            #[entity("people")]
            #[index(columns("name", "age"))]
            struct Person {
                #[id]
                #[column]
                id: i64,

                #[column("full_name", nullable = false)]
                #[index(unique)]
                name: String,

                #[column]
                age: i32,

                cached: String,
            }
        };

        let entity = Entity::from_ast(&item).unwrap();
        assert_eq!(entity.name, "people");
        assert_eq!(entity.indexes.len(), 1);

        let columns: Vec<_> = entity.fields.iter().map(Field::column_name).collect();
        assert_eq!(columns, ["id", "full_name", "age"]);
        assert!(entity.fields[0].attrs.id);
        assert!(entity.fields[1].attrs.index.as_ref().unwrap().unique);
    }

    #[test]
    fn default_name_is_snake_case() {
        let item: syn::ItemStruct = syn::parse_quote! {
            struct LineItem {
                #[id]
                #[column]
                id: i64,
            }
        };
        assert_eq!(Entity::from_ast(&item).unwrap().name, "line_item");
    }

    #[test]
    fn reports_every_bad_attribute() {
        let item: syn::ItemStruct = syn::parse_quote! {
            #[index(unique)]
            struct Broken {
                #[column(size = 1)]
                id: i64,

                #[column]
                #[index(columns("a"))]
                name: String,
            }
        };

        let err = Entity::from_ast(&item).unwrap_err();
        assert_eq!(err.into_iter().count(), 3);
    }

    #[test]
    fn rejects_tuple_structs() {
        let item: syn::ItemStruct = syn::parse_quote!(struct Pair(i64, String););
        assert!(Entity::from_ast(&item).is_err());
    }
}
