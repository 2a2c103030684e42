syn::custom_keyword!(blob);
syn::custom_keyword!(columns);
syn::custom_keyword!(name);
syn::custom_keyword!(nullable);
syn::custom_keyword!(raw_type);
syn::custom_keyword!(unique);
