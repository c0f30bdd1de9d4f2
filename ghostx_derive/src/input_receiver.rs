use crate::fields::GXField;
use darling::{ast, FromDeriveInput};
use getset::Getters;
use proc_macro2::TokenStream;
use quote::ToTokens;

#[derive(Debug, FromDeriveInput, Getters)]
#[darling(supports(struct_named), forward_attrs)]
#[getset(get = "pub(crate)")]
pub(crate) struct GXInputReceiver {
    vis:      syn::Visibility,
    ident:    syn::Ident,
    data:     ast::Data<(), GXField>,
    attrs:    Vec<syn::Attribute>,
    generics: syn::Generics,
}

impl GXInputReceiver {
    pub(crate) fn fields(&self) -> Vec<&GXField> {
        self.data.as_ref().take_struct().map_or_else(Vec::new, |s| s.fields)
    }

    pub(crate) fn has_generics(&self) -> bool {
        !self.generics.params.is_empty() || self.generics.where_clause.is_some()
    }

    pub(crate) fn struct_attrs(&self) -> TokenStream {
        let mut toks = TokenStream::new();
        for attr in self.attrs.iter().filter(|a| !a.path().is_ident("ghost")) {
            attr.to_tokens(&mut toks);
        }
        toks
    }
}
