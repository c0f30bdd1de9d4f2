use darling::{util::Flag, FromField};
use getset::Getters;
use ghostx_aux::{GXDefault, GXVisibility};
use proc_macro2::{Span, TokenStream};
use quote::{format_ident, ToTokens};
use syn::{ext::IdentExt, spanned::Spanned};

#[derive(Debug, FromField, Getters)]
#[darling(attributes(ghost), forward_attrs)]
#[getset(get = "pub(crate)")]
pub(crate) struct GXField {
    ident:         Option<syn::Ident>,
    vis:           syn::Visibility,
    ty:            syn::Type,
    attrs:         Vec<syn::Attribute>,
    #[darling(rename = "default")]
    default_value: Option<GXDefault>,
    #[darling(default)]
    extends:       Flag,
    #[darling(default)]
    skip:          Flag,
    #[darling(default)]
    get:           Flag,
    #[darling(default)]
    get_mut:       Flag,
}

impl GXField {
    pub(crate) fn validate(&self, is_ancestor: bool) -> darling::Result<()> {
        let mut errors = darling::Error::accumulator();

        if self.is_extends() && self.is_skipped() {
            errors.push(darling::Error::custom("A field cannot be both 'extends' and 'skip'").with_span(&self.skip.span()));
        }

        if self.is_extends() && (self.get.is_present() || self.get_mut.is_present()) {
            errors.push(
                darling::Error::custom("Getters are not generated for the parent field").with_span(&self.extends.span()),
            );
        }

        if is_ancestor {
            for flag in [&self.get, &self.get_mut] {
                if flag.is_present() {
                    errors.push(
                        darling::Error::custom("Ancestor types have no load routine to generate getters with")
                            .with_span(&flag.span()),
                    );
                }
            }
        }

        if self.ident.as_ref().is_some_and(|i| i == crate::util::STATE_FIELD) {
            errors.push(darling::Error::custom("This field name is reserved").with_span(&self.span()));
        }

        errors.finish()
    }

    pub(crate) fn ident_tokens(&self) -> TokenStream {
        self.ident.to_token_stream()
    }

    /// The name the field is known by to the ghost machinery.
    pub(crate) fn name(&self) -> String {
        self.ident.as_ref().map_or_else(String::new, |i| i.unraw().to_string())
    }

    pub(crate) fn getter_ident(&self) -> syn::Ident {
        format_ident!("{}", self.name(), span = self.span())
    }

    pub(crate) fn getter_mut_ident(&self) -> syn::Ident {
        format_ident!("{}_mut", self.name(), span = self.span())
    }

    pub(crate) fn is_extends(&self) -> bool {
        self.extends.is_present()
    }

    pub(crate) fn is_skipped(&self) -> bool {
        self.skip.is_present()
    }

    pub(crate) fn needs_getter(&self) -> bool {
        self.get.is_present()
    }

    pub(crate) fn needs_getter_mut(&self) -> bool {
        self.get_mut.is_present()
    }

    pub(crate) fn visibility(&self) -> GXVisibility {
        GXVisibility::from(&self.vis)
    }

    /// Attributes to re-emit on the field, i.e. everything but our own.
    pub(crate) fn foreign_attrs(&self) -> TokenStream {
        let mut toks = TokenStream::new();
        for attr in self.attrs.iter().filter(|a| !a.path().is_ident("ghost")) {
            attr.to_tokens(&mut toks);
        }
        toks
    }

    pub(crate) fn span(&self) -> Span {
        self.ident.as_ref().map_or_else(|| self.ty.span(), |i| i.span())
    }
}
