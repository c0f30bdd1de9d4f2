use darling::{util::Flag, FromMeta};
use getset::Getters;

/// Struct-level arguments of `#[ghost(...)]`.
#[derive(Debug, Default, FromMeta, Getters)]
#[darling(default)]
#[getset(get = "pub(crate)")]
pub(crate) struct GXSArgs {
    /// Only publish field tables; the struct is meant to be extended by ghost types.
    ancestor: Flag,
    /// Path to a `fn() -> &'static ghostx::AccessorCache`.
    cache:    Option<syn::Path>,
}

impl GXSArgs {
    pub(crate) fn is_ancestor(&self) -> bool {
        self.ancestor.is_present()
    }
}
