//! Field visibility as seen by the ghost machinery.

use syn::Visibility;

/// Coarse classification of a field's declared visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GXVisibility {
    Public,
    Crate,
    Restricted,
    Private,
}

impl GXVisibility {
    /// The name of the matching `ghostx::FieldVisibility` variant.
    pub fn variant_name(&self) -> &'static str {
        match self {
            GXVisibility::Public => "Public",
            GXVisibility::Crate => "Crate",
            GXVisibility::Restricted => "Restricted",
            GXVisibility::Private => "Private",
        }
    }
}

impl From<&Visibility> for GXVisibility {
    fn from(vis: &Visibility) -> Self {
        match vis {
            Visibility::Public(_) => GXVisibility::Public,
            Visibility::Restricted(restricted) => {
                if restricted.path.is_ident("crate") {
                    GXVisibility::Crate
                }
                else if restricted.path.is_ident("self") {
                    GXVisibility::Private
                }
                else {
                    GXVisibility::Restricted
                }
            }
            Visibility::Inherited => GXVisibility::Private,
        }
    }
}
