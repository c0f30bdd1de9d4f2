//! Default value.

use darling::FromMeta;
use getset::Getters;
use proc_macro2::{Span, TokenStream};
use quote::{quote_spanned, ToTokens};
use syn::{parse2, spanned::Spanned, ExprCall, Meta};

/// Default value argument.
///
/// Looks like `default(42)`, `default = "text"`, or `default(Type::func())`. A bare `default` means the type's
/// `Default::default()`.
#[derive(Debug, Clone, Getters)]
pub struct GXDefault {
    /// The default value literal or expression.
    value: Option<syn::Expr>,
    /// The original tokens used to produce this object.
    #[getset(get = "pub")]
    orig:  Option<TokenStream>,
}

impl GXDefault {
    /// True if a value is explicitly specified.
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    pub fn value(&self) -> Option<&syn::Expr> {
        self.value.as_ref()
    }

    pub fn is_str(&self) -> bool {
        if let Some(syn::Expr::Lit(lit)) = &self.value {
            if let syn::Lit::Str(_) = lit.lit {
                return true;
            }
        }
        false
    }

    /// Source text of the value, the way it would be written in Rust code.
    pub fn literal(&self) -> Option<String> {
        self.value.as_ref().map(|v| v.to_token_stream().to_string())
    }

    pub fn span(&self) -> Span {
        self.orig.as_ref().map_or_else(Span::call_site, |o| o.span())
    }

    /// The value expression ready to be assigned to a field. String literals are turned into `String`.
    pub fn value_tokens(&self) -> Option<TokenStream> {
        let value = self.value.as_ref()?;
        let span = value.span();
        Some(if self.is_str() {
            quote_spanned![span=> ::std::string::String::from(#value)]
        }
        else {
            quote_spanned![span=> #value]
        })
    }

    fn from_call_like(call: ExprCall) -> darling::Result<Self> {
        match call.args.len() {
            0 => Err(darling::Error::too_few_items(1).with_span(&call)),
            1 => Ok(Self {
                value: Some(call.args[0].clone()),
                orig:  Some(call.to_token_stream()),
            }),
            _ => Err(darling::Error::too_many_items(1).with_span(&call.args[1].span())),
        }
    }
}

impl FromMeta for GXDefault {
    fn from_meta(item: &Meta) -> darling::Result<Self> {
        match item {
            Meta::Path(path) => Ok(Self {
                value: None,
                orig:  Some(path.to_token_stream()),
            }),
            Meta::List(_list) => {
                let syn::Expr::Call(expr) = parse2(item.to_token_stream())?
                else {
                    return Err(darling::Error::custom("Expected call-like syntax default(...)").with_span(item));
                };
                Self::from_call_like(expr)
            }
            Meta::NameValue(name_value) => Ok(Self {
                value: Some(name_value.value.clone()),
                orig:  Some(name_value.to_token_stream()),
            }),
        }
    }
}

impl TryFrom<&GXDefault> for String {
    type Error = darling::Error;

    fn try_from(dv: &GXDefault) -> darling::Result<Self> {
        if let Some(syn::Expr::Lit(lit)) = &dv.value {
            if let syn::Lit::Str(str) = &lit.lit {
                return Ok(str.value());
            }
        }
        Err(darling::Error::custom("The default value must be a string").with_span(&dv.span()))
    }
}

impl ToTokens for GXDefault {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        if let Some(value) = &self.value {
            tokens.extend(value.to_token_stream());
        }
    }
}
