#![doc(html_root_url = "https://docs.rs/ghostx_aux/")]
//! # ghostx_aux
//!
//! Attribute argument types for the [`ghostx`] crate's proc-macro, usable by 3rd party crates extending it.
//!
//! The types implement [`darling::FromMeta`] and can be used directly as fields of `darling` receivers:
//!
//! ```ignore
//! #[derive(FromField)]
//! #[darling(attributes(ghost))]
//! struct MyField {
//!     ident: Option<syn::Ident>,
//!     ty:    syn::Type,
//!     #[darling(rename = "default")]
//!     default_value: Option<GXDefault>,
//! }
//! ```
//!
//! [`ghostx`]: https://docs.rs/ghostx

pub mod default_arg;
pub mod visibility;

pub use crate::{default_arg::GXDefault, visibility::GXVisibility};
