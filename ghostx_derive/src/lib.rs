mod codegen;
mod fields;
mod input_receiver;
mod util;

use darling::{ast, FromDeriveInput, FromMeta};
use syn::{parse_macro_input, DeriveInput};

use crate::{input_receiver::GXInputReceiver, util::args::GXSArgs};

/// Turn a struct into a lazy-loading ghost type, or, with `#[ghost(ancestor)]`, into a type ghosts can extend.
///
/// See the `ghostx` crate documentation for the arguments.
#[proc_macro_attribute]
pub fn ghost(args: proc_macro::TokenStream, input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let attr_args = match ast::NestedMeta::parse_meta_list(args.into()) {
        Ok(v) => v,
        Err(e) => {
            return darling::Error::from(e).write_errors().into();
        }
    };

    let args = match GXSArgs::from_list(&attr_args) {
        Ok(v) => v,
        Err(e) => return e.write_errors().into(),
    };

    let input_ast = parse_macro_input!(input as DeriveInput);
    let gx = match GXInputReceiver::from_derive_input(&input_ast) {
        Ok(v) => v,
        Err(e) => return e.write_errors().into(),
    };

    codegen::GXRewriter::new(gx, args).rewrite().into()
}
