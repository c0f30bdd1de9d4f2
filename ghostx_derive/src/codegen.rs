use crate::{fields::GXField, input_receiver::GXInputReceiver, util::args::GXSArgs, util::STATE_FIELD};
use proc_macro2::{Group, TokenStream, TokenTree};
use quote::{format_ident, quote, quote_spanned, ToTokens};
use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};
use syn::spanned::Spanned;

pub(crate) struct GXRewriter {
    input: GXInputReceiver,
    args:  GXSArgs,
}

impl GXRewriter {
    pub(crate) fn new(input: GXInputReceiver, args: GXSArgs) -> Self {
        Self { input, args }
    }

    pub(crate) fn rewrite(&self) -> TokenStream {
        if let Err(err) = self.validate() {
            return err.write_errors();
        }

        let struct_decl = self.struct_decl();
        let fields_impl = self.ghost_fields_impl();
        let object_impl = if self.args.is_ancestor() {
            quote![]
        }
        else {
            self.ghost_object_impl()
        };

        quote![
            #struct_decl
            #fields_impl
            #object_impl
        ]
    }

    fn validate(&self) -> darling::Result<()> {
        let mut errors = darling::Error::accumulator();
        let is_ancestor = self.args.is_ancestor();

        if self.input.has_generics() {
            let generics = self.input.generics();
            let span = generics.params.first().map_or_else(|| generics.span(), |p| p.span());
            errors.push(darling::Error::custom("Generic structs cannot be ghosts").with_span(&span));
        }

        let mut extends = self.input.fields().into_iter().filter(|f| f.is_extends());
        let _ = extends.next();
        for extra in extends {
            errors.push(darling::Error::custom("Only one field can hold the parent type").with_span(&extra.span()));
        }

        for field in self.input.fields() {
            errors.handle(field.validate(is_ancestor));
        }

        if is_ancestor {
            if let Some(cache) = self.args.cache() {
                errors.push(
                    darling::Error::custom("Ancestor types don't own an accessor cache").with_span(&cache.span()),
                );
            }
        }

        errors.finish()
    }

    fn ident(&self) -> &syn::Ident {
        self.input.ident()
    }

    fn state_ident(&self) -> syn::Ident {
        format_ident!("{}", STATE_FIELD)
    }

    fn parent_field(&self) -> Option<&GXField> {
        self.input.fields().into_iter().find(|f| f.is_extends())
    }

    /// Fields published in the accessor table.
    fn tracked_fields(&self) -> Vec<&GXField> {
        self.input
            .fields()
            .into_iter()
            .filter(|f| !(f.is_extends() || f.is_skipped()))
            .collect()
    }

    // Nested helper fns can't use `Self`, the struct name must be spelled out.
    fn fixup_self_type(&self, tokens: TokenStream) -> TokenStream {
        let ident = self.ident();
        tokens
            .into_iter()
            .map(|tt| match tt {
                TokenTree::Ident(ref i) if i == "Self" => {
                    let mut ident = ident.clone();
                    ident.set_span(i.span());
                    TokenTree::Ident(ident)
                }
                TokenTree::Group(group) => {
                    let mut new_group = Group::new(group.delimiter(), self.fixup_self_type(group.stream()));
                    new_group.set_span(group.span());
                    TokenTree::Group(new_group)
                }
                other => other,
            })
            .collect()
    }

    fn default_tokens(&self, field: &GXField) -> TokenStream {
        let span = field.span();
        field
            .default_value()
            .as_ref()
            .and_then(|dv| dv.value_tokens())
            .unwrap_or_else(|| quote_spanned![span=> ::std::default::Default::default()])
    }

    fn struct_decl(&self) -> TokenStream {
        let attrs = self.input.struct_attrs();
        let vis = self.input.vis();
        let ident = self.ident();

        let fields = self.input.fields().into_iter().map(|f| {
            let fattrs = f.foreign_attrs();
            let fvis = f.vis();
            let fident = f.ident_tokens();
            let fty = f.ty();
            quote_spanned![f.span()=> #fattrs #fvis #fident: #fty]
        });

        let state = if self.args.is_ancestor() {
            quote![]
        }
        else {
            let state_ident = self.state_ident();
            quote![
                #[doc(hidden)]
                #state_ident: ::ghostx::GhostState<#ident>,
            ]
        };

        quote![
            #attrs
            #vis struct #ident {
                #( #fields, )*
                #state
            }
        ]
    }

    fn descriptor(&self, field: &GXField) -> TokenStream {
        let span = field.span();
        let ident = self.ident();
        let fident = field.ident_tokens();
        let fname = field.name();
        let fty = self.fixup_self_type(field.ty().to_token_stream());
        let default_value = self.fixup_self_type(self.default_tokens(field));
        let visibility = format_ident!("{}", field.visibility().variant_name());

        let field_default = match field.default_value().as_ref().and_then(|dv| dv.literal()) {
            Some(literal) => quote_spanned![span=> ::ghostx::FieldDefault::declared(#literal, make_default)],
            None => quote_spanned![span=> ::ghostx::FieldDefault::empty(make_default)],
        };

        quote_spanned![span=>
            {
                fn project(this: &mut dyn ::std::any::Any) -> ::std::option::Option<&mut dyn ::std::any::Any> {
                    this.downcast_mut::<#ident>().map(|this| &mut this.#fident as &mut dyn ::std::any::Any)
                }
                fn make_default() -> ::std::boxed::Box<dyn ::std::any::Any> {
                    let value: #fty = #default_value;
                    ::std::boxed::Box::new(value)
                }
                ::ghostx::FieldDescriptor::new::<#fty>(
                    #fname,
                    declaring,
                    ::ghostx::FieldVisibility::#visibility,
                    #field_default,
                    project,
                )
            }
        ]
    }

    fn ghost_fields_impl(&self) -> TokenStream {
        let ident = self.ident();
        let descriptors = self.tracked_fields().into_iter().map(|f| self.descriptor(f));

        let parent = match self.parent_field() {
            Some(pf) => {
                let pty = pf.ty();
                quote![::std::option::Option::Some(::ghostx::DeclaringType::of::<#pty>())]
            }
            None => quote![::std::option::Option::None],
        };

        let blank_fields = self.input.fields().into_iter().map(|f| {
            let fident = f.ident_tokens();
            let fty = f.ty();
            let value = if f.is_extends() && f.default_value().is_none() {
                quote_spanned![f.span()=> <#fty as ::ghostx::GhostFields>::ghost_blank()]
            }
            else {
                self.default_tokens(f)
            };
            quote![#fident: #value]
        });

        let blank_state = if self.args.is_ancestor() {
            quote![]
        }
        else {
            let state_ident = self.state_ident();
            quote![#state_ident: ::ghostx::GhostState::idle(),]
        };

        let delegate = match self.parent_field() {
            Some(pf) => {
                let pident = pf.ident_tokens();
                quote![::ghostx::GhostFields::ghost_ancestor_mut(&mut self.#pident, declaring)]
            }
            None => quote![::std::option::Option::None],
        };

        quote![
            impl ::ghostx::GhostFields for #ident {
                fn ghost_declared_fields() -> ::std::vec::Vec<::ghostx::FieldDescriptor> {
                    #[allow(unused_variables)]
                    let declaring = ::ghostx::DeclaringType::of::<#ident>();
                    ::std::vec![ #( #descriptors ),* ]
                }

                fn ghost_parent() -> ::std::option::Option<::ghostx::DeclaringType> {
                    #parent
                }

                fn ghost_blank() -> Self {
                    Self {
                        #( #blank_fields, )*
                        #blank_state
                    }
                }

                fn ghost_ancestor_mut(
                    &mut self,
                    declaring: ::std::any::TypeId,
                ) -> ::std::option::Option<&mut dyn ::std::any::Any> {
                    if declaring == ::std::any::TypeId::of::<Self>() {
                        return ::std::option::Option::Some(self as &mut dyn ::std::any::Any);
                    }
                    #delegate
                }
            }
        ]
    }

    // Name the routine uniquely so it can't clash with user methods.
    fn routine_ident(&self) -> syn::Ident {
        let mut hasher = DefaultHasher::new();
        self.ident().to_string().hash(&mut hasher);
        for field in self.input.fields() {
            field.name().hash(&mut hasher);
        }
        format_ident!("__ghostx_call_initializer_{:016x}", hasher.finish())
    }

    fn cache_expr(&self) -> TokenStream {
        match self.args.cache() {
            Some(path) => quote_spanned![path.span()=> #path()],
            None => quote![::ghostx::AccessorCache::global()],
        }
    }

    fn getters(&self) -> TokenStream {
        let routine = self.routine_ident();
        let mut getters = TokenStream::new();

        for field in self.tracked_fields() {
            let span = field.span();
            let vis = field.vis();
            let fident = field.ident_tokens();
            let fty = field.ty();

            if field.needs_getter() {
                let getter = field.getter_ident();
                let member = getter.to_string();
                getters.extend(quote_spanned![span=>
                    #vis fn #getter(&mut self) -> ::std::result::Result<&#fty, ::ghostx::GhostError> {
                        self.#routine(#member, &[])?;
                        ::std::result::Result::Ok(&self.#fident)
                    }
                ]);
            }

            if field.needs_getter_mut() {
                let getter = field.getter_mut_ident();
                let member = getter.to_string();
                getters.extend(quote_spanned![span=>
                    #vis fn #getter(&mut self) -> ::std::result::Result<&mut #fty, ::ghostx::GhostError> {
                        self.#routine(#member, &[])?;
                        ::std::result::Result::Ok(&mut self.#fident)
                    }
                ]);
            }
        }

        getters
    }

    fn ghost_object_impl(&self) -> TokenStream {
        let ident = self.ident();
        let state_ident = self.state_ident();
        let routine = self.routine_ident();
        let cache = self.cache_expr();
        let getters = self.getters();

        quote![
            impl #ident {
                #[inline]
                fn #routine(
                    &mut self,
                    member: &str,
                    arguments: &[&dyn ::std::any::Any],
                ) -> ::std::result::Result<(), ::ghostx::GhostError> {
                    ::ghostx::call_initializer(self, member, arguments, #cache)
                }

                #getters
            }

            impl ::ghostx::GhostObject for #ident {
                fn ghost_state(&self) -> &::ghostx::GhostState<Self> {
                    &self.#state_ident
                }

                fn ghost_state_mut(&mut self) -> &mut ::ghostx::GhostState<Self> {
                    &mut self.#state_ident
                }

                fn ghost_load(
                    &mut self,
                    member: &str,
                    arguments: &[&dyn ::std::any::Any],
                ) -> ::std::result::Result<(), ::ghostx::GhostError> {
                    self.#routine(member, arguments)
                }
            }
        ]
    }
}
