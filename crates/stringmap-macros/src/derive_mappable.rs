//! Implementation of `#[derive(Mappable)]`.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Fields, GenericParam, Member, Type, parse_macro_input, parse_quote};

use crate::attrs::{FieldAttrs, TypeAttrs};

pub fn derive_mappable_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match derive_mappable_inner(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Role {
    /// Passed to the constructor
    Param,
    /// Assigned after construction
    Settable,
    Skipped,
}

struct FieldInfo {
    access: Member,
    name: String,
    ty: Type,
    role: Role,
}

fn collect_fields(fields: &Fields) -> syn::Result<Vec<FieldInfo>> {
    let mut infos = Vec::new();

    for (i, field) in fields.iter().enumerate() {
        let attrs = FieldAttrs::from_attrs(&field.attrs)?;
        if attrs.skip && (attrs.set || attrs.rename.is_some()) {
            return Err(syn::Error::new_spanned(
                field,
                "`skip` cannot be combined with other stringmap attributes",
            ));
        }

        let access = match &field.ident {
            Some(ident) => Member::Named(ident.clone()),
            None => Member::Unnamed(i.into()),
        };
        let default_name = match &field.ident {
            Some(ident) => ident.to_string(),
            None => i.to_string(),
        };

        infos.push(FieldInfo {
            access,
            name: attrs.rename.unwrap_or(default_name),
            ty: field.ty.clone(),
            role: if attrs.skip {
                Role::Skipped
            } else if attrs.set {
                Role::Settable
            } else {
                Role::Param
            },
        });
    }

    Ok(infos)
}

fn derive_mappable_inner(mut input: DeriveInput) -> syn::Result<TokenStream2> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Mappable can only be derived for structs; use MapEnum for enums",
        ));
    };

    let attrs = TypeAttrs::from_attrs(&input.attrs)?;
    let name = &input.ident;
    let type_name = attrs.rename.clone().unwrap_or_else(|| name.to_string());
    let fields = collect_fields(&data.fields)?;

    // Members are the non-skipped fields, indexed in declaration order
    let members: Vec<&FieldInfo> = fields.iter().filter(|f| f.role != Role::Skipped).collect();

    let member_shapes = members.iter().map(|f| {
        let member_name = &f.name;
        let ty = &f.ty;
        let flags = match f.role {
            Role::Settable => quote! {
                ::stringmap_core::MemberFlags::READ | ::stringmap_core::MemberFlags::WRITE
            },
            _ => quote! { ::stringmap_core::MemberFlags::READ },
        };
        quote! { ::stringmap_core::MemberShape::of::<#ty>(#member_name, #flags) }
    });

    let params: Vec<&FieldInfo> = members.iter().copied().filter(|f| f.role == Role::Param).collect();
    let param_names = params.iter().map(|f| &f.name);

    let value_arms = members.iter().enumerate().map(|(index, f)| {
        let access = &f.access;
        quote! { #index => ::stringmap_core::Scalar::to_value(&self.#access), }
    });

    let render_arms = members.iter().enumerate().map(|(index, f)| {
        let access = &f.access;
        quote! { #index => ::stringmap_core::Scalar::render_text(&self.#access, format), }
    });

    let construct_body = generate_construct(&data.fields, &fields, &attrs)?;
    let set_member = generate_set_member(&members, &type_name);
    let copy_unmapped = generate_copy_unmapped(&fields, &attrs);

    for param in input.generics.params.iter_mut() {
        if let GenericParam::Type(ty) = param {
            ty.bounds.push(parse_quote!(::stringmap_core::Scalar));
        }
    }
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::stringmap_core::Mappable for #name #ty_generics #where_clause {
            fn describe() -> ::stringmap_core::TypeShape {
                ::stringmap_core::TypeShape::record(
                    #type_name,
                    ::std::vec![#(#member_shapes),*],
                    ::std::vec![::stringmap_core::ConstructorShape::new(::std::vec![#(#param_names),*])],
                )
            }

            fn member_value(&self, index: usize) -> ::stringmap_core::Value {
                match index {
                    #(#value_arms)*
                    _ => ::stringmap_core::Value::Null,
                }
            }

            #[allow(unused_variables)]
            fn render_member(
                &self,
                index: usize,
                format: ::core::option::Option<&str>,
            ) -> ::stringmap_core::Result<::core::option::Option<::std::string::String>> {
                match index {
                    #(#render_arms)*
                    _ => ::core::result::Result::Ok(::core::option::Option::None),
                }
            }

            fn construct(
                args: ::std::vec::Vec<::stringmap_core::Value>,
            ) -> ::stringmap_core::Result<Self> {
                #construct_body
            }

            #set_member

            #copy_unmapped
        }
    })
}

/// `Mappable::copy_unmapped` cloning skipped fields, or nothing.
///
/// A custom constructor computes skipped fields itself, so they are left as built.
fn generate_copy_unmapped(fields: &[FieldInfo], attrs: &TypeAttrs) -> TokenStream2 {
    if attrs.constructor.is_some() {
        return TokenStream2::new();
    }

    let copies: Vec<_> = fields
        .iter()
        .filter(|f| f.role == Role::Skipped)
        .map(|f| {
            let access = &f.access;
            quote! { self.#access = ::core::clone::Clone::clone(&source.#access); }
        })
        .collect();
    if copies.is_empty() {
        return TokenStream2::new();
    }

    quote! {
        fn copy_unmapped(&mut self, source: &Self) {
            #(#copies)*
        }
    }
}

/// Body of `Mappable::construct`.
fn generate_construct(
    shape: &Fields,
    fields: &[FieldInfo],
    attrs: &TypeAttrs,
) -> syn::Result<TokenStream2> {
    let locals: Vec<_> = (0..fields.len()).map(|i| format_ident!("__field{}", i)).collect();

    // A custom constructor builds every non-parameter field itself
    let bound = fields
        .iter()
        .zip(&locals)
        .filter(|(f, _)| attrs.constructor.is_none() || f.role == Role::Param);

    let bindings = bound.map(|(f, local)| {
        let ty = &f.ty;
        let member_name = &f.name;
        match f.role {
            Role::Param => quote! {
                let #local: #ty = ::stringmap_core::shape::convert_member::<#ty>(
                    #member_name,
                    ::stringmap_core::shape::take_arg(&mut args),
                )?;
            },
            Role::Settable => quote! {
                let #local: #ty = ::stringmap_core::shape::convert_member::<#ty>(
                    #member_name,
                    ::stringmap_core::Value::Null,
                )?;
            },
            Role::Skipped => quote! {
                let #local: #ty = ::core::default::Default::default();
            },
        }
    });

    let build = if let Some(path) = &attrs.constructor {
        let args = fields
            .iter()
            .zip(&locals)
            .filter(|(f, _)| f.role == Role::Param)
            .map(|(_, local)| local);
        quote! {
            ::core::result::Result::Ok(#path(#(#args),*))
        }
    } else {
        match shape {
            Fields::Named(_) => {
                let inits = fields.iter().zip(&locals).map(|(f, local)| {
                    let access = &f.access;
                    quote! { #access: #local }
                });
                quote! { ::core::result::Result::Ok(Self { #(#inits),* }) }
            }
            Fields::Unnamed(_) => {
                quote! { ::core::result::Result::Ok(Self(#(#locals),*)) }
            }
            Fields::Unit => quote! { ::core::result::Result::Ok(Self) },
        }
    };

    Ok(quote! {
        #[allow(unused_mut, unused_variables)]
        let mut args = args.into_iter();
        #(#bindings)*
        #build
    })
}

/// `Mappable::set_member` for settable members, or nothing.
fn generate_set_member(members: &[&FieldInfo], type_name: &str) -> TokenStream2 {
    if !members.iter().any(|f| f.role == Role::Settable) {
        return TokenStream2::new();
    }

    let arms = members
        .iter()
        .enumerate()
        .filter(|(_, f)| f.role == Role::Settable)
        .map(|(index, f)| {
            let access = &f.access;
            let ty = &f.ty;
            let member_name = &f.name;
            quote! {
                #index => {
                    self.#access = ::stringmap_core::shape::convert_member::<#ty>(#member_name, value)?;
                    ::core::result::Result::Ok(())
                }
            }
        });

    quote! {
        fn set_member(
            &mut self,
            index: usize,
            value: ::stringmap_core::Value,
        ) -> ::stringmap_core::Result<()> {
            match index {
                #(#arms)*
                _ => ::core::result::Result::Err(::stringmap_core::MapError::unsupported_shape(
                    #type_name,
                    ::std::format!("member {index} is not settable"),
                )),
            }
        }
    }
}
