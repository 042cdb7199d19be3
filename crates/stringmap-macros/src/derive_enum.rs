//! Implementation of `#[derive(MapEnum)]`.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Fields, parse_macro_input};

use crate::attrs::{TypeAttrs, VariantAttrs};

pub fn derive_enum_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match derive_enum_inner(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn derive_enum_inner(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;

    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(name, "MapEnum can only be derived for enums"));
    };
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "MapEnum does not support generic enums",
        ));
    }
    if data.variants.is_empty() {
        return Err(syn::Error::new_spanned(name, "MapEnum needs at least one variant"));
    }

    let attrs = TypeAttrs::from_attrs(&input.attrs)?;
    if attrs.constructor.is_some() {
        return Err(syn::Error::new_spanned(
            name,
            "`constructor` does not apply to enums",
        ));
    }
    let type_name = attrs.rename.unwrap_or_else(|| name.to_string());

    let mut members = Vec::new();
    let mut member_arms = Vec::new();

    for (index, variant) in data.variants.iter().enumerate() {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "MapEnum variants cannot carry data",
            ));
        }

        let ident = &variant.ident;
        let variant_name = VariantAttrs::from_attrs(&variant.attrs)?
            .rename
            .unwrap_or_else(|| ident.to_string());

        members.push(quote! {
            ::stringmap_core::EnumMember {
                name: #variant_name,
                ordinal: #name::#ident as i64,
                value: #name::#ident,
            }
        });
        member_arms.push(quote! { #name::#ident => &Self::VARIANTS[#index], });
    }

    Ok(quote! {
        impl ::stringmap_core::EnumShape for #name {
            const TYPE_NAME: &'static str = #type_name;
            const VARIANTS: &'static [::stringmap_core::EnumMember<Self>] = &[#(#members),*];

            fn member(&self) -> &'static ::stringmap_core::EnumMember<Self> {
                match self {
                    #(#member_arms)*
                }
            }
        }

        impl ::stringmap_core::Scalar for #name {
            fn parse_text(
                text: &str,
                format: ::core::option::Option<&str>,
            ) -> ::stringmap_core::Result<::core::option::Option<Self>> {
                ::stringmap_core::enums::parse_enum::<Self>(text, format)
            }

            fn to_value(&self) -> ::stringmap_core::Value {
                ::stringmap_core::enums::enum_to_value(self)
            }

            fn from_value(
                value: ::stringmap_core::Value,
            ) -> ::core::result::Result<Self, ::stringmap_core::ConversionError> {
                ::stringmap_core::enums::enum_from_value::<Self>(value)
            }

            fn type_name() -> &'static str {
                #type_name
            }
        }

        ::stringmap_core::impl_scalar_mappable!(#name);

        impl ::core::convert::From<#name> for ::stringmap_core::Value {
            fn from(value: #name) -> Self {
                ::stringmap_core::enums::enum_to_value(&value)
            }
        }
    })
}
