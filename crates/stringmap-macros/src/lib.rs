//! stringmap derive macros
//!
//! # Macros
//!
//! - `#[derive(Mappable)]` - Describe a struct's members and constructor
//! - `#[derive(MapEnum)]` - Map a fieldless enum to a template field
//!
//! Generated code refers to `::stringmap_core`, so the deriving crate needs
//! it as a dependency.
//!
//! # Example
//!
//! ```ignore
//! use stringmap::{MapEnum, Mappable};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, MapEnum)]
//! pub enum Exchange {
//!     BitStamp,
//!     Gdax,
//! }
//!
//! #[derive(Debug, Clone, PartialEq, Mappable)]
//! pub struct OrderBookKey {
//!     pub exchange: Exchange,
//!     pub currency_pair: String,
//!     #[stringmap(set)]
//!     pub depth: Option<u32>,
//! }
//! ```

use proc_macro::TokenStream;

mod attrs;
mod derive_enum;
mod derive_mappable;

/// Derive `Mappable` for a struct.
///
/// Every field becomes a member and, in declaration order, a parameter of
/// the constructor. Field types must implement `Scalar`.
///
/// # Attributes
///
/// - `#[stringmap(rename = "...")]` - Override the type name
/// - `#[stringmap(constructor = "path")]` - Build through an associated
///   function taking the constructor fields in order
///
/// # Field Attributes
///
/// - `#[stringmap(rename = "...")]` - Override the member name
/// - `#[stringmap(set)]` - Assign after construction instead of passing to the constructor
/// - `#[stringmap(skip)]` - Not a member; built from `Default`, or cloned from the
///   source when building over an existing value (the field type must be `Clone`)
///
/// Tuple-struct members are named `0`, `1`, ...
#[proc_macro_derive(Mappable, attributes(stringmap))]
pub fn derive_mappable(input: TokenStream) -> TokenStream {
    derive_mappable::derive_mappable_impl(input)
}

/// Derive `EnumShape`, `Scalar` and `Mappable` for a fieldless `Copy` enum.
///
/// # Variant Attributes
///
/// - `#[stringmap(rename = "...")]` - Override the identifier used in templates
#[proc_macro_derive(MapEnum, attributes(stringmap))]
pub fn derive_map_enum(input: TokenStream) -> TokenStream {
    derive_enum::derive_enum_impl(input)
}
