//! Core types for stringmap.
//!
//! - [`Value`] and [`ValueBag`]: dynamic field values
//! - [`Scalar`]: parsing, rendering and converting a single field
//! - [`TypeShape`] and [`Mappable`]: the member/constructor descriptor of a target type
//! - [`MapError`]: the error taxonomy shared by every crate in the workspace

pub mod convertible;
pub mod datetime;
pub mod enums;
pub mod error;
pub mod guid;
pub mod naming;
pub mod numeric;
pub mod scalar;
pub mod shape;
pub mod value;

pub use convertible::{ConvertibleFromString, ConvertibleToString};
pub use enums::{EnumMember, EnumMode, EnumShape};
pub use error::{ConversionError, MapError, Result, TemplateErrorKind};
pub use scalar::Scalar;
pub use shape::{
    ConstructorShape, Mappable, MemberFlags, MemberShape, ParseFn, SELF_KEYWORD, ShapeKind,
    TypeShape, member_key,
};
pub use value::{EnumValue, Value, ValueBag};
