//! Type descriptors.
//!
//! A [`TypeShape`] lists the members a template can address and the
//! constructor the object builder calls. Shapes are normally produced by
//! `#[derive(Mappable)]`; scalars, `Option<T>` and tuples get theirs here.

use bitflags::bitflags;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use uuid::Uuid;

use crate::error::{MapError, Result};
use crate::scalar::{Scalar, parse_value};
use crate::value::Value;

/// Name that addresses a scalar target as a whole.
pub const SELF_KEYWORD: &str = "this";

/// Parses a captured substring into a member's value.
pub type ParseFn = fn(&str, Option<&str>) -> Result<Option<Value>>;

bitflags! {
    /// What the object builder may do with a member.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MemberFlags: u8 {
        const READ = 1 << 0;
        /// Assigned through [`Mappable::set_member`] after construction.
        const WRITE = 1 << 1;
    }
}

/// The normalized lookup key of a member or bag name.
///
/// ASCII lowercase with underscores removed, so `CurrencyPair`,
/// `currencypair` and `currency_pair` agree.
pub fn member_key(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[derive(Debug, Clone, Copy)]
pub struct MemberShape {
    pub name: &'static str,
    pub type_name: &'static str,
    pub flags: MemberFlags,
    pub parse: ParseFn,
}

impl MemberShape {
    pub fn of<T: Scalar>(name: &'static str, flags: MemberFlags) -> Self {
        MemberShape {
            name,
            type_name: T::type_name(),
            flags,
            parse: parse_value::<T>,
        }
    }

    pub fn key(&self) -> String {
        member_key(self.name)
    }

    pub fn is_writable(&self) -> bool {
        self.flags.contains(MemberFlags::WRITE)
    }
}

/// A constructor, as the ordered member names it takes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorShape {
    pub params: Vec<&'static str>,
}

impl ConstructorShape {
    pub fn new(params: Vec<&'static str>) -> Self {
        ConstructorShape { params }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    /// A single value addressed as `this`.
    Scalar,
    Record,
}

#[derive(Debug, Clone)]
pub struct TypeShape {
    pub name: &'static str,
    pub kind: ShapeKind,
    pub members: Vec<MemberShape>,
    pub constructors: Vec<ConstructorShape>,
}

impl TypeShape {
    /// Shape of a scalar: one `this` member taken by a one-argument constructor.
    pub fn scalar<T: Scalar>() -> Self {
        TypeShape {
            name: T::type_name(),
            kind: ShapeKind::Scalar,
            members: vec![MemberShape::of::<T>(SELF_KEYWORD, MemberFlags::READ)],
            constructors: vec![ConstructorShape::new(vec![SELF_KEYWORD])],
        }
    }

    pub fn record(
        name: &'static str,
        members: Vec<MemberShape>,
        constructors: Vec<ConstructorShape>,
    ) -> Self {
        TypeShape {
            name,
            kind: ShapeKind::Record,
            members,
            constructors,
        }
    }

    pub fn is_scalar(&self) -> bool {
        self.kind == ShapeKind::Scalar
    }

    /// Index of the member whose key matches `name`.
    pub fn member_index(&self, name: &str) -> Option<usize> {
        let key = member_key(name);
        self.members.iter().position(|m| m.key() == key)
    }
}

/// A type that can be built from, and read into, template fields.
pub trait Mappable: Sized {
    fn describe() -> TypeShape;

    /// Current value of the member at `index` in [`describe`](Mappable::describe).
    fn member_value(&self, index: usize) -> Value;

    /// Render the member at `index`; `Ok(None)` when it holds no value.
    fn render_member(&self, index: usize, format: Option<&str>) -> Result<Option<String>> {
        self.member_value(index).render(format)
    }

    /// Call the declared constructor with one value per parameter.
    fn construct(args: Vec<Value>) -> Result<Self>;

    /// Copy the fields no member covers from `source`, after the builder has
    /// constructed `self` over it.
    fn copy_unmapped(&mut self, source: &Self) {
        let _ = source;
    }

    /// Assign a `WRITE` member after construction.
    fn set_member(&mut self, index: usize, value: Value) -> Result<()> {
        let _ = value;
        Err(MapError::unsupported_shape(
            Self::describe().name,
            format!("member {index} is not settable"),
        ))
    }
}

// ============================================================================
// Helpers for generated code
// ============================================================================

/// Next constructor argument; `Null` once the list runs out.
pub fn take_arg(args: &mut std::vec::IntoIter<Value>) -> Value {
    args.next().unwrap_or_default()
}

/// Convert a value for `member`, tagging errors with the member name.
pub fn convert_member<T: Scalar>(member: &str, value: Value) -> Result<T> {
    T::from_value(value).map_err(|source| MapError::conversion(member, source))
}

pub fn construct_scalar<T: Scalar>(args: Vec<Value>) -> Result<T> {
    convert_member(SELF_KEYWORD, args.into_iter().next().unwrap_or_default())
}

/// Implement [`Mappable`] for [`Scalar`] types as a single `this` member.
#[macro_export]
macro_rules! impl_scalar_mappable {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Mappable for $ty {
                fn describe() -> $crate::TypeShape {
                    $crate::TypeShape::scalar::<$ty>()
                }

                fn member_value(&self, _index: usize) -> $crate::Value {
                    $crate::Scalar::to_value(self)
                }

                fn render_member(
                    &self,
                    _index: usize,
                    format: ::core::option::Option<&str>,
                ) -> $crate::Result<::core::option::Option<::std::string::String>> {
                    $crate::Scalar::render_text(self, format)
                }

                fn construct(
                    args: ::std::vec::Vec<$crate::Value>,
                ) -> $crate::Result<Self> {
                    $crate::shape::construct_scalar(args)
                }
            }
        )+
    };
}

impl_scalar_mappable!(
    String,
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    isize,
    u8,
    u16,
    u32,
    u64,
    usize,
    f32,
    f64,
    Uuid,
    NaiveDateTime,
    DateTime<Utc>,
    NaiveDate,
);

impl<T: Scalar> Mappable for Option<T> {
    fn describe() -> TypeShape {
        TypeShape::scalar::<Self>()
    }

    fn member_value(&self, _index: usize) -> Value {
        self.to_value()
    }

    fn render_member(&self, _index: usize, format: Option<&str>) -> Result<Option<String>> {
        self.render_text(format)
    }

    fn construct(args: Vec<Value>) -> Result<Self> {
        construct_scalar(args)
    }
}

macro_rules! impl_tuple_mappable {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: Scalar),+> Mappable for ($($name,)+) {
            fn describe() -> TypeShape {
                TypeShape::record(
                    std::any::type_name::<Self>(),
                    vec![$(MemberShape::of::<$name>(stringify!($idx), MemberFlags::READ)),+],
                    vec![ConstructorShape::new(vec![$(stringify!($idx)),+])],
                )
            }

            fn member_value(&self, index: usize) -> Value {
                match index {
                    $($idx => self.$idx.to_value(),)+
                    _ => Value::Null,
                }
            }

            fn render_member(&self, index: usize, format: Option<&str>) -> Result<Option<String>> {
                match index {
                    $($idx => self.$idx.render_text(format),)+
                    _ => Ok(None),
                }
            }

            fn construct(args: Vec<Value>) -> Result<Self> {
                let mut args = args.into_iter();
                Ok(($(convert_member::<$name>(stringify!($idx), take_arg(&mut args))?,)+))
            }
        }
    };
}

impl_tuple_mappable!(A: 0, B: 1);
impl_tuple_mappable!(A: 0, B: 1, C: 2);
impl_tuple_mappable!(A: 0, B: 1, C: 2, D: 3);
impl_tuple_mappable!(A: 0, B: 1, C: 2, D: 3, E: 4);
impl_tuple_mappable!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
