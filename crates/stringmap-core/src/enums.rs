//! Enum coercion.
//!
//! An enum field is spelled according to a one-letter format:
//!
//! - `t` (or no format): train-case, `ExchangeType::BitStamp` ⇄ `bit-stamp`
//! - `p`: the identifier itself, `BitStamp`
//! - `c`: camelCase, `bitStamp`
//! - `i`: the integral value, `2`
//!
//! Letters are case-insensitive. Any other format is an error.

use crate::error::{ConversionError, MapError, Result};
use crate::naming;
use crate::value::{EnumValue, Value};

/// One variant of a mapped enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumMember<T: 'static> {
    pub name: &'static str,
    pub ordinal: i64,
    pub value: T,
}

/// Variant table of a fieldless enum, usually from `#[derive(MapEnum)]`.
pub trait EnumShape: Copy + Sized + 'static {
    const TYPE_NAME: &'static str;
    const VARIANTS: &'static [EnumMember<Self>];

    /// The table entry for `self`.
    fn member(&self) -> &'static EnumMember<Self>;

    /// The variant with ordinal 0, else the first declared.
    fn default_variant() -> Option<Self> {
        Self::VARIANTS
            .iter()
            .find(|m| m.ordinal == 0)
            .or_else(|| Self::VARIANTS.first())
            .map(|m| m.value)
    }
}

/// How an enum is spelled in a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumMode {
    Train,
    Pascal,
    Camel,
    Integral,
}

impl EnumMode {
    pub fn from_format(format: Option<&str>, type_name: &'static str) -> Result<Self> {
        match format.map(str::trim) {
            None | Some("") | Some("t") | Some("T") => Ok(EnumMode::Train),
            Some("p") | Some("P") => Ok(EnumMode::Pascal),
            Some("c") | Some("C") => Ok(EnumMode::Camel),
            Some("i") | Some("I") => Ok(EnumMode::Integral),
            Some(other) => Err(MapError::unsupported_format(
                other,
                type_name,
                "enum formats are `t`, `p`, `c` or `i`",
            )),
        }
    }
}

pub fn render_enum(value: &EnumValue, format: Option<&str>) -> Result<String> {
    let text = match EnumMode::from_format(format, value.type_name)? {
        EnumMode::Train => naming::pascal_to_train(value.name),
        EnumMode::Pascal => value.name.to_string(),
        EnumMode::Camel => naming::pascal_to_camel(value.name),
        EnumMode::Integral => value.ordinal.to_string(),
    };
    Ok(text)
}

fn find_by_text<T: EnumShape>(text: &str, mode: EnumMode) -> Option<T> {
    let found = match mode {
        EnumMode::Pascal => T::VARIANTS.iter().find(|m| m.name == text),
        EnumMode::Integral => {
            let ordinal = text.parse::<i64>().ok()?;
            T::VARIANTS.iter().find(|m| m.ordinal == ordinal)
        }
        EnumMode::Train => {
            let pascal = naming::train_to_pascal(text);
            T::VARIANTS
                .iter()
                .find(|m| m.name == pascal)
                .or_else(|| T::VARIANTS.iter().find(|m| naming::pascal_to_train(m.name) == text))
        }
        EnumMode::Camel => {
            let pascal = naming::camel_to_pascal(text);
            T::VARIANTS
                .iter()
                .find(|m| m.name == pascal)
                .or_else(|| T::VARIANTS.iter().find(|m| naming::pascal_to_camel(m.name) == text))
        }
    };
    found.map(|m| m.value)
}

/// Parse `text` as a variant of `T`.
pub fn parse_enum<T: EnumShape>(text: &str, format: Option<&str>) -> Result<Option<T>> {
    let mode = EnumMode::from_format(format, T::TYPE_NAME)?;
    Ok(find_by_text(text, mode))
}

pub fn enum_to_value<T: EnumShape>(value: &T) -> Value {
    let member = value.member();
    Value::Enum(EnumValue {
        type_name: T::TYPE_NAME,
        name: member.name,
        ordinal: member.ordinal,
    })
}

/// Convert a bag value into a variant of `T`.
///
/// Accepts the enum itself, its ordinal, or its train-case or identifier text.
pub fn enum_from_value<T: EnumShape>(value: Value) -> std::result::Result<T, ConversionError> {
    let invalid = |what: String| ConversionError::Invalid(format!("{what} is not a {}", T::TYPE_NAME));

    match value {
        Value::Null => T::default_variant().ok_or_else(|| invalid("null".to_string())),
        Value::Enum(e) if e.type_name == T::TYPE_NAME => T::VARIANTS
            .iter()
            .find(|m| m.name == e.name)
            .map(|m| m.value)
            .ok_or_else(|| invalid(e.name.to_string())),
        Value::Str(s) => find_by_text(&s, EnumMode::Train)
            .or_else(|| find_by_text(&s, EnumMode::Pascal))
            .ok_or_else(|| invalid(format!("`{s}`"))),
        other => match other.as_i128() {
            Some(n) => T::VARIANTS
                .iter()
                .find(|m| i128::from(m.ordinal) == n)
                .map(|m| m.value)
                .ok_or_else(|| invalid(n.to_string())),
            None => Err(ConversionError::TypeMismatch {
                expected: T::TYPE_NAME,
                found: other.kind_name(),
            }),
        },
    }
}
