//! Dynamic values moved between templates and typed members.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use ordered_float::OrderedFloat;
use rustc_hash::FxHashMap;
use uuid::Uuid;

use crate::error::{MapError, Result};
use crate::numeric::IntWidth;
use crate::{datetime, enums, guid, numeric};

/// An enum member captured as a dynamic value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    pub type_name: &'static str,
    /// Identifier of the variant, as declared (or renamed).
    pub name: &'static str,
    pub ordinal: i64,
}

/// A single field value.
///
/// `Null` means "absent": rendering it yields no text, and converting it into
/// a member type yields that type's default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(OrderedFloat<f64>),
    Char(char),
    Str(String),
    Guid(Uuid),
    DateTime(NaiveDateTime),
    DateTimeUtc(DateTime<Utc>),
    Date(NaiveDate),
    Enum(EnumValue),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Name of the held kind, used in conversion errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "integer",
            Value::UInt(_) => "unsigned integer",
            Value::Float(_) => "float",
            Value::Char(_) => "char",
            Value::Str(_) => "string",
            Value::Guid(_) => "guid",
            Value::DateTime(_) => "date-time",
            Value::DateTimeUtc(_) => "utc date-time",
            Value::Date(_) => "date",
            Value::Enum(_) => "enum",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer view of an `Int`, `UInt` or `Enum` value.
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Value::Int(v) => Some(i128::from(*v)),
            Value::UInt(v) => Some(i128::from(*v)),
            Value::Enum(e) => Some(i128::from(e.ordinal)),
            _ => None,
        }
    }

    /// Render this value with an optional format.
    ///
    /// Returns `Ok(None)` for `Null`. A format the value's kind does not
    /// understand is an [`MapError::UnsupportedFormat`].
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn render(&self, format: Option<&str>) -> Result<Option<String>> {
        let format = format.filter(|f| !f.trim().is_empty());

        let text = match self {
            Value::Null => return Ok(None),
            Value::Int(v) => {
                numeric::format_integer(i128::from(*v), format, "integer", IntWidth::I64)?
            }
            Value::UInt(v) => numeric::format_integer(
                i128::from(*v),
                format,
                "unsigned integer",
                IntWidth::U64,
            )?,
            Value::Float(v) => numeric::format_float(v.0, format, "float")?,
            Value::Guid(v) => guid::format_guid(v, format)?,
            Value::DateTime(v) => datetime::format_naive(v, format)?,
            Value::DateTimeUtc(v) => datetime::format_utc(v, format)?,
            Value::Date(v) => datetime::format_date(v, format)?,
            Value::Enum(v) => enums::render_enum(v, format)?,
            Value::Bool(_) | Value::Char(_) | Value::Str(_) => {
                if let Some(format) = format {
                    return Err(MapError::unsupported_format(
                        format,
                        self.kind_name(),
                        "this kind takes no format",
                    ));
                }
                self.to_string()
            }
        };

        Ok(Some(text))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::UInt(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{}", v.0),
            Value::Char(v) => write!(f, "{v}"),
            Value::Str(v) => f.write_str(v),
            Value::Guid(v) => write!(f, "{}", v.simple()),
            Value::DateTime(v) => write!(f, "{}", v.format(datetime::NAIVE_ROUND_TRIP)),
            Value::DateTimeUtc(v) => {
                f.write_str(&v.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true))
            }
            Value::Date(v) => write!(f, "{}", v.format(datetime::DATE_ROUND_TRIP)),
            Value::Enum(v) => f.write_str(&crate::naming::pascal_to_train(v.name)),
        }
    }
}

// ============================================================================
// Conversions into Value
// ============================================================================

macro_rules! impl_value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v.into())
                }
            }
        )*
    };
}

impl_value_from! {
    bool => Bool,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => UInt,
    u16 => UInt,
    u32 => UInt,
    u64 => UInt,
    char => Char,
    String => Str,
    Uuid => Guid,
    NaiveDateTime => DateTime,
    DateTime<Utc> => DateTimeUtc,
    NaiveDate => Date,
    EnumValue => Enum,
}

impl From<f32> for Value {
    /// Widens through the shortest decimal text of `v`, so `0.1f32` holds `0.1`.
    fn from(v: f32) -> Self {
        let widened = v.to_string().parse::<f64>().unwrap_or(f64::from(v));
        Value::Float(OrderedFloat(widened))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(OrderedFloat(v))
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::UInt(v as u64)
    }
}

impl From<isize> for Value {
    fn from(v: isize) -> Self {
        Value::Int(v as i64)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

// ============================================================================
// Value Bag
// ============================================================================

/// Field values keyed by member name.
///
/// Lookups go through the normalized member key, so `CurrencyPair`,
/// `currencypair` and `currency_pair` address the same entry. The original
/// spelling of the last insert is kept for iteration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueBag {
    entries: FxHashMap<String, (String, Value)>,
}

impl ValueBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a value, returning the previous one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let name = name.into();
        self.entries
            .insert(crate::shape::member_key(&name), (name, value.into()))
            .map(|(_, old)| old)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .get(&crate::shape::member_key(name))
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&crate::shape::member_key(name))
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.entries
            .remove(&crate::shape::member_key(name))
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(name, value)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .values()
            .map(|(name, value)| (name.as_str(), value))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ValueBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = ValueBag::new();
        bag.extend(iter);
        bag
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for ValueBag {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}
