//! The `Scalar` coercion trait and its impls for primitive kinds.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use uuid::Uuid;

use crate::error::{ConversionError, Result};
use crate::numeric::IntWidth;
use crate::value::Value;
use crate::{datetime, guid, numeric};

/// A type that maps to a single template field.
///
/// `parse_text` returns `Ok(None)` when the text does not represent a value
/// of the type; `Err` is reserved for a format the type cannot take.
pub trait Scalar: Sized {
    fn parse_text(text: &str, format: Option<&str>) -> Result<Option<Self>>;

    fn to_value(&self) -> Value;

    /// Convert a bag value. `Value::Null` yields the type's default.
    fn from_value(value: Value) -> std::result::Result<Self, ConversionError>;

    fn render_text(&self, format: Option<&str>) -> Result<Option<String>> {
        self.to_value().render(format)
    }

    fn type_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Parse `text` as `T` and lift the result into a [`Value`].
///
/// Stored as a function pointer in member descriptors.
pub fn parse_value<T: Scalar>(text: &str, format: Option<&str>) -> Result<Option<Value>> {
    Ok(T::parse_text(text, format)?.map(|v| v.to_value()))
}

fn mismatch<T: Scalar>(found: &Value) -> ConversionError {
    ConversionError::TypeMismatch {
        expected: T::type_name(),
        found: found.kind_name(),
    }
}

// ============================================================================
// Numbers
// ============================================================================

macro_rules! impl_scalar_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Scalar for $ty {
                fn parse_text(text: &str, format: Option<&str>) -> Result<Option<Self>> {
                    let width = IntWidth {
                        bits: <$ty>::BITS,
                        signed: <$ty>::MIN != 0,
                    };
                    let parsed = numeric::parse_integer(text, format, stringify!($ty), width)?;
                    Ok(parsed.and_then(|n| <$ty>::try_from(n).ok()))
                }

                fn to_value(&self) -> Value {
                    Value::from(*self)
                }

                fn render_text(&self, format: Option<&str>) -> Result<Option<String>> {
                    let width = IntWidth {
                        bits: <$ty>::BITS,
                        signed: <$ty>::MIN != 0,
                    };
                    let format = format.filter(|f| !f.trim().is_empty());
                    numeric::format_integer(*self as i128, format, stringify!($ty), width).map(Some)
                }

                fn from_value(value: Value) -> std::result::Result<Self, ConversionError> {
                    match value {
                        Value::Null => Ok(0),
                        Value::Str(s) => s
                            .parse::<$ty>()
                            .map_err(|e| ConversionError::Invalid(format!("`{s}`: {e}"))),
                        other => match other.as_i128() {
                            Some(n) => <$ty>::try_from(n).map_err(|_| {
                                ConversionError::IntegerOverflow {
                                    value: n,
                                    target_type: stringify!($ty),
                                }
                            }),
                            None => Err(mismatch::<$ty>(&other)),
                        },
                    }
                }

                fn type_name() -> &'static str {
                    stringify!($ty)
                }
            }
        )*
    };
}

impl_scalar_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! impl_scalar_float {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Scalar for $ty {
                fn parse_text(text: &str, format: Option<&str>) -> Result<Option<Self>> {
                    numeric::parse_float::<$ty>(text, format, stringify!($ty))
                }

                fn to_value(&self) -> Value {
                    Value::from(*self)
                }

                fn from_value(value: Value) -> std::result::Result<Self, ConversionError> {
                    match value {
                        Value::Null => Ok(0.0),
                        Value::Float(f) => Ok(f.0 as $ty),
                        Value::Int(n) => Ok(n as $ty),
                        Value::UInt(n) => Ok(n as $ty),
                        Value::Str(s) => s
                            .parse::<$ty>()
                            .map_err(|e| ConversionError::Invalid(format!("`{s}`: {e}"))),
                        other => Err(mismatch::<$ty>(&other)),
                    }
                }

                fn render_text(&self, format: Option<&str>) -> Result<Option<String>> {
                    match format.filter(|f| !f.trim().is_empty()) {
                        // Shortest text that reads back as the same value
                        None => Ok(Some(self.to_string())),
                        Some(format) => {
                            numeric::format_float(f64::from(*self), Some(format), stringify!($ty))
                                .map(Some)
                        }
                    }
                }

                fn type_name() -> &'static str {
                    stringify!($ty)
                }
            }
        )*
    };
}

impl_scalar_float!(f32, f64);

// ============================================================================
// Text
// ============================================================================

impl Scalar for String {
    fn parse_text(text: &str, _format: Option<&str>) -> Result<Option<Self>> {
        Ok(Some(text.to_string()))
    }

    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }

    fn from_value(value: Value) -> std::result::Result<Self, ConversionError> {
        match value {
            Value::Str(s) => Ok(s),
            other => Ok(other.to_string()),
        }
    }

    fn type_name() -> &'static str {
        "String"
    }
}

impl Scalar for bool {
    fn parse_text(text: &str, _format: Option<&str>) -> Result<Option<Self>> {
        if text.eq_ignore_ascii_case("true") {
            Ok(Some(true))
        } else if text.eq_ignore_ascii_case("false") {
            Ok(Some(false))
        } else {
            Ok(None)
        }
    }

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> std::result::Result<Self, ConversionError> {
        match value {
            Value::Null => Ok(false),
            Value::Bool(b) => Ok(b),
            Value::Str(s) => Self::parse_text(&s, None)
                .ok()
                .flatten()
                .ok_or_else(|| ConversionError::Invalid(format!("`{s}` is not a bool"))),
            other => Err(mismatch::<bool>(&other)),
        }
    }

    fn type_name() -> &'static str {
        "bool"
    }
}

fn single_char(text: &str) -> Option<char> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}

impl Scalar for char {
    fn parse_text(text: &str, _format: Option<&str>) -> Result<Option<Self>> {
        Ok(single_char(text))
    }

    fn to_value(&self) -> Value {
        Value::Char(*self)
    }

    fn from_value(value: Value) -> std::result::Result<Self, ConversionError> {
        match value {
            Value::Null => Ok(char::default()),
            Value::Char(ch) => Ok(ch),
            Value::Str(s) => single_char(&s)
                .ok_or_else(|| ConversionError::Invalid(format!("`{s}` is not a single char"))),
            other => Err(mismatch::<char>(&other)),
        }
    }

    fn type_name() -> &'static str {
        "char"
    }
}

// ============================================================================
// Identifiers and time
// ============================================================================

impl Scalar for Uuid {
    fn parse_text(text: &str, format: Option<&str>) -> Result<Option<Self>> {
        guid::parse_guid(text, format)
    }

    fn to_value(&self) -> Value {
        Value::Guid(*self)
    }

    fn from_value(value: Value) -> std::result::Result<Self, ConversionError> {
        match value {
            Value::Null => Ok(Uuid::nil()),
            Value::Guid(id) => Ok(id),
            Value::Str(s) => guid::parse_guid(&s, None)
                .ok()
                .flatten()
                .ok_or_else(|| ConversionError::Invalid(format!("`{s}` is not a guid"))),
            other => Err(mismatch::<Uuid>(&other)),
        }
    }

    fn type_name() -> &'static str {
        "Uuid"
    }
}

impl Scalar for NaiveDateTime {
    fn parse_text(text: &str, format: Option<&str>) -> Result<Option<Self>> {
        datetime::parse_naive(text, format)
    }

    fn to_value(&self) -> Value {
        Value::DateTime(*self)
    }

    fn from_value(value: Value) -> std::result::Result<Self, ConversionError> {
        match value {
            Value::Null => Ok(NaiveDateTime::default()),
            Value::DateTime(t) => Ok(t),
            Value::DateTimeUtc(t) => Ok(t.naive_utc()),
            Value::Date(d) => Ok(datetime::start_of_day(d)),
            Value::Str(s) => datetime::parse_naive(&s, None)
                .ok()
                .flatten()
                .ok_or_else(|| ConversionError::Invalid(format!("`{s}` is not a date-time"))),
            other => Err(mismatch::<NaiveDateTime>(&other)),
        }
    }

    fn type_name() -> &'static str {
        "NaiveDateTime"
    }
}

impl Scalar for DateTime<Utc> {
    fn parse_text(text: &str, format: Option<&str>) -> Result<Option<Self>> {
        datetime::parse_utc(text, format)
    }

    fn to_value(&self) -> Value {
        Value::DateTimeUtc(*self)
    }

    fn from_value(value: Value) -> std::result::Result<Self, ConversionError> {
        match value {
            Value::Null => Ok(DateTime::<Utc>::default()),
            Value::DateTimeUtc(t) => Ok(t),
            Value::DateTime(t) => Ok(t.and_utc()),
            Value::Date(d) => Ok(datetime::start_of_day(d).and_utc()),
            Value::Str(s) => datetime::parse_utc(&s, None)
                .ok()
                .flatten()
                .ok_or_else(|| ConversionError::Invalid(format!("`{s}` is not a date-time"))),
            other => Err(mismatch::<DateTime<Utc>>(&other)),
        }
    }

    fn type_name() -> &'static str {
        "DateTime<Utc>"
    }
}

impl Scalar for NaiveDate {
    fn parse_text(text: &str, format: Option<&str>) -> Result<Option<Self>> {
        datetime::parse_date(text, format)
    }

    fn to_value(&self) -> Value {
        Value::Date(*self)
    }

    fn from_value(value: Value) -> std::result::Result<Self, ConversionError> {
        match value {
            Value::Null => Ok(NaiveDate::default()),
            Value::Date(d) => Ok(d),
            Value::DateTime(t) => Ok(t.date()),
            Value::DateTimeUtc(t) => Ok(t.date_naive()),
            Value::Str(s) => datetime::parse_date(&s, None)
                .ok()
                .flatten()
                .ok_or_else(|| ConversionError::Invalid(format!("`{s}` is not a date"))),
            other => Err(mismatch::<NaiveDate>(&other)),
        }
    }

    fn type_name() -> &'static str {
        "NaiveDate"
    }
}

// ============================================================================
// Nullable
// ============================================================================

impl<T: Scalar> Scalar for Option<T> {
    fn parse_text(text: &str, format: Option<&str>) -> Result<Option<Self>> {
        Ok(T::parse_text(text, format)?.map(Some))
    }

    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, Scalar::to_value)
    }

    fn from_value(value: Value) -> std::result::Result<Self, ConversionError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }

    fn render_text(&self, format: Option<&str>) -> Result<Option<String>> {
        match self {
            Some(inner) => inner.render_text(format),
            None => Ok(None),
        }
    }

    fn type_name() -> &'static str {
        T::type_name()
    }
}
