//! Explicit string conversion capabilities for caller-defined types.
//!
//! A type that implements both traits (and `Default`) becomes a field type
//! through [`string_convertible!`](crate::string_convertible):
//!
//! ```
//! use stringmap_core::{ConvertibleFromString, ConvertibleToString, Scalar};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Ticker(String);
//!
//! impl ConvertibleFromString for Ticker {
//!     type Error = &'static str;
//!
//!     fn convert_from_string(text: &str) -> Result<Self, Self::Error> {
//!         if text.chars().all(|c| c.is_ascii_uppercase()) {
//!             Ok(Ticker(text.to_string()))
//!         } else {
//!             Err("tickers are uppercase")
//!         }
//!     }
//! }
//!
//! impl ConvertibleToString for Ticker {
//!     fn convert_to_string(&self) -> String {
//!         self.0.clone()
//!     }
//! }
//!
//! stringmap_core::string_convertible!(Ticker);
//!
//! assert_eq!(Ticker::parse_text("BTC", None).unwrap(), Some(Ticker("BTC".into())));
//! assert_eq!(Ticker::parse_text("btc", None).unwrap(), None);
//! ```

use std::fmt;

/// Build a value from its string form.
pub trait ConvertibleFromString: Sized {
    type Error: fmt::Display;

    fn convert_from_string(text: &str) -> Result<Self, Self::Error>;
}

/// Produce the string form of a value.
pub trait ConvertibleToString {
    fn convert_to_string(&self) -> String;
}

/// Implement `Scalar` and `Mappable` for types with explicit string
/// conversions. Parse failures are soft; the value is stored as a string.
#[macro_export]
macro_rules! string_convertible {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Scalar for $ty {
                fn parse_text(
                    text: &str,
                    _format: ::core::option::Option<&str>,
                ) -> $crate::Result<::core::option::Option<Self>> {
                    ::core::result::Result::Ok(
                        <$ty as $crate::ConvertibleFromString>::convert_from_string(text).ok(),
                    )
                }

                fn to_value(&self) -> $crate::Value {
                    $crate::Value::Str(<$ty as $crate::ConvertibleToString>::convert_to_string(self))
                }

                fn from_value(
                    value: $crate::Value,
                ) -> ::core::result::Result<Self, $crate::ConversionError> {
                    match value {
                        $crate::Value::Null => ::core::result::Result::Ok(
                            <$ty as ::core::default::Default>::default(),
                        ),
                        $crate::Value::Str(s) => {
                            <$ty as $crate::ConvertibleFromString>::convert_from_string(&s)
                                .map_err(|e| $crate::ConversionError::Invalid(e.to_string()))
                        }
                        other => ::core::result::Result::Err($crate::ConversionError::TypeMismatch {
                            expected: ::core::stringify!($ty),
                            found: other.kind_name(),
                        }),
                    }
                }

                fn type_name() -> &'static str {
                    ::core::stringify!($ty)
                }
            }

            $crate::impl_scalar_mappable!($ty);
        )+
    };
}
