//! Two-way mapping between typed values and templated strings.
//!
//! A template such as `orders/{CustomerId}/{OrderDate:yyyy-MM-dd}` turns an
//! object's key fields into a storage path, and parses such a path back into
//! the object.
//!
//! ```
//! use chrono::NaiveDate;
//! use stringmap::{MapEnum, Mappable, StringMap};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, MapEnum)]
//! enum Exchange {
//!     Bitstamp,
//!     Gdax,
//! }
//!
//! #[derive(Debug, Clone, PartialEq, Mappable)]
//! struct OrderBook {
//!     exchange: Exchange,
//!     currency_pair: String,
//!     time: chrono::NaiveDateTime,
//! }
//!
//! fn main() -> stringmap::Result<()> {
//!     let map = StringMap::<OrderBook>::new(
//!         "order-books/{Exchange}/{CurrencyPair}/{Time:yyyy-MM-dd/HH-mm-ss}",
//!     );
//!     let subject = "order-books/bitstamp/btc-usd/2017-04-04/17-37-00";
//!
//!     let book = map.parse(subject)?.expect("subject matches the template");
//!     assert_eq!(book.exchange, Exchange::Bitstamp);
//!     assert_eq!(book.currency_pair, "btc-usd");
//!     assert_eq!(
//!         Some(book.time),
//!         NaiveDate::from_ymd_opt(2017, 4, 4).and_then(|d| d.and_hms_opt(17, 37, 0))
//!     );
//!
//!     assert_eq!(map.render(&book, false)?, subject);
//!     assert_eq!(map.parse("order-books/kraken/btc-usd/2017-04-04/17-37-00")?, None);
//!     Ok(())
//! }
//! ```
//!
//! # Failures
//!
//! A subject that does not match, or a field that does not coerce, yields
//! `Ok(None)`. Errors are reserved for malformed templates and for templates
//! that do not fit the target type.
//!
//! # Features
//!
//! - `profiling`: instrument compilation and the mapping paths with the
//!   `profiling` crate

pub mod builder;
pub mod map;
pub mod registry;

pub use builder::{Builder, Mutate};
pub use map::StringMap;

pub use stringmap_core::{
    ConstructorShape, ConversionError, ConvertibleFromString, ConvertibleToString, EnumMember,
    EnumMode, EnumShape, EnumValue, MapError, Mappable, MemberFlags, MemberShape, Result,
    SELF_KEYWORD, Scalar, ShapeKind, TemplateErrorKind, TypeShape, Value, ValueBag,
    impl_scalar_mappable, member_key, naming, string_convertible,
};
pub use stringmap_macros::{MapEnum, Mappable};
pub use stringmap_template::{Capture, CompiledPattern, FieldNode, FormatTable, Segment, Span};
