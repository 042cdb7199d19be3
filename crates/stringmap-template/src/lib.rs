//! Template compiler for stringmap.
//!
//! A template is literal text with `{name}`, `{name:format}` and `{*name}`
//! fields. [`CompiledPattern::compile`] validates it and builds an anchored
//! regex with one capture group per field.
//!
//! ```
//! use stringmap_template::CompiledPattern;
//!
//! let pattern = CompiledPattern::compile("orders/{CustomerId}/{OrderDate:yyyy-MM-dd}").unwrap();
//! let caps = pattern.captures("orders/42/2020-01-31").unwrap();
//! assert_eq!(caps[0].text, "42");
//! assert_eq!(caps[1].text, "2020-01-31");
//! ```

mod cursor;
pub mod lexer;
pub mod pattern;
pub mod segment;
pub mod span;

pub use lexer::{Lexer, validate_braces};
pub use pattern::{Capture, CompiledPattern, FormatTable};
pub use segment::{FieldNode, Segment};
pub use span::Span;
