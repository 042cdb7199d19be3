//! Unified error types for stringmap.
//!
//! ## Error Hierarchy
//!
//! ```text
//! MapError (top-level)
//! ├── MalformedTemplate  - Unbalanced or nested braces, empty field names
//! ├── UnknownMember      - A template field has no member on the target type
//! ├── UnsupportedFormat  - Unknown enum letter, or a format the value cannot take
//! ├── UnsupportedShape   - The target type has no usable constructor
//! ├── MissingValue       - A required value was absent while rendering
//! └── Conversion         - A bag value could not become a member's type
//!     └── ConversionError
//! ```
//!
//! A subject string that does not match, or a field that does not coerce, is
//! *not* an error: those paths return `Ok(None)`.

use std::fmt;

use thiserror::Error;

/// Result alias used across the workspace.
pub type Result<T, E = MapError> = std::result::Result<T, E>;

// ============================================================================
// Template Errors
// ============================================================================

/// What is wrong with a malformed template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateErrorKind {
    /// A `{` appeared inside another field.
    NestedOpenBrace,
    /// A `}` appeared with no open field.
    UnexpectedCloseBrace,
    /// A `{` was never closed.
    UnclosedBrace,
    /// A field has no name, e.g. `{}` or `{:yyyy}`.
    EmptyFieldName,
    /// More than one `{*name}` field.
    DuplicateWildcard,
    /// The generated matcher was rejected by the regex engine.
    InvalidPattern,
}

impl TemplateErrorKind {
    /// Returns a human-readable description of this error kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateErrorKind::NestedOpenBrace => "unexpected extra `{`",
            TemplateErrorKind::UnexpectedCloseBrace => "unexpected `}`",
            TemplateErrorKind::UnclosedBrace => "opening `{` is missing a closing `}`",
            TemplateErrorKind::EmptyFieldName => "field has no name",
            TemplateErrorKind::DuplicateWildcard => "only one wildcard field is allowed",
            TemplateErrorKind::InvalidPattern => "generated pattern is invalid",
        }
    }
}

impl fmt::Display for TemplateErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Conversion Errors
// ============================================================================

/// Errors converting a [`Value`](crate::Value) into a concrete member type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The value holds a different kind than the member expects.
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// An integer does not fit the target width.
    #[error("{value} is out of range for {target_type}")]
    IntegerOverflow {
        value: i128,
        target_type: &'static str,
    },

    /// A string conversion rejected the value.
    #[error("invalid value: {0}")]
    Invalid(String),
}

// ============================================================================
// Map Errors
// ============================================================================

/// Hard failures of the mapping engine.
///
/// These indicate a programmer error (a bad template or a template/type
/// mismatch) rather than bad input data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapError {
    /// The template's braces are unbalanced, nested, or a field is malformed.
    #[error("malformed template `{template}`: {kind} at position {position}")]
    MalformedTemplate {
        template: String,
        position: usize,
        kind: TemplateErrorKind,
    },

    /// A template field names a member the target type does not have.
    #[error("could not resolve member `{member}` on `{type_name}`")]
    UnknownMember {
        member: String,
        type_name: &'static str,
    },

    /// A format that the value (or the enum coercion) does not understand.
    #[error("unsupported format `{format}` for {target}: {detail}")]
    UnsupportedFormat {
        format: String,
        target: &'static str,
        detail: String,
    },

    /// The target type cannot be built from a value bag.
    #[error("`{type_name}` cannot be constructed: {detail}")]
    UnsupportedShape {
        type_name: &'static str,
        detail: String,
    },

    /// A required value was absent while rendering a full string.
    #[error("a required value `{member}` was missing while mapping `{type_name}` to a string")]
    MissingValue {
        member: String,
        type_name: &'static str,
    },

    /// A supplied value could not be converted into the member's type.
    #[error("member `{member}`: {source}")]
    Conversion {
        member: String,
        #[source]
        source: ConversionError,
    },
}

impl MapError {
    pub fn malformed(template: &str, position: usize, kind: TemplateErrorKind) -> Self {
        MapError::MalformedTemplate {
            template: template.to_string(),
            position,
            kind,
        }
    }

    pub fn unsupported_format(
        format: &str,
        target: &'static str,
        detail: impl Into<String>,
    ) -> Self {
        MapError::UnsupportedFormat {
            format: format.to_string(),
            target,
            detail: detail.into(),
        }
    }

    pub fn unsupported_shape(type_name: &'static str, detail: impl Into<String>) -> Self {
        MapError::UnsupportedShape {
            type_name,
            detail: detail.into(),
        }
    }

    pub fn conversion(member: &str, source: ConversionError) -> Self {
        MapError::Conversion {
            member: member.to_string(),
            source,
        }
    }

    /// Whether this is a template compile error.
    pub fn is_malformed_template(&self) -> bool {
        matches!(self, MapError::MalformedTemplate { .. })
    }
}
