//! Template segments.

use crate::span::Span;

/// A `{name}`, `{name:format}` or `{*name}` node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNode {
    /// Member name, without the wildcard marker.
    pub name: String,
    /// Non-blank format text after the first `:`.
    pub format: Option<String>,
    /// Captures the remainder of the subject, slashes included.
    pub wildcard: bool,
    pub span: Span,
}

impl FieldNode {
    /// Regex fragment matching this field's text.
    ///
    /// Each `/` in the format widens the capture by one path segment.
    pub fn capture_pattern(&self) -> String {
        if self.wildcard {
            return ".*".to_string();
        }

        let slashes = self
            .format
            .as_deref()
            .map_or(0, |format| format.matches('/').count());

        let mut pattern = String::from("[^/]*");
        for _ in 0..slashes {
            pattern.push_str("/[^/]*");
        }
        pattern
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Field(FieldNode),
}

impl Segment {
    pub fn as_field(&self) -> Option<&FieldNode> {
        match self {
            Segment::Field(field) => Some(field),
            Segment::Literal(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(format: Option<&str>, wildcard: bool) -> FieldNode {
        FieldNode {
            name: "Time".to_string(),
            format: format.map(str::to_string),
            wildcard,
            span: Span::default(),
        }
    }

    #[test]
    fn plain_field_captures_one_segment() {
        assert_eq!(field(None, false).capture_pattern(), "[^/]*");
        assert_eq!(field(Some("yyyy-MM-dd"), false).capture_pattern(), "[^/]*");
    }

    #[test]
    fn slashes_in_format_widen_capture() {
        assert_eq!(
            field(Some("yyyy-MM-dd/HH-mm-ss"), false).capture_pattern(),
            "[^/]*/[^/]*"
        );
        assert_eq!(field(Some("yyyy/MM/dd"), false).capture_pattern(), "[^/]*/[^/]*/[^/]*");
    }

    #[test]
    fn wildcard_captures_everything() {
        assert_eq!(field(Some("a/b"), true).capture_pattern(), ".*");
    }
}
