//! Compiled templates.

use regex::Regex;
use rustc_hash::FxHashMap;
use stringmap_core::{MapError, Result, SELF_KEYWORD, TemplateErrorKind, member_key};

use crate::lexer::Lexer;
use crate::segment::{FieldNode, Segment};

/// Field name to format, for fields that carry one.
pub type FormatTable = FxHashMap<String, String>;

/// The text one field captured from a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capture<'a> {
    pub field: &'a FieldNode,
    pub text: &'a str,
}

/// A template compiled into segments and an anchored matcher.
///
/// The matcher has one capture group per field, in template order.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    segments: Vec<Segment>,
    regex: Regex,
    formats: FormatTable,
}

impl CompiledPattern {
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile(template: &str) -> Result<Self> {
        let segments = Lexer::tokenize(template)?;

        let mut pattern = String::with_capacity(template.len() * 2 + 2);
        let mut formats = FormatTable::default();
        pattern.push('^');

        for segment in &segments {
            match segment {
                Segment::Literal(text) => pattern.push_str(&regex::escape(text)),
                Segment::Field(field) => {
                    pattern.push('(');
                    pattern.push_str(&field.capture_pattern());
                    pattern.push(')');

                    if let Some(format) = &field.format {
                        formats
                            .entry(field.name.clone())
                            .or_insert_with(|| format.clone());
                    }
                }
            }
        }
        pattern.push('$');

        let regex = Regex::new(&pattern)
            .map_err(|_| MapError::malformed(template, 0, TemplateErrorKind::InvalidPattern))?;

        let compiled = CompiledPattern {
            source: template.to_string(),
            segments,
            regex,
            formats,
        };

        tracing::debug!(
            template,
            fields = compiled.fields().count(),
            "compiled template"
        );

        Ok(compiled)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Field nodes in template order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldNode> {
        self.segments.iter().filter_map(Segment::as_field)
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn formats(&self) -> &FormatTable {
        &self.formats
    }

    pub fn format_of(&self, name: &str) -> Option<&str> {
        self.formats.get(name).map(String::as_str)
    }

    /// Whether the only field addresses the target as a whole.
    pub fn is_self_only(&self) -> bool {
        let mut fields = self.fields();
        match (fields.next(), fields.next()) {
            (Some(field), None) => member_key(&field.name) == SELF_KEYWORD,
            _ => false,
        }
    }

    pub fn is_match(&self, subject: &str) -> bool {
        self.regex.is_match(subject)
    }

    /// Text captured by each field, in template order, or `None` when the
    /// subject does not match as a whole.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn captures<'a>(&'a self, subject: &'a str) -> Option<Vec<Capture<'a>>> {
        let caps = self.regex.captures(subject)?;
        Some(
            self.fields()
                .enumerate()
                .map(|(i, field)| Capture {
                    field,
                    text: caps.get(i + 1).map_or("", |m| m.as_str()),
                })
                .collect(),
        )
    }
}

impl PartialEq for CompiledPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
            && self.segments == other.segments
            && self.regex.as_str() == other.regex.as_str()
            && self.formats == other.formats
    }
}

impl Eq for CompiledPattern {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_anchored_matcher() {
        let pattern = CompiledPattern::compile("apples/{Exchange}/oranges").unwrap();
        assert_eq!(pattern.regex().as_str(), "^apples/([^/]*)/oranges$");
        assert!(pattern.is_match("apples/bitstamp/oranges"));
        assert!(!pattern.is_match("/apples/bitstamp/oranges"));
        assert!(!pattern.is_match("apples/bitstamp/oranges/"));
    }

    #[test]
    fn literals_are_escaped() {
        let pattern = CompiledPattern::compile("a.b+{x}(c)").unwrap();
        assert!(pattern.is_match("a.b+1(c)"));
        assert!(!pattern.is_match("aXb+1(c)"));
    }

    #[test]
    fn captures_in_template_order() {
        let pattern = CompiledPattern::compile(
            "order-books/{Exchange}/{CurrencyPair}/{Time:yyyy-MM-dd/HH-mm-ss}",
        )
        .unwrap();
        let caps = pattern
            .captures("order-books/bitstamp/btc-usd/2017-04-04/17-37-00")
            .unwrap();
        let texts: Vec<_> = caps.iter().map(|c| (c.field.name.as_str(), c.text)).collect();
        assert_eq!(
            texts,
            [
                ("Exchange", "bitstamp"),
                ("CurrencyPair", "btc-usd"),
                ("Time", "2017-04-04/17-37-00"),
            ]
        );
        assert_eq!(pattern.format_of("Time"), Some("yyyy-MM-dd/HH-mm-ss"));
        assert_eq!(pattern.format_of("Exchange"), None);
        assert_eq!(pattern.formats().len(), 1);
    }

    #[test]
    fn wildcard_tail() {
        let pattern = CompiledPattern::compile("alfa/{*this}").unwrap();
        let caps = pattern.captures("alfa/b/c/d.jpg").unwrap();
        assert_eq!(caps[0].text, "b/c/d.jpg");
        assert!(pattern.is_self_only());
    }

    #[test]
    fn self_only_needs_a_single_this_field() {
        assert!(CompiledPattern::compile("{this:D4}").unwrap().is_self_only());
        assert!(!CompiledPattern::compile("{this}/{this}").unwrap().is_self_only());
        assert!(!CompiledPattern::compile("{Id}").unwrap().is_self_only());
        assert!(!CompiledPattern::compile("static").unwrap().is_self_only());
    }

    #[test]
    fn compile_is_deterministic() {
        let a = CompiledPattern::compile("x/{A:yyyy/MM}/{*B}").unwrap();
        let b = CompiledPattern::compile("x/{A:yyyy/MM}/{*B}").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn malformed_templates_fail() {
        let err = CompiledPattern::compile("a/{b").unwrap_err();
        assert!(err.is_malformed_template());
    }
}
