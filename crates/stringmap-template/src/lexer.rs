//! Template lexer.
//!
//! Validates brace structure, then splits the template into literal and
//! field segments. All positions are byte offsets into the template.

use stringmap_core::{MapError, Result, TemplateErrorKind};

use crate::cursor::Cursor;
use crate::segment::{FieldNode, Segment};
use crate::span::Span;

/// Check that braces are balanced and never nested.
pub fn validate_braces(template: &str) -> Result<()> {
    let mut open_at: Option<usize> = None;

    for (position, ch) in template.char_indices() {
        match ch {
            '{' => {
                if open_at.is_some() {
                    return Err(MapError::malformed(
                        template,
                        position,
                        TemplateErrorKind::NestedOpenBrace,
                    ));
                }
                open_at = Some(position);
            }
            '}' => {
                if open_at.take().is_none() {
                    return Err(MapError::malformed(
                        template,
                        position,
                        TemplateErrorKind::UnexpectedCloseBrace,
                    ));
                }
            }
            _ => {}
        }
    }

    match open_at {
        Some(position) => Err(MapError::malformed(
            template,
            position,
            TemplateErrorKind::UnclosedBrace,
        )),
        None => Ok(()),
    }
}

/// Splits a validated template into segments.
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    wildcard_seen: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(template: &'src str) -> Self {
        Self {
            cursor: Cursor::new(template),
            wildcard_seen: false,
        }
    }

    /// Validate and tokenize `template`.
    pub fn tokenize(template: &'src str) -> Result<Vec<Segment>> {
        validate_braces(template)?;
        Lexer::new(template).segments()
    }

    /// Scan all segments. Assumes braces were validated.
    pub fn segments(mut self) -> Result<Vec<Segment>> {
        let mut segments = Vec::new();

        while !self.cursor.is_eof() {
            let literal = self.cursor.eat_while(|c| c != '{');
            if !literal.is_empty() {
                segments.push(Segment::Literal(literal.to_string()));
            }

            if self.cursor.check(|c| c == '{') {
                let field = self.scan_field()?;
                segments.push(Segment::Field(field));
            }
        }

        Ok(segments)
    }

    fn error(&self, position: usize, kind: TemplateErrorKind) -> MapError {
        MapError::malformed(self.cursor.source(), position, kind)
    }

    fn scan_field(&mut self) -> Result<FieldNode> {
        let start = self.cursor.offset();
        self.cursor.eat('{');

        let wildcard = self.cursor.eat('*');
        if wildcard {
            if self.wildcard_seen {
                return Err(self.error(start, TemplateErrorKind::DuplicateWildcard));
            }
            self.wildcard_seen = true;
        }

        let name = self.cursor.eat_while(|c| c != ':' && c != '}');
        if name.trim().is_empty() {
            return Err(self.error(start, TemplateErrorKind::EmptyFieldName));
        }

        let format = if self.cursor.eat(':') {
            Some(self.cursor.eat_while(|c| c != '}'))
        } else {
            None
        };

        if !self.cursor.eat('}') {
            return Err(self.error(start, TemplateErrorKind::UnclosedBrace));
        }

        Ok(FieldNode {
            name: name.to_string(),
            format: format
                .filter(|f| !f.trim().is_empty())
                .map(str::to_string),
            wildcard,
            span: Span::between(start, self.cursor.offset()),
        })
    }
}
