//! The template mapper.

use std::fmt;
use std::marker::PhantomData;
use std::sync::OnceLock;

use stringmap_core::{MapError, Mappable, Result, ValueBag};
use stringmap_template::{CompiledPattern, FieldNode, Segment};

use crate::builder::Builder;
use crate::registry::{self, ShapeEntry};

/// Maps between `T` and strings shaped by a template.
///
/// The template compiles on first use. A compile error is kept and returned
/// by every later call.
///
/// ```
/// use stringmap::StringMap;
///
/// let map = StringMap::<(String, u32)>::new("books/{0}/{1:D4}");
/// assert_eq!(map.render(&("dune".to_string(), 7), false).unwrap(), "books/dune/0007");
/// assert_eq!(map.parse("books/dune/0007").unwrap(), Some(("dune".to_string(), 7)));
/// ```
pub struct StringMap<T> {
    source: String,
    compiled: OnceLock<Result<CompiledPattern>>,
    _target: PhantomData<fn() -> T>,
}

impl<T> StringMap<T> {
    pub fn new(template: impl Into<String>) -> Self {
        StringMap {
            source: template.into(),
            compiled: OnceLock::new(),
            _target: PhantomData,
        }
    }

    /// Create a mapper and compile its template now.
    pub fn compile(template: impl Into<String>) -> Result<Self> {
        let map = Self::new(template);
        map.pattern()?;
        Ok(map)
    }

    /// The template text.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn pattern(&self) -> Result<&CompiledPattern> {
        self.compiled
            .get_or_init(|| CompiledPattern::compile(&self.source))
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Whether `subject` matches the whole template.
    pub fn is_match(&self, subject: &str) -> Result<bool> {
        Ok(self.pattern()?.is_match(subject))
    }
}

impl<T: Mappable + 'static> StringMap<T> {
    /// Parse `subject` into a `T`.
    ///
    /// Returns `Ok(None)` when the subject does not match or any field fails
    /// to coerce.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn parse(&self, subject: &str) -> Result<Option<T>> {
        let pattern = self.pattern()?;
        let entry = registry::entry::<T>();

        if pattern.is_self_only() && entry.shape.is_scalar() {
            return self.parse_scalar(pattern, &entry, subject);
        }

        match self.extract(pattern, &entry, subject)? {
            Some(values) => Builder::with_values(values).build().map(Some),
            None => Ok(None),
        }
    }

    /// Parse `subject` into typed field values without building a `T`.
    pub fn parse_values(&self, subject: &str) -> Result<Option<ValueBag>> {
        let pattern = self.pattern()?;
        let entry = registry::entry::<T>();
        self.extract(pattern, &entry, subject)
    }

    /// Render `value` through the template.
    ///
    /// When a member holds no value, `allow_partial_map` returns the text
    /// rendered before it instead of failing with [`MapError::MissingValue`].
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn render(&self, value: &T, allow_partial_map: bool) -> Result<String> {
        let entry = registry::entry::<T>();
        self.render_with(&entry, allow_partial_map, |field| {
            let index = member_of(&entry, field)?;
            value.render_member(index, field.format.as_deref())
        })
    }

    /// Render named values through the template. A missing name is an
    /// absent value.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn render_values(&self, values: &ValueBag, allow_partial_map: bool) -> Result<String> {
        let entry = registry::entry::<T>();
        self.render_with(&entry, allow_partial_map, |field| match values.get(&field.name) {
            Some(value) => value.render(field.format.as_deref()),
            None => Ok(None),
        })
    }

    fn parse_scalar(
        &self,
        pattern: &CompiledPattern,
        entry: &ShapeEntry,
        subject: &str,
    ) -> Result<Option<T>> {
        let Some(captures) = pattern.captures(subject) else {
            tracing::trace!(template = %self.source, subject, "subject did not match");
            return Ok(None);
        };
        let Some(capture) = captures.first() else {
            return Ok(None);
        };

        let member = &entry.shape.members[0];
        match (member.parse)(capture.text, capture.field.format.as_deref())? {
            Some(value) => T::construct(vec![value]).map(Some),
            None => {
                tracing::trace!(
                    member = member.name,
                    text = capture.text,
                    "field did not coerce"
                );
                Ok(None)
            }
        }
    }

    fn extract(
        &self,
        pattern: &CompiledPattern,
        entry: &ShapeEntry,
        subject: &str,
    ) -> Result<Option<ValueBag>> {
        let Some(captures) = pattern.captures(subject) else {
            tracing::trace!(template = %self.source, subject, "subject did not match");
            return Ok(None);
        };

        let mut values = ValueBag::new();
        for capture in captures {
            let index = member_of(entry, capture.field)?;
            let member = &entry.shape.members[index];
            if values.contains(member.name) {
                continue;
            }

            match (member.parse)(capture.text, capture.field.format.as_deref())? {
                Some(value) => {
                    values.insert(member.name, value);
                }
                None => {
                    tracing::trace!(
                        member = member.name,
                        text = capture.text,
                        "field did not coerce"
                    );
                    return Ok(None);
                }
            }
        }

        Ok(Some(values))
    }

    fn render_with(
        &self,
        entry: &ShapeEntry,
        allow_partial_map: bool,
        mut field_text: impl FnMut(&FieldNode) -> Result<Option<String>>,
    ) -> Result<String> {
        let pattern = self.pattern()?;
        let mut out = String::with_capacity(self.source.len() + 16);

        for segment in pattern.segments() {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(field) => match field_text(field)? {
                    Some(text) => out.push_str(&text),
                    None if allow_partial_map => return Ok(out),
                    None => {
                        return Err(MapError::MissingValue {
                            member: field.name.clone(),
                            type_name: entry.type_name(),
                        });
                    }
                },
            }
        }

        Ok(out)
    }
}

fn member_of(entry: &ShapeEntry, field: &FieldNode) -> Result<usize> {
    entry
        .member_index(&field.name)
        .ok_or_else(|| MapError::UnknownMember {
            member: field.name.clone(),
            type_name: entry.type_name(),
        })
}

impl<T> Clone for StringMap<T> {
    fn clone(&self) -> Self {
        StringMap {
            source: self.source.clone(),
            compiled: self.compiled.clone(),
            _target: PhantomData,
        }
    }
}

impl<T> fmt::Debug for StringMap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringMap")
            .field("source", &self.source)
            .field("compiled", &self.compiled.get().is_some())
            .finish()
    }
}

impl<T> fmt::Display for StringMap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl<T> From<&str> for StringMap<T> {
    fn from(template: &str) -> Self {
        StringMap::new(template)
    }
}

impl<T> From<String> for StringMap<T> {
    fn from(template: String) -> Self {
        StringMap::new(template)
    }
}
