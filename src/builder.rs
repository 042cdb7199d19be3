//! Assembling values from a value bag.
//!
//! Every constructor parameter and settable member resolves, in order, to
//! the bag entry for its name, the source object's current value, or
//! `Value::Null` (the member type's default). Fields that are not members
//! are copied from the source through [`Mappable::copy_unmapped`].
//!
//! ```
//! use stringmap::Builder;
//!
//! let pair: (String, u32) = Builder::new().set("0", "btc-usd").set("1", 7u32).build().unwrap();
//! assert_eq!(pair, ("btc-usd".to_string(), 7));
//!
//! let changed = Builder::from_source(&pair).set("1", 8u32).build().unwrap();
//! assert_eq!(changed, ("btc-usd".to_string(), 8));
//! ```

use stringmap_core::{Mappable, Result, Value, ValueBag};

use crate::registry;

/// Builds a `T` from named values, optionally over an existing instance.
pub struct Builder<'a, T> {
    values: ValueBag,
    source: Option<&'a T>,
}

impl<T> Default for Builder<'_, T> {
    fn default() -> Self {
        Builder {
            values: ValueBag::new(),
            source: None,
        }
    }
}

impl<'a, T: Mappable + 'static> Builder<'a, T> {
    /// Start from defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the current member values of `source`.
    pub fn from_source(source: &'a T) -> Self {
        Builder {
            values: ValueBag::new(),
            source: Some(source),
        }
    }

    /// Start from defaults with `values` supplied.
    pub fn with_values(values: ValueBag) -> Self {
        Builder {
            values,
            source: None,
        }
    }

    /// Supply every entry of `values`, replacing earlier ones.
    pub fn extend(mut self, values: ValueBag) -> Self {
        self.values
            .extend(values.iter().map(|(name, value)| (name.to_string(), value.clone())));
        self
    }

    /// Supply one value, replacing an earlier one for the same member.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(name, value);
        self
    }

    pub fn values(&self) -> &ValueBag {
        &self.values
    }

    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn build(self) -> Result<T> {
        let entry = registry::entry::<T>();
        let plan = entry.plan()?;
        let Builder { mut values, source } = self;

        let mut resolve = |index: usize| -> Option<Value> {
            let member = &entry.shape.members[index];
            values
                .remove(member.name)
                .or_else(|| source.map(|source| source.member_value(index)))
        };

        let args = plan
            .params
            .iter()
            .map(|&index| resolve(index).unwrap_or_default())
            .collect();
        let mut value = T::construct(args)?;

        for &index in &plan.setters {
            if let Some(member_value) = resolve(index) {
                value.set_member(index, member_value)?;
            }
        }

        if let Some(source) = source {
            value.copy_unmapped(source);
        }

        Ok(value)
    }
}

/// Copy-with-changes for any [`Mappable`] value.
///
/// ```
/// use stringmap::Mutate;
///
/// let key = ("orders".to_string(), 1u64);
/// let next = key.mutate().set("1", 2u64).build().unwrap();
/// assert_eq!(next.1, 2);
/// assert_eq!(key.1, 1);
/// ```
pub trait Mutate: Mappable + 'static {
    fn mutate(&self) -> Builder<'_, Self> {
        Builder::from_source(self)
    }
}

impl<T: Mappable + 'static> Mutate for T {}
