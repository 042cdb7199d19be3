//! Attribute parsing for the stringmap derives.

use syn::{Attribute, LitStr, Path};

/// Parsed `#[stringmap(...)]` attributes on a struct or enum.
#[derive(Debug, Default)]
pub struct TypeAttrs {
    /// Override the type name reported in errors
    pub rename: Option<String>,
    /// Associated function taking the constructor fields in order
    pub constructor: Option<Path>,
}

/// Parsed `#[stringmap(...)]` attributes on a field.
#[derive(Debug, Default)]
pub struct FieldAttrs {
    /// Override the member name
    pub rename: Option<String>,
    /// Assigned after construction rather than passed to the constructor
    pub set: bool,
    /// Not a member; built from `Default`
    pub skip: bool,
}

/// Parsed `#[stringmap(...)]` attributes on an enum variant.
#[derive(Debug, Default)]
pub struct VariantAttrs {
    pub rename: Option<String>,
}

fn unknown(meta: &syn::meta::ParseNestedMeta<'_>, what: &str) -> syn::Error {
    meta.error(format!(
        "unknown stringmap {what} attribute: {}",
        meta.path
            .get_ident()
            .map(|i| i.to_string())
            .unwrap_or_default()
    ))
}

impl TypeAttrs {
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut result = Self::default();

        for attr in attrs {
            if !attr.path().is_ident("stringmap") {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let value: LitStr = meta.value()?.parse()?;
                    result.rename = Some(value.value());
                } else if meta.path.is_ident("constructor") {
                    let value: LitStr = meta.value()?.parse()?;
                    result.constructor = Some(value.parse()?);
                } else {
                    return Err(unknown(&meta, "type"));
                }
                Ok(())
            })?;
        }

        Ok(result)
    }
}

impl FieldAttrs {
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut result = Self::default();

        for attr in attrs {
            if !attr.path().is_ident("stringmap") {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let value: LitStr = meta.value()?.parse()?;
                    result.rename = Some(value.value());
                } else if meta.path.is_ident("set") {
                    result.set = true;
                } else if meta.path.is_ident("skip") {
                    result.skip = true;
                } else {
                    return Err(unknown(&meta, "field"));
                }
                Ok(())
            })?;
        }

        Ok(result)
    }
}

impl VariantAttrs {
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut result = Self::default();

        for attr in attrs {
            if !attr.path().is_ident("stringmap") {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let value: LitStr = meta.value()?.parse()?;
                    result.rename = Some(value.value());
                } else {
                    return Err(unknown(&meta, "variant"));
                }
                Ok(())
            })?;
        }

        Ok(result)
    }
}
