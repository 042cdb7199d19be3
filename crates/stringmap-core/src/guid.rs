//! GUID formats: `N` (simple, the default), `D` (hyphenated), `B` (braced)
//! and `P` (parenthesized).

use uuid::Uuid;

use crate::error::{MapError, Result};

pub fn format_guid(value: &Uuid, format: Option<&str>) -> Result<String> {
    let text = match format.unwrap_or("N") {
        "N" | "n" => value.simple().to_string(),
        "D" | "d" => value.hyphenated().to_string(),
        "B" | "b" => value.braced().to_string(),
        "P" | "p" => format!("({})", value.hyphenated()),
        other => {
            return Err(MapError::unsupported_format(
                other,
                "guid",
                "expected one of `N`, `D`, `B` or `P`",
            ));
        }
    };
    Ok(text)
}

/// Parse any of the four forms; the format only has to be a valid letter.
pub fn parse_guid(text: &str, format: Option<&str>) -> Result<Option<Uuid>> {
    if let Some(format) = format
        && !matches!(format, "N" | "n" | "D" | "d" | "B" | "b" | "P" | "p")
    {
        return Err(MapError::unsupported_format(
            format,
            "guid",
            "expected one of `N`, `D`, `B` or `P`",
        ));
    }

    let text = text
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(text);
    Ok(Uuid::try_parse(text).ok())
}
