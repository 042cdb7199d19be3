//! Numeric format strings.
//!
//! | Format | Meaning |
//! |---|---|
//! | `G` | default `Display` |
//! | `D<n>` | integer, zero-padded to `n` digits |
//! | `X<n>` / `x<n>` | hexadecimal (upper/lower), zero-padded |
//! | `F<n>` | fixed point with `n` decimals (default 2) |
//! | `000.00` | zero pattern: minimum integer digits, exact decimals |

use std::str::FromStr;

use crate::error::{MapError, Result};

/// Storage width of an integer type; hex text is two's complement at this width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntWidth {
    pub bits: u32,
    pub signed: bool,
}

impl IntWidth {
    pub const I64: IntWidth = IntWidth {
        bits: 64,
        signed: true,
    };
    pub const U64: IntWidth = IntWidth {
        bits: 64,
        signed: false,
    };

    fn mask(self) -> u128 {
        (1u128 << self.bits) - 1
    }
}

/// A parsed numeric format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberFormat {
    General,
    /// Minimum integer digits and exact fraction digits.
    Pattern { int_digits: usize, frac_digits: usize },
    Hex { upper: bool, width: usize },
}

impl NumberFormat {
    /// Parse a format string for a value of kind `target`.
    pub fn parse(format: &str, target: &'static str) -> Result<Self> {
        let bad = |detail: &str| MapError::unsupported_format(format, target, detail);

        let mut chars = format.chars();
        let Some(spec) = chars.next() else {
            return Ok(NumberFormat::General);
        };
        let rest = chars.as_str();

        let precision = |default: usize| -> Result<usize> {
            if rest.is_empty() {
                Ok(default)
            } else {
                rest.parse::<usize>()
                    .ok()
                    .filter(|n| *n <= 64)
                    .ok_or_else(|| bad("precision must be a number up to 64"))
            }
        };

        match spec {
            'G' | 'g' if rest.is_empty() => Ok(NumberFormat::General),
            'D' | 'd' => Ok(NumberFormat::Pattern {
                int_digits: precision(1)?,
                frac_digits: 0,
            }),
            'F' | 'f' => Ok(NumberFormat::Pattern {
                int_digits: 1,
                frac_digits: precision(2)?,
            }),
            'X' | 'x' => Ok(NumberFormat::Hex {
                upper: spec == 'X',
                width: precision(1)?,
            }),
            '0' => parse_zero_pattern(format).ok_or_else(|| bad("not a zero pattern")),
            _ => Err(bad("expected one of `G`, `D`, `F`, `X` or a zero pattern")),
        }
    }
}

fn parse_zero_pattern(format: &str) -> Option<NumberFormat> {
    let (int_part, frac_part) = match format.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (format, ""),
    };
    let zeros = |s: &str| s.bytes().all(|b| b == b'0');
    if int_part.is_empty() || !zeros(int_part) || !zeros(frac_part) {
        return None;
    }
    Some(NumberFormat::Pattern {
        int_digits: int_part.len(),
        frac_digits: frac_part.len(),
    })
}

fn pad_integer(negative: bool, digits: &str, min_digits: usize) -> String {
    let mut out = String::with_capacity(min_digits.max(digits.len()) + 1);
    if negative {
        out.push('-');
    }
    for _ in digits.len()..min_digits {
        out.push('0');
    }
    out.push_str(digits);
    out
}

fn render_pattern(negative: bool, magnitude: &str, int_digits: usize) -> String {
    match magnitude.split_once('.') {
        Some((int_part, frac_part)) => {
            let mut out = pad_integer(negative, int_part, int_digits);
            out.push('.');
            out.push_str(frac_part);
            out
        }
        None => pad_integer(negative, magnitude, int_digits),
    }
}

/// Render an integer of the given width.
pub fn format_integer(
    value: i128,
    format: Option<&str>,
    target: &'static str,
    width: IntWidth,
) -> Result<String> {
    let Some(format) = format else {
        return Ok(value.to_string());
    };

    match NumberFormat::parse(format, target)? {
        NumberFormat::General => Ok(value.to_string()),
        NumberFormat::Pattern {
            int_digits,
            frac_digits,
        } => {
            let mut magnitude = value.unsigned_abs().to_string();
            if frac_digits > 0 {
                magnitude.push('.');
                magnitude.extend(std::iter::repeat_n('0', frac_digits));
            }
            Ok(render_pattern(value < 0, &magnitude, int_digits))
        }
        NumberFormat::Hex {
            upper,
            width: digits,
        } => {
            let bits = (value as u128) & width.mask();
            Ok(if upper {
                format!("{bits:0digits$X}")
            } else {
                format!("{bits:0digits$x}")
            })
        }
    }
}

/// Render a float.
pub fn format_float(value: f64, format: Option<&str>, target: &'static str) -> Result<String> {
    let Some(format) = format else {
        return Ok(value.to_string());
    };

    match NumberFormat::parse(format, target)? {
        NumberFormat::General => Ok(value.to_string()),
        NumberFormat::Pattern {
            int_digits,
            frac_digits,
        } => {
            if format.starts_with(['D', 'd']) {
                return Err(MapError::unsupported_format(
                    format,
                    target,
                    "`D` applies to integers only",
                ));
            }
            let magnitude = format!("{:.*}", frac_digits, value.abs());
            Ok(render_pattern(value.is_sign_negative() && value != 0.0, &magnitude, int_digits))
        }
        NumberFormat::Hex { .. } => Err(MapError::unsupported_format(
            format,
            target,
            "`X` applies to integers only",
        )),
    }
}

/// Parse an integer of the given width; `Ok(None)` when the text is not a
/// number in the format.
pub fn parse_integer(
    text: &str,
    format: Option<&str>,
    target: &'static str,
    width: IntWidth,
) -> Result<Option<i128>> {
    let format = format.map(|f| NumberFormat::parse(f, target)).transpose()?;
    let parsed = match format {
        Some(NumberFormat::Hex { .. }) => parse_hex(text, width),
        Some(NumberFormat::Pattern { frac_digits, .. }) if frac_digits > 0 => {
            match text.split_once('.') {
                Some((int_part, frac_part))
                    if frac_part.len() == frac_digits && frac_part.bytes().all(|b| b == b'0') =>
                {
                    int_part.parse::<i128>().ok()
                }
                _ => None,
            }
        }
        _ => text.parse::<i128>().ok(),
    };
    Ok(parsed)
}

/// Hex text as a two's complement value of `width`.
fn parse_hex(text: &str, width: IntWidth) -> Option<i128> {
    if text.starts_with(['+', '-']) {
        return None;
    }
    let bits = u128::from_str_radix(text, 16).ok()?;
    if bits > width.mask() {
        return None;
    }
    let sign_bit = 1u128 << (width.bits - 1);
    if width.signed && bits & sign_bit != 0 {
        Some(bits as i128 - (1i128 << width.bits))
    } else {
        i128::try_from(bits).ok()
    }
}

/// Parse a float; `Ok(None)` when the text is not a number.
pub fn parse_float<F: FromStr>(
    text: &str,
    format: Option<&str>,
    target: &'static str,
) -> Result<Option<F>> {
    if let Some(format) = format
        && let NumberFormat::Hex { .. } = NumberFormat::parse(format, target)?
    {
        return Err(MapError::unsupported_format(
            format,
            target,
            "`X` applies to integers only",
        ));
    }
    Ok(text.parse::<F>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const I32: IntWidth = IntWidth {
        bits: 32,
        signed: true,
    };
    const U8: IntWidth = IntWidth {
        bits: 8,
        signed: false,
    };
    const I8: IntWidth = IntWidth {
        bits: 8,
        signed: true,
    };

    #[test]
    fn decimal_pads_and_keeps_sign() {
        assert_eq!(format_integer(42, Some("D5"), "i32", I32).unwrap(), "00042");
        assert_eq!(format_integer(-42, Some("D4"), "i32", I32).unwrap(), "-0042");
        assert_eq!(format_integer(12345, Some("D2"), "i32", I32).unwrap(), "12345");
    }

    #[test]
    fn hex_formats() {
        assert_eq!(format_integer(255, Some("X"), "i32", I32).unwrap(), "FF");
        assert_eq!(format_integer(255, Some("x4"), "i32", I32).unwrap(), "00ff");
        assert_eq!(parse_integer("00ff", Some("x4"), "i32", I32).unwrap(), Some(255));
    }

    #[test]
    fn zero_patterns() {
        assert_eq!(format_integer(7, Some("000"), "u8", U8).unwrap(), "007");
        assert_eq!(format_float(3.14159, Some("00.00"), "f64").unwrap(), "03.14");
        assert_eq!(format_integer(7, Some("0.0"), "u8", U8).unwrap(), "7.0");
    }

    #[test]
    fn fixed_point() {
        assert_eq!(format_float(2.5, Some("F3"), "f64").unwrap(), "2.500");
        assert_eq!(format_float(-0.5, Some("F1"), "f64").unwrap(), "-0.5");
        assert_eq!(format_integer(2, Some("F"), "i64", IntWidth::I64).unwrap(), "2.00");
    }

    #[test]
    fn unknown_formats_are_rejected() {
        assert!(matches!(
            format_integer(1, Some("Q"), "i32", I32),
            Err(MapError::UnsupportedFormat { .. })
        ));
        assert!(matches!(
            format_float(1.0, Some("X"), "f64"),
            Err(MapError::UnsupportedFormat { .. })
        ));
        assert!(matches!(
            parse_integer("1", Some("0#0"), "i32", I32),
            Err(MapError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn non_numbers_are_soft_failures() {
        assert_eq!(parse_integer("abc", None, "i32", I32).unwrap(), None);
        assert_eq!(parse_float::<f64>("abc", Some("F2"), "f64").unwrap(), None);
        assert_eq!(parse_integer("0042", Some("D4"), "i32", I32).unwrap(), Some(42));
    }

    #[test]
    fn negative_hex_uses_the_target_width() {
        assert_eq!(format_integer(-42, Some("X"), "i32", I32).unwrap(), "FFFFFFD6");
        assert_eq!(parse_integer("FFFFFFD6", Some("X"), "i32", I32).unwrap(), Some(-42));
        assert_eq!(format_integer(-1, Some("x"), "i8", I8).unwrap(), "ff");
        assert_eq!(parse_integer("ff", Some("x"), "i8", I8).unwrap(), Some(-1));
        assert_eq!(parse_integer("ff", Some("x"), "u8", U8).unwrap(), Some(255));
        assert_eq!(parse_integer("1ff", Some("x"), "u8", U8).unwrap(), None);
        assert_eq!(parse_integer("-1", Some("x"), "i8", I8).unwrap(), None);
        assert_eq!(
            format_integer(-42, Some("X"), "integer", IntWidth::I64).unwrap(),
            "FFFFFFFFFFFFFFD6"
        );
    }

    #[test]
    fn integer_formats_read_back() {
        let formats = ["G", "D", "D6", "F", "F3", "0000", "0.0", "00.000", "X", "x8"];
        for format in formats {
            for value in [0i128, 7, 2, -42, i128::from(i32::MAX), i128::from(i32::MIN)] {
                let text = format_integer(value, Some(format), "i32", I32).unwrap();
                assert_eq!(
                    parse_integer(&text, Some(format), "i32", I32).unwrap(),
                    Some(value),
                    "{format} {text}"
                );
            }
        }
    }

    #[test]
    fn fraction_on_integers_must_be_zero() {
        assert_eq!(parse_integer("2.00", Some("F2"), "i32", I32).unwrap(), Some(2));
        assert_eq!(parse_integer("2.50", Some("F2"), "i32", I32).unwrap(), None);
        assert_eq!(parse_integer("2.0", Some("F2"), "i32", I32).unwrap(), None);
        assert_eq!(parse_integer("2", Some("F2"), "i32", I32).unwrap(), None);
        assert_eq!(parse_integer("-7.0", Some("0.0"), "i32", I32).unwrap(), Some(-7));
    }
}
