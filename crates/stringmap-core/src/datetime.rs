//! Date and time formats.
//!
//! Templates use the familiar `yyyy-MM-dd HH:mm:ss` token language. A format
//! is translated once into a chrono strftime layout plus a record of which
//! parts it carries, so parsing can default the missing ones.
//!
//! | Token | Meaning |
//! |---|---|
//! | `yyyy` / `yy` | four-digit / two-digit year |
//! | `MMMM` `MMM` `MM` `M` | month name, short name, padded, unpadded |
//! | `dddd` `ddd` `dd` `d` | weekday name, short weekday, padded day, unpadded day |
//! | `HH` `H` / `hh` `h` | 24-hour / 12-hour clock |
//! | `mm` `m` `ss` `s` | minutes and seconds |
//! | `fff` `ffffff` `fffffffff` | fraction with 3, 6 or 9 digits |
//! | `tt` | AM/PM designator |
//! | `'text'` `"text"` `\c` | literal text |
//!
//! The single-letter standard formats `o` (round trip), `s` (sortable) and
//! `u` (universal sortable) are also accepted.

use std::fmt::Write as _;

use chrono::format::{self, Parsed, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};

use crate::error::{MapError, Result};

/// Default layout of a naive date-time.
pub const NAIVE_ROUND_TRIP: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Default layout of a date.
pub const DATE_ROUND_TRIP: &str = "%Y-%m-%d";

/// A translated date format.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateLayout {
    /// chrono strftime layout.
    pub strftime: String,
    pub has_year: bool,
    pub has_month: bool,
    pub has_day: bool,
    pub has_hour: bool,
    pub has_minute: bool,
    pub twelve_hour: bool,
    pub has_meridiem: bool,
}

impl DateLayout {
    /// Translate `format` for a value of kind `target`.
    pub fn translate(format: &str, target: &'static str) -> Result<Self> {
        let bad = |detail: &str| MapError::unsupported_format(format, target, detail);

        let mut chars = format.chars();
        if let (Some(letter), None) = (chars.next(), chars.next()) {
            let strftime = match letter {
                'o' | 'O' if target == "utc date-time" => "%Y-%m-%dT%H:%M:%S%.fZ",
                'o' | 'O' => NAIVE_ROUND_TRIP,
                's' => "%Y-%m-%dT%H:%M:%S",
                'u' => "%Y-%m-%d %H:%M:%SZ",
                _ => return Err(bad("standard formats other than `o`, `s` and `u` are not supported")),
            };
            return Ok(DateLayout {
                strftime: strftime.to_string(),
                has_year: true,
                has_month: true,
                has_day: true,
                has_hour: true,
                has_minute: true,
                ..DateLayout::default()
            });
        }

        let mut layout = DateLayout::default();
        let mut out = String::with_capacity(format.len() * 2);
        let chars: Vec<char> = format.chars().collect();
        let mut i = 0;

        while i < chars.len() {
            let ch = chars[i];
            let mut run = 1;
            while i + run < chars.len() && chars[i + run] == ch {
                run += 1;
            }

            match ch {
                'y' => {
                    out.push_str(if run <= 2 { "%y" } else { "%Y" });
                    layout.has_year = true;
                }
                'M' => {
                    out.push_str(match run {
                        1 => "%-m",
                        2 => "%m",
                        3 => "%b",
                        _ => "%B",
                    });
                    layout.has_month = true;
                }
                'd' => {
                    out.push_str(match run {
                        1 => "%-d",
                        2 => "%d",
                        3 => "%a",
                        _ => "%A",
                    });
                    layout.has_day |= run <= 2;
                }
                'H' => {
                    out.push_str(if run == 1 { "%-H" } else { "%H" });
                    layout.has_hour = true;
                }
                'h' => {
                    out.push_str(if run == 1 { "%-I" } else { "%I" });
                    layout.has_hour = true;
                    layout.twelve_hour = true;
                }
                'm' => {
                    out.push_str(if run == 1 { "%-M" } else { "%M" });
                    layout.has_minute = true;
                }
                's' => out.push_str(if run == 1 { "%-S" } else { "%S" }),
                'f' => out.push_str(match run {
                    3 => "%3f",
                    6 => "%6f",
                    9 => "%9f",
                    _ => return Err(bad("fraction runs are `fff`, `ffffff` or `fffffffff`")),
                }),
                't' => {
                    out.push_str("%p");
                    layout.has_meridiem = true;
                }
                'F' | 'g' | 'z' | 'K' => {
                    return Err(bad("time zone, era and trimmed fraction tokens are not supported"));
                }
                '\'' | '"' => {
                    let Some(close) = chars[i + 1..].iter().position(|c| *c == ch) else {
                        return Err(bad("unterminated quoted literal"));
                    };
                    for lit in &chars[i + 1..i + 1 + close] {
                        push_literal(&mut out, *lit);
                    }
                    i += close + 2;
                    continue;
                }
                '\\' => {
                    let Some(lit) = chars.get(i + 1) else {
                        return Err(bad("trailing escape"));
                    };
                    push_literal(&mut out, *lit);
                    i += 2;
                    continue;
                }
                // `%c` marks `c` as a custom token; the marker itself renders nothing
                '%' => {
                    i += 1;
                    continue;
                }
                _ => {
                    for _ in 0..run {
                        push_literal(&mut out, ch);
                    }
                }
            }

            i += run;
        }

        layout.strftime = out;
        Ok(layout)
    }

    fn fill_defaults(&self, parsed: &mut Parsed) -> Option<()> {
        if !self.has_year {
            parsed.set_year(1).ok()?;
        }
        if !self.has_month {
            parsed.set_month(1).ok()?;
        }
        if !self.has_day {
            parsed.set_day(1).ok()?;
        }
        if !self.has_hour {
            parsed.set_hour(0).ok()?;
        } else if self.twelve_hour && !self.has_meridiem {
            parsed.set_ampm(false).ok()?;
        }
        if !self.has_minute {
            parsed.set_minute(0).ok()?;
        }
        Some(())
    }

    fn parse(&self, text: &str) -> Option<Parsed> {
        let mut parsed = Parsed::new();
        format::parse(&mut parsed, text, StrftimeItems::new(&self.strftime)).ok()?;
        self.fill_defaults(&mut parsed)?;
        Some(parsed)
    }
}

fn push_literal(out: &mut String, ch: char) {
    if ch == '%' {
        out.push_str("%%");
    } else {
        out.push(ch);
    }
}

fn render_with(
    layout: &str,
    format: &str,
    target: &'static str,
    render: impl FnOnce(&mut String) -> std::fmt::Result,
) -> Result<String> {
    let mut out = String::with_capacity(layout.len() + 8);
    render(&mut out).map_err(|_| {
        MapError::unsupported_format(format, target, "the value has no part the format asks for")
    })?;
    Ok(out)
}

// ============================================================================
// Rendering
// ============================================================================

pub fn format_naive(value: &NaiveDateTime, format: Option<&str>) -> Result<String> {
    let Some(format) = format else {
        return Ok(value.format(NAIVE_ROUND_TRIP).to_string());
    };
    let layout = DateLayout::translate(format, "date-time")?;
    render_with(&layout.strftime, format, "date-time", |out| {
        write!(out, "{}", value.format_with_items(StrftimeItems::new(&layout.strftime)))
    })
}

pub fn format_utc(value: &DateTime<Utc>, format: Option<&str>) -> Result<String> {
    let Some(format) = format else {
        return Ok(value.to_rfc3339_opts(SecondsFormat::AutoSi, true));
    };
    let layout = DateLayout::translate(format, "utc date-time")?;
    render_with(&layout.strftime, format, "utc date-time", |out| {
        write!(out, "{}", value.format_with_items(StrftimeItems::new(&layout.strftime)))
    })
}

pub fn format_date(value: &NaiveDate, format: Option<&str>) -> Result<String> {
    let Some(format) = format else {
        return Ok(value.format(DATE_ROUND_TRIP).to_string());
    };
    let layout = DateLayout::translate(format, "date")?;
    render_with(&layout.strftime, format, "date", |out| {
        write!(out, "{}", value.format_with_items(StrftimeItems::new(&layout.strftime)))
    })
}

// ============================================================================
// Parsing
// ============================================================================

pub fn parse_naive(text: &str, format: Option<&str>) -> Result<Option<NaiveDateTime>> {
    let Some(format) = format else {
        return Ok(NaiveDateTime::parse_from_str(text, NAIVE_ROUND_TRIP).ok());
    };
    let layout = DateLayout::translate(format, "date-time")?;
    Ok(layout
        .parse(text)
        .and_then(|parsed| parsed.to_naive_datetime_with_offset(0).ok()))
}

pub fn parse_utc(text: &str, format: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    let Some(format) = format else {
        return Ok(DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|parsed| parsed.with_timezone(&Utc)));
    };
    let layout = DateLayout::translate(format, "utc date-time")?;
    Ok(layout
        .parse(text)
        .and_then(|parsed| parsed.to_naive_datetime_with_offset(0).ok())
        .map(|naive| naive.and_utc()))
}

pub fn parse_date(text: &str, format: Option<&str>) -> Result<Option<NaiveDate>> {
    let Some(format) = format else {
        return Ok(NaiveDate::parse_from_str(text, DATE_ROUND_TRIP).ok());
    };
    let layout = DateLayout::translate(format, "date")?;
    Ok(layout.parse(text).and_then(|parsed| parsed.to_naive_date().ok()))
}

/// Midnight of `date`.
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn translates_tokens() {
        let layout = DateLayout::translate("yyyy-MM-dd/HH-mm-ss", "date-time").unwrap();
        assert_eq!(layout.strftime, "%Y-%m-%d/%H-%M-%S");
        assert!(layout.has_year && layout.has_day && layout.has_minute);
    }

    #[test]
    fn quoted_and_escaped_literals() {
        let layout = DateLayout::translate("yyyy'y'MM\\m'%'", "date").unwrap();
        assert_eq!(layout.strftime, "%Yy%mm%%");
    }

    #[test]
    fn renders_multi_segment_layout() {
        let time = at(2017, 4, 4, 17, 37, 0);
        assert_eq!(
            format_naive(&time, Some("yyyy-MM-dd/HH-mm-ss")).unwrap(),
            "2017-04-04/17-37-00"
        );
    }

    #[test]
    fn parses_with_exact_layout() {
        assert_eq!(
            parse_naive("2017-04-04/17-37-00", Some("yyyy-MM-dd/HH-mm-ss")).unwrap(),
            Some(at(2017, 4, 4, 17, 37, 0))
        );
        assert_eq!(parse_naive("2017-04-04", Some("yyyy-MM-dd/HH-mm-ss")).unwrap(), None);
    }

    #[test]
    fn missing_parts_default() {
        assert_eq!(
            parse_naive("2019/07", Some("yyyy/MM")).unwrap(),
            Some(at(2019, 7, 1, 0, 0, 0))
        );
        assert_eq!(
            parse_naive("14", Some("HH")).unwrap(),
            Some(at(1, 1, 1, 14, 0, 0))
        );
    }

    #[test]
    fn twelve_hour_clock() {
        assert_eq!(
            parse_naive("2020-01-02 03:04 PM", Some("yyyy-MM-dd hh:mm tt")).unwrap(),
            Some(at(2020, 1, 2, 15, 4, 0))
        );
        assert_eq!(
            parse_naive("2020-01-02 03:04", Some("yyyy-MM-dd hh:mm")).unwrap(),
            Some(at(2020, 1, 2, 3, 4, 0))
        );
    }

    #[test]
    fn fractions_round_trip() {
        let time = NaiveDate::from_ymd_opt(2021, 5, 6)
            .unwrap()
            .and_hms_milli_opt(7, 8, 9, 123)
            .unwrap();
        let text = format_naive(&time, Some("yyyyMMddHHmmssfff")).unwrap();
        assert_eq!(text, "20210506070809123");
        assert_eq!(parse_naive(&text, Some("yyyyMMddHHmmssfff")).unwrap(), Some(time));
    }

    #[test]
    fn default_forms_round_trip() {
        let time = at(2017, 4, 4, 17, 37, 0);
        let text = format_naive(&time, None).unwrap();
        assert_eq!(text, "2017-04-04T17:37:00");
        assert_eq!(parse_naive(&text, None).unwrap(), Some(time));

        let utc = time.and_utc();
        let text = format_utc(&utc, None).unwrap();
        assert_eq!(text, "2017-04-04T17:37:00Z");
        assert_eq!(parse_utc(&text, None).unwrap(), Some(utc));

        let date = time.date();
        assert_eq!(parse_date(&format_date(&date, None).unwrap(), None).unwrap(), Some(date));
    }

    #[test]
    fn standard_letters() {
        let time = at(2017, 4, 4, 17, 37, 0);
        assert_eq!(format_naive(&time, Some("s")).unwrap(), "2017-04-04T17:37:00");
        assert_eq!(format_naive(&time, Some("u")).unwrap(), "2017-04-04 17:37:00Z");
        assert_eq!(parse_utc("2017-04-04 17:37:00Z", Some("u")).unwrap(), Some(time.and_utc()));
        assert!(matches!(
            format_naive(&time, Some("D")),
            Err(MapError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn date_rejects_time_tokens() {
        let date = NaiveDate::from_ymd_opt(2017, 4, 4).unwrap();
        assert!(matches!(
            format_date(&date, Some("yyyy HH")),
            Err(MapError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn zone_tokens_are_unsupported() {
        assert!(DateLayout::translate("yyyy zzz", "date-time").is_err());
        assert!(DateLayout::translate("'open", "date-time").is_err());
    }

    #[test]
    fn fraction_runs_have_fixed_widths() {
        for format in ["HH:mm:ss.f", "HH:mm:ss.ff", "HH:mm:ss.ffff", "HH:mm:ss.ffffffff"] {
            assert!(matches!(
                DateLayout::translate(format, "date-time"),
                Err(MapError::UnsupportedFormat { .. })
            ), "{format}");
        }
        assert!(DateLayout::translate("HH:mm:ss.ffffff", "date-time").is_ok());
    }
}
