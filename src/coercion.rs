//! Column type coercion: turns raw cell input into the display value for a column type.
//!
//! Coercion never fails. Input that does not fit the column type is shown as typed,
//! so the raw value stays visible to the user instead of disappearing.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

use crate::cell::DataType;

lazy_static! {
    static ref NUMERIC_REGEX: Regex = Regex::new(r"^([+-])?(\d*)(?:\.(\d+))?$").unwrap();
    static ref DATE_TOKEN_REGEX: Regex = Regex::new(r"YYYY|YY|MMMM|MMM|MM|M|DD|D").unwrap();
}

/// Date patterns tried, in order, for date columns without an explicit format
const FALLBACK_DATE_PATTERNS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];
const CANONICAL_DATE_PATTERN: &str = "%Y-%m-%d";

/// Separators used when rendering amounts and numbers.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct NumberLocale {
    pub thousands: char,
    pub decimal: char,
}

impl Default for NumberLocale {
    fn default() -> Self {
        NumberLocale {
            thousands: ',',
            decimal: '.',
        }
    }
}

pub fn coerce(raw: &str, data_type: DataType, date_format: Option<&str>) -> String {
    coerce_with_locale(raw, data_type, date_format, &NumberLocale::default())
}

pub fn coerce_with_locale(
    raw: &str,
    data_type: DataType,
    date_format: Option<&str>,
    locale: &NumberLocale,
) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    let coerced = match data_type {
        DataType::Alphanumeric => Some(raw.to_string()),
        DataType::Amount => format_amount(raw, locale),
        DataType::Number => format_number(raw, locale),
        DataType::Date => format_date(raw, date_format),
    };

    coerced.unwrap_or_else(|| raw.to_string())
}

struct NumericParts {
    negative: bool,
    integer: String,
    fraction: Option<String>,
}

fn split_numeric(raw: &str, locale: &NumberLocale) -> Option<NumericParts> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != locale.thousands)
        .map(|c| if c == locale.decimal { '.' } else { c })
        .collect();

    let captures = NUMERIC_REGEX.captures(&cleaned)?;
    let integer = captures.get(2).map_or("", |m| m.as_str());
    let fraction = captures.get(3).map(|m| m.as_str().to_string());
    if integer.is_empty() && fraction.is_none() {
        return None;
    }

    Some(NumericParts {
        negative: captures.get(1).is_some_and(|m| m.as_str() == "-"),
        integer: if integer.is_empty() {
            "0".to_string()
        } else {
            integer.to_string()
        },
        fraction,
    })
}

fn group_thousands(digits: &str, separator: char) -> String {
    let digits = digits.trim_start_matches('0');
    let digits = if digits.is_empty() { "0" } else { digits };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(c);
    }
    grouped
}

/// Two decimals, grouped thousands: `1234.5` -> `1,234.50`.
fn format_amount(raw: &str, locale: &NumberLocale) -> Option<String> {
    let parts = split_numeric(raw, locale)?;
    let mut literal = parts.integer.clone();
    if let Some(fraction) = &parts.fraction {
        literal.push('.');
        literal.push_str(fraction);
    }
    let amount: f64 = literal.parse().ok()?;
    if !amount.is_finite() {
        return None;
    }

    let rounded = format!("{:.2}", amount);
    let (integer, cents) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));
    let is_zero = rounded.chars().all(|c| c == '0' || c == '.');
    let sign = if parts.negative && !is_zero { "-" } else { "" };

    Some(format!(
        "{}{}{}{}",
        sign,
        group_thousands(integer, locale.thousands),
        locale.decimal,
        cents
    ))
}

/// Grouped thousands, fraction kept as typed: `-1234.5` -> `-1,234.5`.
fn format_number(raw: &str, locale: &NumberLocale) -> Option<String> {
    let parts = split_numeric(raw, locale)?;
    let mut out = String::new();
    if parts.negative {
        out.push('-');
    }
    out.push_str(&group_thousands(&parts.integer, locale.thousands));
    if let Some(fraction) = parts.fraction {
        out.push(locale.decimal);
        out.push_str(&fraction);
    }
    Some(out)
}

/// Translate a user-facing date format (`DD/MM/YYYY`) into a chrono pattern.
/// Formats already written with `%` directives are passed through.
pub fn to_chrono_pattern(format: &str) -> String {
    if format.contains('%') {
        return format.to_string();
    }

    DATE_TOKEN_REGEX
        .replace_all(format, |caps: &Captures| {
            match &caps[0] {
                "YYYY" => "%Y",
                "YY" => "%y",
                "MMMM" => "%B",
                "MMM" => "%b",
                "MM" => "%m",
                "M" => "%-m",
                "DD" => "%d",
                "D" => "%-d",
                other => other,
            }
            .to_string()
        })
        .into_owned()
}

pub fn parse_date(raw: &str, date_format: Option<&str>) -> Option<NaiveDate> {
    let raw = raw.trim();
    match date_format {
        Some(format) if !format.trim().is_empty() => {
            NaiveDate::parse_from_str(raw, &to_chrono_pattern(format)).ok()
        }
        _ => FALLBACK_DATE_PATTERNS
            .iter()
            .find_map(|pattern| NaiveDate::parse_from_str(raw, pattern).ok()),
    }
}

fn format_date(raw: &str, date_format: Option<&str>) -> Option<String> {
    let date = parse_date(raw, date_format)?;
    let pattern = match date_format {
        Some(format) if !format.trim().is_empty() => to_chrono_pattern(format),
        _ => CANONICAL_DATE_PATTERN.to_string(),
    };
    format_with_pattern(date, &pattern)
}

/// Format `date` with a chrono pattern. Returns `None` for patterns chrono rejects.
pub fn format_with_pattern(date: NaiveDate, pattern: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", date.format(pattern)).ok()?;
    Some(out)
}
