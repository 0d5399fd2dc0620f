//! Lenient field coercion for upstream row values
//!
//! Upstream rows mix numbers, numeric strings, nulls and the occasional
//! placeholder text. Every parser here returns `None` instead of failing, and
//! `None` is carried through to the snapshot as the not-a-number marker.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Leading integer of a string; trailing text is ignored
static INT_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([+-]?\d+)").expect("valid integer pattern"));

/// Leading decimal of a string; trailing text is ignored
static FLOAT_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)").expect("valid float pattern")
});

static NULL: Value = Value::Null;

/// Value at a positional offset, `null` when the row is too short
pub fn field(row: &[Value], index: usize) -> &Value {
    row.get(index).unwrap_or(&NULL)
}

/// Coerce a value to an integer, truncating fractions toward zero
pub fn parse_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().and_then(truncate_float)),
        Value::String(text) => INT_PREFIX
            .captures(text)
            .and_then(|caps| caps[1].parse::<i64>().ok()),
        _ => None,
    }
}

/// Coerce a value to a finite float
pub fn parse_float(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => FLOAT_PREFIX
            .captures(text)
            .and_then(|caps| caps[1].parse::<f64>().ok()),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

/// Coerce a value to a UTC instant.
///
/// Numbers (and all-digit strings) are epoch milliseconds. Strings are tried
/// as RFC 3339, then as naive date-times and plain dates, both read as UTC.
pub fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().and_then(truncate_float))
            .and_then(DateTime::from_timestamp_millis),
        Value::String(text) => parse_date_str(text.trim()),
        _ => None,
    }
}

fn parse_date_str(text: &str) -> Option<DateTime<Utc>> {
    if text.is_empty() {
        return None;
    }

    if text.bytes().all(|b| b.is_ascii_digit()) {
        return text
            .parse::<i64>()
            .ok()
            .and_then(DateTime::from_timestamp_millis);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn truncate_float(value: f64) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }
    let truncated = value.trunc();
    if truncated < i64::MIN as f64 || truncated > i64::MAX as f64 {
        None
    } else {
        Some(truncated as i64)
    }
}
