//! Row decoder for upstream time-series rows
//!
//! Turns one positional upstream row into a [`DecodedPoint`]. Decoding is a
//! pure function of the row and its [`FieldMap`] and never fails: values that
//! do not coerce become `None`.
//!
//! - [`field_map`] - Column offsets for every upstream row shape
//! - [`field_parsers`] - Lenient integer, float and date coercion

pub mod field_map;
pub mod field_parsers;

#[cfg(test)]
pub mod tests;

pub use field_map::{FieldMap, WeeklyOffsets};

use crate::models::{DecodedPoint, RawRow, WeeklyFigures};
use field_parsers::{field, parse_date, parse_float, parse_int};

/// Decode one raw row using the given layout
pub fn decode_row(row: &RawRow, map: &FieldMap) -> DecodedPoint {
    DecodedPoint {
        date: parse_date(field(row, map.date)),
        deceased: parse_int(field(row, map.deceased)),
        deceased_new: parse_int(field(row, map.deceased_new)),
        confirmed: parse_int(field(row, map.confirmed)),
        confirmed_new: parse_int(field(row, map.confirmed_new)),
        weekly: map.weekly.map(|offsets| decode_weekly(row, &offsets)),
    }
}

fn decode_weekly(row: &RawRow, offsets: &WeeklyOffsets) -> WeeklyFigures {
    WeeklyFigures {
        deceased_last7_days: parse_int(field(row, offsets.deceased_last7_days)),
        deceased_last7_days_change: parse_float(field(row, offsets.deceased_last7_days_change)),
        deceased_per_million: parse_float(field(row, offsets.deceased_per_million)),
        cases_last7_days: parse_int(field(row, offsets.cases_last7_days)),
        cases_last7_days_change: parse_float(field(row, offsets.cases_last7_days_change)),
        cases_per_million: parse_float(field(row, offsets.cases_per_million)),
    }
}

/// Count of fields in a decoded point that fell back to the missing marker
pub fn missing_field_count(point: &DecodedPoint) -> usize {
    let base = [
        point.deceased,
        point.deceased_new,
        point.confirmed,
        point.confirmed_new,
    ]
    .iter()
    .filter(|v| v.is_none())
    .count()
        + usize::from(point.date.is_none());

    let weekly = point.weekly.as_ref().map_or(0, |w| {
        [w.deceased_last7_days, w.cases_last7_days]
            .iter()
            .filter(|v| v.is_none())
            .count()
            + [
                w.deceased_last7_days_change,
                w.deceased_per_million,
                w.cases_last7_days_change,
                w.cases_per_million,
            ]
            .iter()
            .filter(|v| v.is_none())
            .count()
    });

    base + weekly
}
