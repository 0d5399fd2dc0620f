//! Tests for whole-row decoding

use super::*;
use crate::app::services::row_decoder::{FieldMap, decode_row, missing_field_count};
use chrono::{TimeZone, Utc};
use serde_json::json;

#[test]
fn test_flat_row_decodes_published_example() {
    let point = decode_row(&flat_us_row(), &FieldMap::flat());

    assert_eq!(point.date, Some(Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap()));
    assert_eq!(point.deceased_new, Some(5));
    assert_eq!(point.deceased, Some(1000));
    assert_eq!(point.confirmed_new, Some(50));
    assert_eq!(point.confirmed, Some(2000));
    assert!(point.weekly.is_none());

    let value = serde_json::to_value(&point).unwrap();
    assert_eq!(value["date"], json!("2021-01-01T00:00:00.000Z"));
}

#[test]
fn test_sprinkler_row_uses_nine_column_layout() {
    let row = vec![
        json!(1584316800000i64),
        json!("ignored"),
        json!(2),
        json!(30),
        json!(0),
        json!(0),
        json!(0),
        json!("17"),
        json!(400),
    ];
    let point = decode_row(&row, &FieldMap::sprinkler_country());

    assert_eq!(point.deceased_new, Some(2));
    assert_eq!(point.deceased, Some(30));
    assert_eq!(point.confirmed_new, Some(17));
    assert_eq!(point.confirmed, Some(400));
    assert_eq!(missing_field_count(&point), 0);
}

#[test]
fn test_regional_country_row_carries_weekly_figures() {
    let point = decode_row(&regional_country_row(), &FieldMap::regional_country());

    assert_eq!(point.deceased_new, Some(4));
    assert_eq!(point.deceased, Some(250));
    assert_eq!(point.confirmed_new, Some(60));
    assert_eq!(point.confirmed, Some(9000));

    let weekly = point.weekly.expect("regional rows carry weekly figures");
    assert_eq!(weekly.deceased_last7_days, Some(28));
    assert_eq!(weekly.deceased_last7_days_change, Some(-0.125));
    assert_eq!(weekly.deceased_per_million, Some(0.75));
    assert_eq!(weekly.cases_last7_days, Some(420));
    assert_eq!(weekly.cases_last7_days_change, Some(12.5));
    assert_eq!(weekly.cases_per_million, Some(27.9));
}

#[test]
fn test_region_rows_are_shifted_one_column_left() {
    let country_row = regional_country_row();
    let region_row: Vec<_> = std::iter::once(country_row[0].clone())
        .chain(country_row[2..].iter().cloned())
        .collect();

    let from_country = decode_row(&country_row, &FieldMap::regional_country());
    let from_region = decode_row(&region_row, &FieldMap::regional_region());

    assert_eq!(from_country, from_region);
    assert_eq!(FieldMap::regional_country().width(), 12);
    assert_eq!(FieldMap::regional_region().width(), 11);
}

#[test]
fn test_bad_values_become_missing_without_failing() {
    let row = vec![
        json!("not a date"),
        json!("US"),
        json!(null),
        json!("n/a"),
        json!(""),
    ];
    let point = decode_row(&row, &FieldMap::flat());

    assert_eq!(point.date, None);
    assert_eq!(point.deceased_new, None);
    assert_eq!(point.deceased, None);
    assert_eq!(point.confirmed_new, None);
    assert_eq!(point.confirmed, None);
    assert_eq!(missing_field_count(&point), 5);

    let value = serde_json::to_value(&point).unwrap();
    assert_eq!(value["confirmed"], json!(null));
    assert_eq!(value["date"], json!(null));
}

#[test]
fn test_numeric_strings_round_trip_as_numbers() {
    let row = vec![
        json!(1609459200000i64),
        json!("FR"),
        json!("x"),
        json!("7"),
        json!("70"),
        json!("700"),
        json!(7000),
    ];
    let value = serde_json::to_value(decode_row(&row, &FieldMap::flat())).unwrap();

    assert_eq!(value["deceasedNew"], json!(7));
    assert_eq!(value["deceased"], json!(70));
    assert_eq!(value["confirmedNew"], json!(700));
    assert_eq!(value["confirmed"], json!(7000));
}
