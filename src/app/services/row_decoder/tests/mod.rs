//! Tests for the row decoder and its field parsers

use serde_json::{Value, json};

mod decoder_tests;

/// Flat GIS row from the published example: 2021-01-01, United States
pub fn flat_us_row() -> Vec<Value> {
    vec![
        json!(1609459200000i64),
        json!("US"),
        json!(100),
        json!(5),
        json!(1000),
        json!(50),
        json!(2000),
    ]
}

/// Twelve-column regional country row with weekly figures
pub fn regional_country_row() -> Vec<Value> {
    vec![
        json!(1609459200000i64),
        json!(3),
        json!(4),
        json!(250),
        json!(28),
        json!(-0.125),
        json!(0.75),
        json!(60),
        json!(9000),
        json!(420),
        json!("12.5"),
        json!(27.9),
    ]
}
