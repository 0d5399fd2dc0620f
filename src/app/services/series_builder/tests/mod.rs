//! Tests for payload views, series building and transmission metadata

use serde_json::{Value, json};

mod metadata_tests;

/// Sprinkler-shaped document with the given `(code, rows)` country groups
pub fn sprinkler_document(groups: Vec<(&str, Vec<Value>)>) -> Value {
    let country_groups: Vec<Value> = groups
        .into_iter()
        .map(|(code, rows)| json!({ "value": code, "data": { "rows": rows } }))
        .collect();

    json!({
        "result": {
            "pageContext": {
                "rawDataSets": {
                    "lastUpdate": "2021-01-02T10:00:00.000Z",
                    "countryGroups": country_groups,
                }
            }
        }
    })
}

/// Nine-column sprinkler row for a day in January 2021
pub fn sprinkler_row(day: u32, deaths: i64, cum_deaths: i64, cases: i64, cum_cases: i64) -> Value {
    let millis = 1609459200000i64 + i64::from(day - 1) * 86_400_000;
    json!([millis, 0, deaths, cum_deaths, 0, 0, 0, cases, cum_cases])
}

/// Regional document with one country, two regions and a transmission table
pub fn regional_document() -> Value {
    json!({
        "result": {
            "pageContext": {
                "rawDataSets": {
                    "lastUpdate": 1609545600000i64,
                    "countryGroups": [
                        {
                            "value": "NG",
                            "data": { "rows": [
                                [1609459200000i64, 1, 2, 1200, 14, 0.5, 5.8, 300, 87000, 2100, 12.0, 420.1]
                            ]}
                        },
                        { "value": "ZZ", "data": { "rows": [[1609459200000i64]] } }
                    ],
                    "regionGroups": [
                        {
                            "value": "EURO",
                            "data": { "rows": [
                                [1609459200000i64, 3000, 570000, 21000, -0.02, 610.3, 250000, 23000000, 1600000, 0.04, 24700.0]
                            ]}
                        },
                        {
                            "value": "AFRO",
                            "data": { "rows": [
                                [1609459200000i64, 200, 50000, 1400, 0.1, 45.2, 10000, 1900000, 70000, 0.2, 1700.5]
                            ]}
                        }
                    ],
                    "transmissionData": {
                        "rows": [
                            { "ISO_2_CODE": "NG", "WHO_REGION": "AFRO", "CLASSIFICATION": "Clusters of cases", "DATE": 1585699200000i64 },
                            { "ISO_2_CODE": "FR", "WHO_REGION": "EURO", "CLASSIFICATION": "Community transmission", "DATE": 1585699200000i64 },
                            { "ISO_2_CODE": "NG", "WHO_REGION": "AFRO", "CLASSIFICATION": "Community transmission", "DATE": 1593561600000i64 }
                        ]
                    }
                }
            }
        }
    })
}

/// Flat GIS document with rows for the given codes
pub fn flat_document(rows: Vec<Value>) -> Value {
    json!({ "rows": rows, "lastUpdateTime": 1609545600000i64 })
}

pub fn flat_row(millis: i64, code: &str, deaths: i64, cum_deaths: i64) -> Value {
    json!([millis, code, "AMRO", deaths, cum_deaths, deaths * 10, cum_deaths * 10])
}
