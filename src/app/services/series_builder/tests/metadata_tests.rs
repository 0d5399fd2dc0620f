//! Tests for transmission metadata extraction

use crate::app::services::series_builder::metadata::{metadata_for, parse_transmission_table};
use chrono::{TimeZone, Utc};
use serde_json::json;

#[test]
fn test_each_matching_row_keeps_its_own_values() {
    let table = json!({
        "rows": [
            { "ISO_2_CODE": "NG", "WHO_REGION": "AFRO", "CLASSIFICATION": "Sporadic cases", "DATE": 1583020800000i64 },
            { "ISO_2_CODE": "NG", "WHO_REGION": "AFRO", "CLASSIFICATION": "Clusters of cases", "DATE": 1585699200000i64 },
            { "ISO_2_CODE": "NG", "WHO_REGION": "AFRO", "CLASSIFICATION": "Community transmission", "DATE": 1593561600000i64 }
        ]
    });
    let records = parse_transmission_table(&table);
    let history = metadata_for("Nigeria", &records);

    let classes: Vec<_> = history
        .iter()
        .map(|m| m.transmission_classification.as_deref().unwrap())
        .collect();
    assert_eq!(
        classes,
        vec!["Sporadic cases", "Clusters of cases", "Community transmission"]
    );
    assert_eq!(
        history[0].date,
        Some(Utc.with_ymd_and_hms(2020, 3, 1, 0, 0, 0).unwrap())
    );
    assert_eq!(history[2].who_region.as_deref(), Some("AFRO"));
}

#[test]
fn test_repeated_identical_rows_collapse() {
    let row = json!({ "ISO_2_CODE": "FR", "WHO_REGION": "EURO", "CLASSIFICATION": "Community transmission", "DATE": "2020-07-01" });
    let table = json!({ "rows": [row.clone(), row.clone(), row] });

    let history = metadata_for("France", &parse_transmission_table(&table));
    assert_eq!(history.len(), 1);
}

#[test]
fn test_array_rows_use_header_columns() {
    let table = json!({
        "fields": ["DATE", "ISO_2_CODE", "WHO_REGION", "CLASSIFICATION"],
        "rows": [
            ["2020-07-01", "BR", "AMRO", "Community transmission"],
            ["2020-07-01", "AR", "AMRO", "Clusters of cases"]
        ]
    });
    let records = parse_transmission_table(&table);

    assert_eq!(records.len(), 2);
    assert_eq!(records[1].code, "AR");
    assert_eq!(records[1].classification.as_deref(), Some("Clusters of cases"));
}

#[test]
fn test_rows_without_code_are_skipped_and_unmatched_codes_yield_nothing() {
    let table = json!({
        "rows": [
            { "WHO_REGION": "EURO", "CLASSIFICATION": "Pending" },
            { "ISO_2_CODE": "", "CLASSIFICATION": "Pending" },
            { "ISO_2_CODE": "SE", "CLASSIFICATION": null, "DATE": "bad" }
        ]
    });
    let records = parse_transmission_table(&table);

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].classification, None);
    assert_eq!(records[0].date, None);
    assert!(metadata_for("Norway", &records).is_empty());
}

#[test]
fn test_table_without_rows_is_empty() {
    assert!(parse_transmission_table(&json!({})).is_empty());
    assert!(parse_transmission_table(&json!({ "rows": "none" })).is_empty());
}

#[test]
fn test_lowercase_and_alpha3_codes_match_the_same_country() {
    let table = json!({
        "rows": [
            { "ISO_2_CODE": "ng", "WHO_REGION": "AFRO", "CLASSIFICATION": "Sporadic cases", "DATE": "2020-03-01" },
            { "ISO_2_CODE": "NGA", "WHO_REGION": "AFRO", "CLASSIFICATION": "Clusters of cases", "DATE": "2020-04-01" },
            { "ISO_2_CODE": "NE", "WHO_REGION": "AFRO", "CLASSIFICATION": "Sporadic cases", "DATE": "2020-04-01" }
        ]
    });
    let history = metadata_for("Nigeria", &parse_transmission_table(&table));

    assert_eq!(history.len(), 2);
    assert_eq!(
        history[1].transmission_classification.as_deref(),
        Some("Clusters of cases")
    );
}
