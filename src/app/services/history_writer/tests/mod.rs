//! Tests for change detection and the write sequence

use crate::models::{DecodedPoint, Snapshot};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;
use std::collections::BTreeMap;


pub fn run_at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 1, 2, 8, minute, 0).unwrap()
}

/// Snapshot with one country whose latest cumulative cases are `confirmed`
pub fn snapshot(confirmed: i64, run: DateTime<Utc>) -> Snapshot {
    let point = DecodedPoint {
        date: Some(Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap()),
        deceased: Some(1000),
        deceased_new: Some(5),
        confirmed: Some(confirmed),
        confirmed_new: None,
        weekly: None,
    };

    Snapshot {
        data_by_country: BTreeMap::from([("United States of America".to_string(), vec![point])]),
        data_by_region: None,
        entity_metadata: None,
        history_data_url: "https://example.org/history".to_string(),
        source_url: "https://covid19.who.int/".to_string(),
        last_updated_at_source: json!("2021-01-02T00:00:00.000Z"),
        last_updated_at_run: run,
        read_me_url: "https://example.org/readme".to_string(),
    }
}
