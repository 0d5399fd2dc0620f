//! Core data structures for WHO COVID-19 ingestion.
//!
//! Defines the upstream variants, the decoded time-series point, per-country
//! transmission metadata and the snapshot document persisted every run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::Result;

/// One upstream row: untyped values at fixed positional offsets
pub type RawRow = [serde_json::Value];

/// Upstream payload shapes the job knows how to read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceVariant {
    /// `result.pageContext.rawDataSets.countryGroups[]`, 9-column country rows
    #[default]
    Sprinkler,
    /// Sprinkler shape plus `regionGroups[]` and a `transmissionData` table
    Regional,
    /// Top-level `rows[]` of `[date, code, region, deaths, cumDeaths, cases, cumCases]`
    Flat,
}

impl SourceVariant {
    pub const ALL: [SourceVariant; 3] = [
        SourceVariant::Sprinkler,
        SourceVariant::Regional,
        SourceVariant::Flat,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SourceVariant::Sprinkler => "sprinkler",
            SourceVariant::Regional => "regional",
            SourceVariant::Flat => "flat",
        }
    }

    /// Whether this upstream carries WHO region series and transmission metadata
    pub fn has_regions(&self) -> bool {
        matches!(self, SourceVariant::Regional)
    }
}

impl fmt::Display for SourceVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SourceVariant {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sprinkler" | "a" => Ok(SourceVariant::Sprinkler),
            "regional" | "b" => Ok(SourceVariant::Regional),
            "flat" | "gis" | "c" => Ok(SourceVariant::Flat),
            other => Err(format!(
                "unknown source variant '{}' (expected sprinkler, regional or flat)",
                other
            )),
        }
    }
}

/// Seven-day and per-million figures only the regional upstream publishes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyFigures {
    pub deceased_last7_days: Option<i64>,
    pub deceased_last7_days_change: Option<f64>,
    pub deceased_per_million: Option<f64>,
    pub cases_last7_days: Option<i64>,
    pub cases_last7_days_change: Option<f64>,
    pub cases_per_million: Option<f64>,
}

/// A single dated observation for one country or region.
///
/// Numeric fields that failed to parse are `None` and serialize as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedPoint {
    #[serde(serialize_with = "iso_timestamp::serialize_option")]
    pub date: Option<DateTime<Utc>>,
    pub deceased: Option<i64>,
    pub deceased_new: Option<i64>,
    pub confirmed: Option<i64>,
    pub confirmed_new: Option<i64>,
    #[serde(flatten)]
    pub weekly: Option<WeeklyFigures>,
}

/// Transmission classification recorded for a country on a date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityMetadata {
    pub who_region: Option<String>,
    pub transmission_classification: Option<String>,
    #[serde(serialize_with = "iso_timestamp::serialize_option")]
    pub date: Option<DateTime<Utc>>,
}

/// The document produced, persisted and emitted once per run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub data_by_country: BTreeMap<String, Vec<DecodedPoint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_by_region: Option<BTreeMap<String, Vec<DecodedPoint>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_metadata: Option<BTreeMap<String, Vec<EntityMetadata>>>,
    pub history_data_url: String,
    pub source_url: String,
    pub last_updated_at_source: serde_json::Value,
    #[serde(serialize_with = "iso_timestamp::serialize")]
    pub last_updated_at_run: DateTime<Utc>,
    pub read_me_url: String,
}

impl Snapshot {
    /// Serialize into the JSON document handed to stores and sinks
    pub fn to_document(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// ISO-8601 UTC timestamps with millisecond precision and a `Z` suffix
pub mod iso_timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::Serializer;

    pub fn format(timestamp: &DateTime<Utc>) -> String {
        timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn serialize<S: Serializer>(
        timestamp: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(timestamp))
    }

    pub fn serialize_option<S: Serializer>(
        timestamp: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match timestamp {
            Some(ts) => serializer.serialize_str(&format(ts)),
            None => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn point(day: u32, confirmed: Option<i64>) -> DecodedPoint {
        DecodedPoint {
            date: Some(Utc.with_ymd_and_hms(2021, 1, day, 0, 0, 0).unwrap()),
            deceased: Some(10),
            deceased_new: Some(1),
            confirmed,
            confirmed_new: None,
            weekly: None,
        }
    }

    #[test]
    fn test_point_serializes_camel_case_with_null_sentinel() {
        let value = serde_json::to_value(point(1, Some(2000))).unwrap();
        assert_eq!(
            value,
            json!({
                "date": "2021-01-01T00:00:00.000Z",
                "deceased": 10,
                "deceasedNew": 1,
                "confirmed": 2000,
                "confirmedNew": null,
            })
        );
    }

    #[test]
    fn test_weekly_figures_flatten_into_point() {
        let mut p = point(2, Some(5));
        p.weekly = Some(WeeklyFigures {
            deceased_last7_days: Some(7),
            deceased_last7_days_change: Some(-0.5),
            deceased_per_million: None,
            cases_last7_days: Some(70),
            cases_last7_days_change: Some(1.25),
            cases_per_million: Some(12.0),
        });

        let value = serde_json::to_value(&p).unwrap();
        assert_eq!(value["deceasedLast7Days"], json!(7));
        assert_eq!(value["deceasedPerMillion"], json!(null));
        assert_eq!(value["casesLast7DaysChange"], json!(1.25));
        assert!(value.get("weekly").is_none());
    }

    #[test]
    fn test_snapshot_document_shape() {
        let snapshot = Snapshot {
            data_by_country: BTreeMap::from([("Chad".to_string(), vec![point(3, Some(1))])]),
            data_by_region: None,
            entity_metadata: None,
            history_data_url: "h".to_string(),
            source_url: "s".to_string(),
            last_updated_at_source: json!("N/A"),
            last_updated_at_run: Utc.with_ymd_and_hms(2021, 1, 3, 12, 30, 0).unwrap(),
            read_me_url: "r".to_string(),
        };

        let full = snapshot.to_document().unwrap();
        assert_eq!(full["lastUpdatedAtRun"], json!("2021-01-03T12:30:00.000Z"));
        assert!(full.get("dataByRegion").is_none());
        assert!(full.get("entityMetadata").is_none());
        assert_eq!(full["lastUpdatedAtSource"], json!("N/A"));
    }

    #[test]
    fn test_variant_parsing() {
        assert_eq!("Regional".parse::<SourceVariant>().unwrap(), SourceVariant::Regional);
        assert_eq!("c".parse::<SourceVariant>().unwrap(), SourceVariant::Flat);
        assert!("csv".parse::<SourceVariant>().is_err());
        assert!(SourceVariant::Regional.has_regions());
        assert!(!SourceVariant::Sprinkler.has_regions());
    }
}
