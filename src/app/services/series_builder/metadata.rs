//! Transmission classification metadata for the regional upstream
//!
//! The `transmissionData` table is a flat list keyed by `ISO_2_CODE`. Rows may
//! be objects with named fields, or arrays described by a sibling `fields`
//! (or `columns`) header.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::app::services::entity_resolver::country_name;
use crate::app::services::row_decoder::field_parsers::parse_date;
use crate::constants::offsets::transmission;
use crate::models::EntityMetadata;

/// One row of the transmission table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransmissionRecord {
    pub code: String,
    pub who_region: Option<String>,
    pub classification: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

impl TransmissionRecord {
    pub fn to_metadata(&self) -> EntityMetadata {
        EntityMetadata {
            who_region: self.who_region.clone(),
            transmission_classification: self.classification.clone(),
            date: self.date,
        }
    }
}

/// Parse every usable row of a transmission table, in table order
pub fn parse_transmission_table(table: &Value) -> Vec<TransmissionRecord> {
    let Some(rows) = table.get("rows").and_then(Value::as_array) else {
        return Vec::new();
    };
    let header = column_names(table);

    rows.iter()
        .filter_map(|row| {
            let lookup = |name: &str| cell(row, &header, name);
            let code = text(lookup(transmission::CODE)?)?;
            Some(TransmissionRecord {
                code,
                who_region: lookup(transmission::WHO_REGION).and_then(text),
                classification: lookup(transmission::CLASSIFICATION).and_then(text),
                date: lookup(transmission::DATE).and_then(parse_date),
            })
        })
        .collect()
}

/// Metadata history for one country: every record whose code names it, in
/// table order, with consecutive identical entries collapsed
pub fn metadata_for(country: &str, records: &[TransmissionRecord]) -> Vec<EntityMetadata> {
    let mut history: Vec<EntityMetadata> = Vec::new();
    for record in records
        .iter()
        .filter(|record| country_name(&record.code) == Some(country))
    {
        let entry = record.to_metadata();
        if history.last() != Some(&entry) {
            history.push(entry);
        }
    }
    history
}

fn column_names(table: &Value) -> Vec<String> {
    ["fields", "columns", "dimensions"]
        .iter()
        .find_map(|key| table.get(*key).and_then(Value::as_array))
        .map(|columns| {
            columns
                .iter()
                .map(|column| match column {
                    Value::String(name) => name.clone(),
                    other => other
                        .get("name")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn cell<'a>(row: &'a Value, header: &[String], name: &str) -> Option<&'a Value> {
    match row {
        Value::Object(fields) => fields.get(name),
        Value::Array(cells) => header
            .iter()
            .position(|column| column == name)
            .and_then(|index| cells.get(index)),
        _ => None,
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
