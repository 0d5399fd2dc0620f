//! Variant-specific views over a fetched upstream document
//!
//! Locates the entity groups, the optional region groups and transmission
//! table, and the source's own last-update stamp. Only a missing top-level
//! container is an error; everything below it is read leniently.

use serde_json::Value;
use std::collections::HashMap;

use super::metadata::{TransmissionRecord, parse_transmission_table};
use crate::app::services::row_decoder::field_parsers::{field, parse_date};
use crate::constants::UNKNOWN_SOURCE_UPDATE;
use crate::constants::offsets::flat;
use crate::models::{RawRow, SourceVariant, iso_timestamp};
use crate::{IngestError, Result};

/// Rows belonging to one upstream code, in upstream order
#[derive(Debug, Clone)]
pub struct EntityGroup<'a> {
    pub code: String,
    pub rows: Vec<&'a RawRow>,
}

/// Borrowed view of everything the builder needs from one payload
#[derive(Debug, Clone)]
pub struct UpstreamPayload<'a> {
    pub variant: SourceVariant,
    pub country_groups: Vec<EntityGroup<'a>>,
    pub region_groups: Option<Vec<EntityGroup<'a>>>,
    pub transmission: Option<Vec<TransmissionRecord>>,
    pub last_updated_at_source: Value,
}

impl<'a> UpstreamPayload<'a> {
    /// Read the payload shape of the given variant
    pub fn from_value(variant: SourceVariant, document: &'a Value) -> Result<Self> {
        match variant {
            SourceVariant::Sprinkler | SourceVariant::Regional => {
                Self::from_raw_data_sets(variant, document)
            }
            SourceVariant::Flat => Self::from_flat_rows(document),
        }
    }

    fn from_raw_data_sets(variant: SourceVariant, document: &'a Value) -> Result<Self> {
        let data_sets = document
            .pointer("/result/pageContext/rawDataSets")
            .ok_or_else(|| {
                IngestError::payload(variant, "missing 'result.pageContext.rawDataSets'")
            })?;

        let country_groups = data_sets
            .get("countryGroups")
            .and_then(Value::as_array)
            .ok_or_else(|| IngestError::payload(variant, "missing 'countryGroups' array"))?;

        let (region_groups, transmission) = if variant.has_regions() {
            let regions = data_sets
                .get("regionGroups")
                .and_then(Value::as_array)
                .map(|groups| groups.iter().map(nested_group).collect())
                .unwrap_or_default();
            let transmission = data_sets
                .get("transmissionData")
                .map(parse_transmission_table)
                .unwrap_or_default();
            (Some(regions), Some(transmission))
        } else {
            (None, None)
        };

        Ok(Self {
            variant,
            country_groups: country_groups.iter().map(nested_group).collect(),
            region_groups,
            transmission,
            last_updated_at_source: data_sets
                .get("lastUpdate")
                .cloned()
                .unwrap_or_else(unknown_update),
        })
    }

    fn from_flat_rows(document: &'a Value) -> Result<Self> {
        let rows = document
            .get("rows")
            .and_then(Value::as_array)
            .ok_or_else(|| IngestError::payload(SourceVariant::Flat, "missing 'rows' array"))?;

        // Insertion-ordered grouping: index by code, rows in upstream order
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut groups: Vec<EntityGroup<'a>> = Vec::new();
        for row in rows {
            let row = as_row(row);
            let code = code_of(field(row, flat::CODE));
            match index.get(&code) {
                Some(&slot) => groups[slot].rows.push(row),
                None => {
                    index.insert(code.clone(), groups.len());
                    groups.push(EntityGroup {
                        code,
                        rows: vec![row],
                    });
                }
            }
        }

        let last_updated_at_source = match document.get("lastUpdateTime") {
            Some(stamp) => parse_date(stamp)
                .map(|dt| Value::String(iso_timestamp::format(&dt)))
                .unwrap_or_else(|| stamp.clone()),
            None => unknown_update(),
        };

        Ok(Self {
            variant: SourceVariant::Flat,
            country_groups: groups,
            region_groups: None,
            transmission: None,
            last_updated_at_source,
        })
    }
}

/// `{ value: code, data: { rows: [...] } }`
fn nested_group(group: &Value) -> EntityGroup<'_> {
    let rows = group
        .pointer("/data/rows")
        .and_then(Value::as_array)
        .map(|rows| rows.iter().map(as_row).collect())
        .unwrap_or_default();

    EntityGroup {
        code: code_of(group.get("value").unwrap_or(&Value::Null)),
        rows,
    }
}

/// Rows that are not arrays decode as if every column were missing
fn as_row(row: &Value) -> &RawRow {
    row.as_array().map(Vec::as_slice).unwrap_or(&[])
}

/// Codes are strings upstream; anything else is kept in its JSON form so it
/// fails resolution and is reported
fn code_of(value: &Value) -> String {
    match value {
        Value::String(code) => code.clone(),
        other => other.to_string(),
    }
}

fn unknown_update() -> Value {
    Value::String(UNKNOWN_SOURCE_UPDATE.to_string())
}
