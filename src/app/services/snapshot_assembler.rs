//! Snapshot assembly from built series and run settings

use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use serde_json::Value;

use crate::app::services::series_builder::BuiltSeries;
use crate::config::IngestConfig;
use crate::models::Snapshot;

/// Published URLs stamped onto every snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotLinks {
    pub source_url: String,
    pub history_data_url: String,
    pub read_me_url: String,
}

impl SnapshotLinks {
    pub fn from_config(config: &IngestConfig) -> Self {
        Self {
            source_url: config.site_url.clone(),
            history_data_url: config.history_data_url.clone(),
            read_me_url: config.read_me_url.clone(),
        }
    }
}

/// Wall-clock time truncated to the minute
pub fn run_timestamp(now: DateTime<Utc>) -> DateTime<Utc> {
    now.duration_trunc(TimeDelta::minutes(1)).unwrap_or(now)
}

/// Combine built series with links and timestamps into one snapshot
pub fn assemble_snapshot(
    series: BuiltSeries,
    links: &SnapshotLinks,
    last_updated_at_source: Value,
    now: DateTime<Utc>,
) -> Snapshot {
    Snapshot {
        data_by_country: series.countries,
        data_by_region: series.regions,
        entity_metadata: series.metadata,
        history_data_url: links.history_data_url.clone(),
        source_url: links.source_url.clone(),
        last_updated_at_source,
        last_updated_at_run: run_timestamp(now),
        read_me_url: links.read_me_url.clone(),
    }
}
