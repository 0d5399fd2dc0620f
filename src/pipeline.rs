//! One ingestion run: fetch, build, write
//!
//! [`build_snapshot`] is the pure transform from a fetched document to a
//! [`Snapshot`]. [`IngestJob`] wraps it with the fetch, the optional webhook
//! registration and the change-gated write.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::Result;
use crate::app::adapters::{
    HistoryLog, JsonFetcher, LatestStore, OutputSink, WebhookRegistrar, WebhookRegistration,
};
use crate::app::services::history_writer::{HistoryWriter, WriteOutcome};
use crate::app::services::series_builder::{BuildStats, SeriesBuilder, UpstreamPayload};
use crate::app::services::snapshot_assembler::{SnapshotLinks, assemble_snapshot};
use crate::config::{IngestConfig, RunInput};
use crate::models::{Snapshot, SourceVariant};

/// Turn a fetched upstream document into a snapshot
pub fn build_snapshot(
    variant: SourceVariant,
    document: &Value,
    links: &SnapshotLinks,
    now: DateTime<Utc>,
) -> Result<(Snapshot, BuildStats)> {
    let payload = UpstreamPayload::from_value(variant, document)?;
    let last_updated_at_source = payload.last_updated_at_source.clone();

    let built = SeriesBuilder::new(variant).build(&payload);
    let stats = built.stats.clone();

    for code in &stats.unresolved_codes {
        debug!("Dropped unresolved code {}", code);
    }
    if !stats.duplicate_codes.is_empty() {
        warn!(
            "Skipped repeated groups for {}",
            stats.duplicate_codes.join(", ")
        );
    }

    Ok((
        assemble_snapshot(built, links, last_updated_at_source, now),
        stats,
    ))
}

/// Summary of a finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunOutcome {
    pub variant: SourceVariant,
    pub countries: usize,
    pub regions: usize,
    pub points: usize,
    pub unresolved_codes: Vec<String>,
    pub duplicate_codes: Vec<String>,
    pub history_appended: bool,
    pub had_previous: bool,
    pub webhook_registered: bool,
}

impl RunOutcome {
    fn new(variant: SourceVariant, stats: BuildStats) -> Self {
        Self {
            variant,
            countries: stats.countries,
            regions: stats.regions,
            points: stats.points,
            unresolved_codes: stats.unresolved_codes,
            duplicate_codes: stats.duplicate_codes,
            history_appended: false,
            had_previous: false,
            webhook_registered: false,
        }
    }
}

/// Fetches one upstream document and turns it into a snapshot
pub struct IngestJob<F, W> {
    config: IngestConfig,
    links: SnapshotLinks,
    fetcher: F,
    webhooks: W,
}

impl<F, W> IngestJob<F, W>
where
    F: JsonFetcher + Sync,
    W: WebhookRegistrar + Sync,
{
    pub fn new(config: IngestConfig, fetcher: F, webhooks: W) -> Self {
        let links = SnapshotLinks::from_config(&config);
        Self {
            config,
            links,
            fetcher,
            webhooks,
        }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    pub fn webhooks(&self) -> &W {
        &self.webhooks
    }

    /// Register the failure webhook when the input names an address
    pub async fn register_notifications(&self, input: &RunInput) -> Result<bool> {
        match &input.notification_email {
            Some(email) => {
                self.webhooks
                    .register(&WebhookRegistration::for_email(email))
                    .await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Fetch and build without touching any store
    pub async fn fetch_snapshot(&self, now: DateTime<Utc>) -> Result<(Snapshot, BuildStats)> {
        info!("CRAWLER -- start");
        let document = self.fetcher.fetch_json(&self.config.source_url).await?;
        let built = build_snapshot(self.config.variant, &document, &self.links, now)?;
        info!("CRAWLER -- finish");
        Ok(built)
    }

    /// Full run: notify registration, fetch, build, then write to the stores
    pub async fn run<L, H, O>(
        &self,
        input: &RunInput,
        latest: &L,
        history: &H,
        output: &O,
        now: DateTime<Utc>,
    ) -> Result<RunOutcome>
    where
        L: LatestStore + Sync,
        H: HistoryLog + Sync,
        O: OutputSink + Sync,
    {
        let webhook_registered = self.register_notifications(input).await?;

        let (snapshot, stats) = self.fetch_snapshot(now).await?;
        info!("Processing and saving data");

        let WriteOutcome {
            history_appended,
            had_previous,
        } = HistoryWriter::new(latest, history, output)
            .write_if_changed(&snapshot)
            .await?;

        let mut outcome = RunOutcome::new(self.config.variant, stats);
        outcome.history_appended = history_appended;
        outcome.had_previous = had_previous;
        outcome.webhook_registered = webhook_registered;

        info!("Done");
        Ok(outcome)
    }
}
