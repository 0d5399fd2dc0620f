//! Latest-record overwrite with change-gated history appends
//!
//! Each run reads the previous latest document, appends the new snapshot to
//! history only when its content differs, then overwrites the latest record
//! and emits the snapshot. Any store failure aborts the write sequence at the
//! step that failed; nothing is rolled back.

pub mod equality;

#[cfg(test)]
pub mod tests;

pub use equality::same_content;

use tracing::{debug, info};

use crate::Result;
use crate::app::adapters::{HistoryLog, LatestStore, OutputSink};
use crate::models::Snapshot;

/// What a write did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
    pub history_appended: bool,
    pub had_previous: bool,
}

/// Writes snapshots to borrowed latest, history and output stores
pub struct HistoryWriter<'a, L, H, O> {
    latest: &'a L,
    history: &'a H,
    output: &'a O,
}

impl<'a, L, H, O> HistoryWriter<'a, L, H, O>
where
    L: LatestStore + Sync,
    H: HistoryLog + Sync,
    O: OutputSink + Sync,
{
    pub fn new(latest: &'a L, history: &'a H, output: &'a O) -> Self {
        Self {
            latest,
            history,
            output,
        }
    }

    pub async fn write_if_changed(&self, snapshot: &Snapshot) -> Result<WriteOutcome> {
        let document = snapshot.to_document()?;
        let previous = self.latest.get_latest().await?;

        let changed = match &previous {
            Some(previous) => !same_content(previous, &document),
            None => true,
        };

        if changed {
            self.history.append(&document).await?;
            info!("Content changed, appended snapshot to history");
        } else {
            info!("Content unchanged since last run, history left as is");
        }

        self.latest.set_latest(&document).await?;
        self.output.push(&document).await?;
        debug!("Latest record and run output updated");

        Ok(WriteOutcome {
            history_appended: changed,
            had_previous: previous.is_some(),
        })
    }
}
