//! Collaborator seams around the ingestion core
//!
//! The core never touches the network or disk directly. It talks to these
//! traits, which have filesystem/HTTP implementations for real runs and
//! in-memory ones for tests.
//!
//! - [`fetcher`] - Fetch one JSON document by URL
//! - [`filesystem`] - Local key-value stores and datasets
//! - [`memory`] - In-memory stores
//! - [`webhook`] - Failure notification registration

pub mod fetcher;
pub mod filesystem;
pub mod memory;
pub mod webhook;

use serde_json::Value;
use std::future::Future;

use crate::Result;

pub use fetcher::{AnyFetcher, FileFetcher, HttpFetcher};
pub use filesystem::{FileDataset, FileKeyValueStore, FileLatestRecord, FileStorage};
pub use memory::MemoryStore;
pub use webhook::{LoggingWebhookRegistrar, WebhookRegistration};

/// Fetches the upstream document
pub trait JsonFetcher {
    fn fetch_json(&self, url: &str) -> impl Future<Output = Result<Value>> + Send;
}

/// Singleton record holding the most recent snapshot
pub trait LatestStore {
    fn get_latest(&self) -> impl Future<Output = Result<Option<Value>>> + Send;

    fn set_latest(&self, document: &Value) -> impl Future<Output = Result<()>> + Send;
}

/// Append-only log of snapshots whose content changed
pub trait HistoryLog {
    fn append(&self, document: &Value) -> impl Future<Output = Result<()>> + Send;

    fn len(&self) -> impl Future<Output = Result<usize>> + Send;
}

/// Receives the snapshot emitted by the current run
pub trait OutputSink {
    fn push(&self, document: &Value) -> impl Future<Output = Result<()>> + Send;
}

/// Registers a notification hook for failed or timed-out runs
pub trait WebhookRegistrar {
    fn register(
        &self,
        registration: &WebhookRegistration,
    ) -> impl Future<Output = Result<()>> + Send;
}
