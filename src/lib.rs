//! WHO COVID-19 Ingestion Library
//!
//! Fetches the WHO COVID-19 dashboard feed, reshapes its positional rows into
//! per-country and per-region time series and keeps a latest record plus a
//! change-only history of the resulting snapshots.
//!
//! This library provides tools for:
//! - Decoding positional upstream rows with lenient numeric and date coercion
//! - Resolving ISO country codes to English display names
//! - Building ordered series and transmission metadata per entity
//! - Writing snapshots with history appended only when content changes

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod pipeline;

// Core application modules
pub mod app {
    pub mod adapters;
    pub mod services;
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use config::{IngestConfig, RunInput};
pub use error::{IngestError, Result};
pub use models::{DecodedPoint, EntityMetadata, Snapshot, SourceVariant, WeeklyFigures};
pub use pipeline::{IngestJob, RunOutcome, build_snapshot};
