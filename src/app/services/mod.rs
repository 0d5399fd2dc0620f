//! Core ingestion services
//!
//! - [`row_decoder`] - Positional row to typed point
//! - [`entity_resolver`] - Code to display name, dedup and ordering
//! - [`series_builder`] - Per-entity series and metadata
//! - [`snapshot_assembler`] - Snapshot document assembly
//! - [`history_writer`] - Change-gated persistence

pub mod entity_resolver;
pub mod history_writer;
pub mod row_decoder;
pub mod series_builder;
pub mod snapshot_assembler;
