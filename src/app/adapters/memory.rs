//! In-memory stores for dry runs and tests

use serde_json::Value;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use super::{HistoryLog, LatestStore, OutputSink};
use crate::{IngestError, Result};

const STORE_NAME: &str = "memory";

/// Latest record, history log and output sink held in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    latest: Mutex<Option<Value>>,
    history: Mutex<Vec<Value>>,
    output: Mutex<Vec<Value>>,
    fail_history: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing latest record
    pub fn with_latest(latest: Value) -> Self {
        let store = Self::default();
        *store.latest.lock().unwrap_or_else(|e| e.into_inner()) = Some(latest);
        store
    }

    /// Make every subsequent history append fail
    pub fn fail_history_appends(&self) {
        self.fail_history.store(true, Ordering::SeqCst);
    }

    pub fn latest(&self) -> Option<Value> {
        self.latest.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn history(&self) -> Vec<Value> {
        self.history.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn output(&self) -> Vec<Value> {
        self.output.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl LatestStore for MemoryStore {
    async fn get_latest(&self) -> Result<Option<Value>> {
        Ok(self.latest())
    }

    async fn set_latest(&self, document: &Value) -> Result<()> {
        *self.latest.lock().unwrap_or_else(|e| e.into_inner()) = Some(document.clone());
        Ok(())
    }
}

impl HistoryLog for MemoryStore {
    async fn append(&self, document: &Value) -> Result<()> {
        if self.fail_history.load(Ordering::SeqCst) {
            return Err(IngestError::storage(STORE_NAME, "history append rejected"));
        }
        self.history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(document.clone());
        Ok(())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.history.lock().unwrap_or_else(|e| e.into_inner()).len())
    }
}

impl OutputSink for MemoryStore {
    async fn push(&self, document: &Value) -> Result<()> {
        self.output
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(document.clone());
        Ok(())
    }
}
