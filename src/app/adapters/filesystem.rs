//! Local storage laid out as named key-value stores and datasets
//!
//! ```text
//! <root>/key_value_stores/<store>/<KEY>.json
//! <root>/datasets/<dataset>/000000001.json
//! ```
//!
//! Files are written to a temporary sibling and renamed into place, so a
//! reader never sees a half-written record.

use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use super::{HistoryLog, LatestStore, OutputSink};
use crate::constants::{DATASET_ITEM_DIGITS, DATASETS_DIR, KEY_VALUE_STORES_DIR};
use crate::{IngestError, Result};

/// Root of the local storage tree
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn key_value_store(&self, name: &str) -> FileKeyValueStore {
        FileKeyValueStore {
            name: name.to_string(),
            dir: self.root.join(KEY_VALUE_STORES_DIR).join(name),
        }
    }

    pub fn dataset(&self, name: &str) -> FileDataset {
        FileDataset {
            name: name.to_string(),
            dir: self.root.join(DATASETS_DIR).join(name),
        }
    }
}

/// A directory of JSON records addressed by key
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    name: String,
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    pub async fn get_value(&self, key: &str) -> Result<Option<Value>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path).await {
            Ok(body) => serde_json::from_str(&body).map(Some).map_err(|e| {
                IngestError::storage(&self.name, format!("{} is not JSON: {}", path.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(IngestError::storage(
                &self.name,
                format!("reading {}: {}", path.display(), e),
            )),
        }
    }

    pub async fn set_value(&self, key: &str, value: &Value) -> Result<()> {
        write_json(&self.name, &self.path_for(key), value).await
    }

    /// Bind one key of this store as the latest-snapshot record
    pub fn record(&self, key: &str) -> FileLatestRecord {
        FileLatestRecord {
            store: self.clone(),
            key: key.to_string(),
        }
    }
}

/// One key of a key-value store used as the latest pointer
#[derive(Debug, Clone)]
pub struct FileLatestRecord {
    store: FileKeyValueStore,
    key: String,
}

impl FileLatestRecord {
    pub fn path(&self) -> PathBuf {
        self.store.path_for(&self.key)
    }
}

impl LatestStore for FileLatestRecord {
    async fn get_latest(&self) -> Result<Option<Value>> {
        self.store.get_value(&self.key).await
    }

    async fn set_latest(&self, document: &Value) -> Result<()> {
        self.store.set_value(&self.key, document).await
    }
}

/// A directory of sequentially numbered JSON items
#[derive(Debug, Clone)]
pub struct FileDataset {
    name: String,
    dir: PathBuf,
}

impl FileDataset {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Sequence numbers of stored items, ascending
    pub async fn item_numbers(&self) -> Result<Vec<u64>> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(IngestError::storage(
                    &self.name,
                    format!("listing {}: {}", self.dir.display(), e),
                ));
            }
        };

        let mut numbers = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| IngestError::storage(&self.name, e.to_string()))?
        {
            if let Some(number) = item_number(&entry.path()) {
                numbers.push(number);
            }
        }
        numbers.sort_unstable();
        Ok(numbers)
    }

    pub async fn push_item(&self, item: &Value) -> Result<PathBuf> {
        let next = self.item_numbers().await?.last().map_or(1, |last| last + 1);
        let path = self.dir.join(format!(
            "{:0width$}.json",
            next,
            width = DATASET_ITEM_DIGITS
        ));
        write_json(&self.name, &path, item).await?;
        Ok(path)
    }

    /// All items in sequence order
    pub async fn items(&self) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        for number in self.item_numbers().await? {
            let path = self.dir.join(format!(
                "{:0width$}.json",
                number,
                width = DATASET_ITEM_DIGITS
            ));
            let body = fs::read_to_string(&path)
                .await
                .map_err(|e| IngestError::storage(&self.name, e.to_string()))?;
            items.push(serde_json::from_str(&body)?);
        }
        Ok(items)
    }
}

impl HistoryLog for FileDataset {
    async fn append(&self, document: &Value) -> Result<()> {
        self.push_item(document).await.map(|_| ())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.item_numbers().await?.len())
    }
}

impl OutputSink for FileDataset {
    async fn push(&self, document: &Value) -> Result<()> {
        self.push_item(document).await.map(|_| ())
    }
}

fn item_number(path: &Path) -> Option<u64> {
    if path.extension()? != "json" {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    if stem.len() == DATASET_ITEM_DIGITS && stem.bytes().all(|b| b.is_ascii_digit()) {
        stem.parse().ok()
    } else {
        None
    }
}

async fn write_json(store: &str, path: &Path, value: &Value) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| IngestError::storage(store, format!("{} has no parent", path.display())))?;
    fs::create_dir_all(parent)
        .await
        .map_err(|e| IngestError::storage(store, format!("creating {}: {}", parent.display(), e)))?;

    let body = serde_json::to_vec_pretty(value)?;
    let staging = path.with_extension("json.tmp");
    fs::write(&staging, body)
        .await
        .map_err(|e| IngestError::storage(store, format!("writing {}: {}", staging.display(), e)))?;
    fs::rename(&staging, path)
        .await
        .map_err(|e| IngestError::storage(store, format!("renaming to {}: {}", path.display(), e)))?;

    debug!("Wrote {}", path.display());
    Ok(())
}
