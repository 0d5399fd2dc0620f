//! Configuration management and validation.
//!
//! [`IngestConfig`] holds the deployment settings for one upstream variant:
//! where to fetch from, which URLs to stamp on the snapshot and which stores
//! to write. [`RunInput`] is the small per-run input object.
//!
//! Layering: variant defaults, then an optional JSON file, then CLI overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::{
    APP_DIR_NAME, DEFAULT_HISTORY_DATASET, DEFAULT_KEY_VALUE_STORE, DEFAULT_STORE_NAME,
    GIS_DATA_URL, GIS_HISTORY_DATASET, GIS_KEY_VALUE_STORE, HISTORY_DATA_URL, INPUT_KEY,
    INPUT_PATH_ENV, KEY_VALUE_STORES_DIR, LATEST_KEY, PAGE_DATA_URL, READ_ME_URL, SITE_URL,
    STORAGE_DIR_ENV,
};
use crate::models::SourceVariant;
use crate::{IngestError, Result};

/// Settings for one ingestion deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Upstream payload shape
    pub variant: SourceVariant,

    /// JSON endpoint fetched each run
    pub source_url: String,

    /// Public page the data is attributed to, emitted as `sourceUrl`
    pub site_url: String,

    pub history_data_url: String,
    pub read_me_url: String,

    /// Key-value store holding the latest record
    pub key_value_store: String,

    /// Dataset receiving changed snapshots
    pub history_dataset: String,

    pub latest_key: String,

    /// Root of the local storage tree
    pub storage_dir: PathBuf,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self::for_variant(SourceVariant::default())
    }
}

impl IngestConfig {
    /// Defaults for the given upstream variant
    pub fn for_variant(variant: SourceVariant) -> Self {
        let (source_url, key_value_store, history_dataset) = match variant {
            SourceVariant::Sprinkler | SourceVariant::Regional => (
                PAGE_DATA_URL,
                DEFAULT_KEY_VALUE_STORE,
                DEFAULT_HISTORY_DATASET,
            ),
            SourceVariant::Flat => (GIS_DATA_URL, GIS_KEY_VALUE_STORE, GIS_HISTORY_DATASET),
        };

        Self {
            variant,
            source_url: source_url.to_string(),
            site_url: SITE_URL.to_string(),
            history_data_url: HISTORY_DATA_URL.to_string(),
            read_me_url: READ_ME_URL.to_string(),
            key_value_store: key_value_store.to_string(),
            history_dataset: history_dataset.to_string(),
            latest_key: LATEST_KEY.to_string(),
            storage_dir: default_storage_dir(),
        }
    }

    /// Load from a JSON file, filling unset fields from variant defaults.
    ///
    /// `variant` (from the command line) takes precedence over the file's
    /// own `variant` key. Every other key set in the file is kept.
    pub fn load(path: &Path, variant: Option<SourceVariant>) -> Result<Self> {
        let body = std::fs::read_to_string(path).map_err(|e| {
            IngestError::configuration(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let mut raw: serde_json::Value = serde_json::from_str(&body).map_err(|e| {
            IngestError::configuration(format!("{} is not valid JSON: {}", path.display(), e))
        })?;

        let file_variant = match raw.get("variant") {
            Some(value) => Some(serde_json::from_value(value.clone()).map_err(|e| {
                IngestError::configuration(format!("Invalid variant in {}: {}", path.display(), e))
            })?),
            None => None,
        };
        let variant = variant.or(file_variant).unwrap_or_default();
        if let Some(overrides) = raw.as_object_mut() {
            overrides.remove("variant");
        }

        let mut merged = serde_json::to_value(Self::for_variant(variant))?;
        if let (Some(base), Some(overrides)) = (merged.as_object_mut(), raw.as_object()) {
            for (key, value) in overrides {
                base.insert(key.clone(), value.clone());
            }
        }

        let config: Self = serde_json::from_value(merged).map_err(|e| {
            IngestError::configuration(format!("Invalid config in {}: {}", path.display(), e))
        })?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = url.into();
        self
    }

    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = dir.into();
        self
    }

    pub fn with_key_value_store(mut self, name: impl Into<String>) -> Self {
        self.key_value_store = name.into();
        self
    }

    pub fn with_history_dataset(mut self, name: impl Into<String>) -> Self {
        self.history_dataset = name.into();
        self
    }

    /// Check URLs and store names before any I/O happens
    pub fn validate(&self) -> Result<()> {
        validate_url("source_url", &self.source_url, true)?;
        validate_url("site_url", &self.site_url, false)?;
        validate_url("history_data_url", &self.history_data_url, false)?;
        validate_url("read_me_url", &self.read_me_url, false)?;

        for (field, value) in [
            ("key_value_store", &self.key_value_store),
            ("history_dataset", &self.history_dataset),
            ("latest_key", &self.latest_key),
        ] {
            if value.trim().is_empty() {
                return Err(IngestError::configuration(format!(
                    "{} cannot be empty",
                    field
                )));
            }
            if value.contains(['/', '\\']) || value == "." || value == ".." {
                return Err(IngestError::configuration(format!(
                    "{} '{}' must be a plain name",
                    field, value
                )));
            }
        }

        if self.key_value_store == DEFAULT_STORE_NAME || self.history_dataset == DEFAULT_STORE_NAME
        {
            return Err(IngestError::configuration(format!(
                "'{}' is reserved for the run input and output",
                DEFAULT_STORE_NAME
            )));
        }

        Ok(())
    }
}

fn validate_url(field: &str, url: &str, allow_local: bool) -> Result<()> {
    if url.trim().is_empty() {
        return Err(IngestError::configuration(format!("{} cannot be empty", field)));
    }

    let remote = url.starts_with("http://") || url.starts_with("https://");
    if remote || (allow_local && (url.starts_with("file://") || !url.contains("://"))) {
        Ok(())
    } else {
        Err(IngestError::configuration(format!(
            "{} '{}' must use http, https{}",
            field,
            url,
            if allow_local { ", file or a plain path" } else { "" }
        )))
    }
}

/// `$WHO_COVID_STORAGE_DIR`, else the user data directory, else `./storage`
pub fn default_storage_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(STORAGE_DIR_ENV).filter(|dir| !dir.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME).join("storage"))
        .unwrap_or_else(|| PathBuf::from("storage"))
}

/// Per-run input object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RunInput {
    /// Address to notify when a run fails or times out
    pub notification_email: Option<String>,
}

impl RunInput {
    pub fn from_file(path: &Path) -> Result<Self> {
        let body = std::fs::read_to_string(path).map_err(|e| {
            IngestError::configuration(format!("Cannot read input {}: {}", path.display(), e))
        })?;
        let input: Self = serde_json::from_str(&body).map_err(|e| {
            IngestError::configuration(format!("Invalid input {}: {}", path.display(), e))
        })?;
        Ok(input.normalized())
    }

    /// Resolve the input from an explicit path, `$WHO_COVID_INPUT`, or the
    /// default store's `INPUT` record. No input at all yields the default.
    pub fn load(explicit: Option<&Path>, storage_dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        if let Some(path) = std::env::var_os(INPUT_PATH_ENV).filter(|p| !p.is_empty()) {
            return Self::from_file(Path::new(&path));
        }

        let stored = storage_dir
            .join(KEY_VALUE_STORES_DIR)
            .join(DEFAULT_STORE_NAME)
            .join(format!("{}.json", INPUT_KEY));
        if stored.is_file() {
            return Self::from_file(&stored);
        }

        debug!("No run input found, using defaults");
        Ok(Self::default())
    }

    fn normalized(mut self) -> Self {
        self.notification_email = self
            .notification_email
            .map(|email| email.trim().to_string())
            .filter(|email| !email.is_empty());
        self
    }
}
