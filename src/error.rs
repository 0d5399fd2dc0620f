//! Error handling for ingestion runs.
//!
//! Every variant here is fatal to a run. Row-level anomalies (bad numbers,
//! bad dates, unknown country codes) are absorbed by the decoder and resolver
//! and never surface as errors.

use crate::models::SourceVariant;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Upstream {url} answered with HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Unexpected {variant} payload: {message}")]
    Payload {
        variant: SourceVariant,
        message: String,
    },

    #[error("Storage error in '{store}': {message}")]
    Storage { store: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Run interrupted: {reason}")]
    Interrupted { reason: String },
}

impl IngestError {
    /// Create a fetch error for the given URL
    pub fn fetch(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a non-2xx status error
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Create a payload shape error
    pub fn payload(variant: SourceVariant, message: impl Into<String>) -> Self {
        Self::Payload {
            variant,
            message: message.into(),
        }
    }

    /// Create a storage error naming the store involved
    pub fn storage(store: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Storage {
            store: store.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an interruption error
    pub fn interrupted(reason: impl Into<String>) -> Self {
        Self::Interrupted {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_their_context() {
        let err = IngestError::http_status("https://example.org/data.json", 503);
        assert_eq!(
            err.to_string(),
            "Upstream https://example.org/data.json answered with HTTP 503"
        );

        let err = IngestError::payload(SourceVariant::Flat, "missing 'rows' array");
        assert_eq!(
            err.to_string(),
            "Unexpected flat payload: missing 'rows' array"
        );

        let err = IngestError::storage("COVID-19-WHO", "disk full");
        assert!(err.to_string().contains("COVID-19-WHO"));
    }

    #[test]
    fn test_io_error_converts() {
        fn fails() -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"))?;
            Ok(())
        }

        assert!(matches!(fails(), Err(IngestError::Io(_))));
    }
}
