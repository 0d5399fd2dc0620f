//! Upstream document fetchers

use reqwest::header::ACCEPT;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use super::JsonFetcher;
use crate::constants::{FETCH_TIMEOUT_SECS, USER_AGENT};
use crate::{IngestError, Result};

/// Fetches JSON over HTTP(S) with a browser-like client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| IngestError::configuration(format!("HTTP client setup failed: {}", e)))?;
        Ok(Self { client })
    }
}

impl JsonFetcher for HttpFetcher {
    async fn fetch_json(&self, url: &str) -> Result<Value> {
        info!("Fetching {}", url);

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| IngestError::fetch(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::http_status(url, status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| IngestError::fetch(url, e.to_string()))?;
        debug!("Received {} bytes from {}", body.len(), url);

        serde_json::from_str(&body)
            .map_err(|e| IngestError::fetch(url, format!("response is not JSON: {}", e)))
    }
}

/// Reads the document from disk, for `file://` URLs and plain paths
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFetcher;

impl FileFetcher {
    pub fn path_of(url: &str) -> PathBuf {
        PathBuf::from(url.strip_prefix("file://").unwrap_or(url))
    }
}

impl JsonFetcher for FileFetcher {
    async fn fetch_json(&self, url: &str) -> Result<Value> {
        let path = Self::path_of(url);
        info!("Reading {}", path.display());

        let body = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| IngestError::fetch(url, e.to_string()))?;

        serde_json::from_str(&body)
            .map_err(|e| IngestError::fetch(url, format!("file is not JSON: {}", e)))
    }
}

/// Picks the HTTP or file fetcher by URL scheme
#[derive(Debug, Clone)]
pub enum AnyFetcher {
    Http(HttpFetcher),
    File(FileFetcher),
}

impl AnyFetcher {
    pub fn for_url(url: &str) -> Result<Self> {
        if is_remote(url) {
            Ok(Self::Http(HttpFetcher::new()?))
        } else {
            Ok(Self::File(FileFetcher))
        }
    }
}

impl JsonFetcher for AnyFetcher {
    async fn fetch_json(&self, url: &str) -> Result<Value> {
        match self {
            Self::Http(fetcher) => fetcher.fetch_json(url).await,
            Self::File(fetcher) => fetcher.fetch_json(url).await,
        }
    }
}

pub fn is_remote(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_file_fetcher_reads_plain_paths_and_file_urls() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{\"rows\": [], \"lastUpdateTime\": 1}}").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let plain = FileFetcher.fetch_json(&path).await.unwrap();
        let url = FileFetcher.fetch_json(&format!("file://{}", path)).await.unwrap();

        assert_eq!(plain, json!({"rows": [], "lastUpdateTime": 1}));
        assert_eq!(plain, url);
    }

    #[tokio::test]
    async fn test_file_fetcher_reports_missing_and_malformed_files() {
        let err = FileFetcher
            .fetch_json("/definitely/not/here.json")
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::Fetch { .. }));

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "<html>maintenance</html>").unwrap();
        let err = FileFetcher
            .fetch_json(&file.path().to_string_lossy())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not JSON"));
    }

    #[test]
    fn test_scheme_selection() {
        assert!(is_remote("https://covid19.who.int/page-data/index/page-data.json"));
        assert!(!is_remote("file:///tmp/page-data.json"));
        assert!(matches!(
            AnyFetcher::for_url("fixtures/flat.json").unwrap(),
            AnyFetcher::File(_)
        ));
        assert_eq!(
            FileFetcher::path_of("file:///tmp/x.json"),
            PathBuf::from("/tmp/x.json")
        );
    }
}
