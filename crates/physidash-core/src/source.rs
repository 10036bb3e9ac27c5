//! Document retrieval
//!
//! Polls the backing JSON document the curation agent maintains. A 404 is a
//! valid empty state (the agent simply hasn't curated anything yet); any
//! transport, status, or parse failure falls back to the cached copy.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::FallbackCache;
use crate::config::Config;
use crate::models::DatasetRecord;

/// Request timeout in seconds
const FETCH_TIMEOUT: u64 = 10;

/// Errors that can occur while retrieving the document
#[derive(Error, Debug)]
pub enum SourceError {
    /// Failed to build the HTTP client
    #[error("Failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    /// Network-level failure reaching the source host
    #[error("Request to '{url}' failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The source host answered with an unexpected status
    #[error("Unexpected status {status} from '{url}'")]
    Status { url: String, status: u16 },

    /// The document body is not a valid record array
    #[error("Document at '{url}' is not valid JSON: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result of a single fetch of the backing document
#[derive(Debug)]
pub enum FetchOutcome {
    /// The document was retrieved and parsed
    Document(Vec<DatasetRecord>),
    /// The document does not exist yet (valid empty state, not an error)
    NotFound,
}

/// Result of a full refresh, fallback included
#[derive(Debug)]
pub enum RefreshOutcome {
    /// Fresh copy retrieved from the source (and written through to cache)
    Fresh(Vec<DatasetRecord>),
    /// Document not created yet; the collection is empty
    Empty,
    /// Source unreachable; serving the last cached copy
    Cached(Vec<DatasetRecord>),
    /// Source unreachable and no cache available; keep the current view
    Unavailable,
}

/// Client for the backing document
#[derive(Debug, Clone)]
pub struct DocumentSource {
    client: reqwest::Client,
    url: String,
}

impl DocumentSource {
    /// Build a source for the configured document URL
    pub fn new(config: &Config) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT))
            .build()
            .map_err(SourceError::Client)?;

        Ok(Self {
            client,
            url: config.document_url(),
        })
    }

    /// Source for an explicit URL (for tests)
    pub fn for_url(url: impl Into<String>) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT))
            .build()
            .map_err(SourceError::Client)?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// URL being polled
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the document once
    pub async fn fetch(&self) -> Result<FetchOutcome, SourceError> {
        let response =
            self.client
                .get(&self.url)
                .send()
                .await
                .map_err(|source| SourceError::Transport {
                    url: self.url.clone(),
                    source,
                })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(FetchOutcome::NotFound);
        }
        if !status.is_success() {
            return Err(SourceError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| SourceError::Transport {
                url: self.url.clone(),
                source,
            })?;

        let records =
            serde_json::from_str(&body).map_err(|source| SourceError::Parse {
                url: self.url.clone(),
                source,
            })?;

        Ok(FetchOutcome::Document(records))
    }

    /// Refresh the collection, falling back to the cache on failure
    ///
    /// On success the fetched copy is written through to the cache; a cache
    /// write failure is logged and otherwise ignored (the in-memory state is
    /// what the dashboard shows).
    pub async fn refresh(&self, cache: &FallbackCache) -> RefreshOutcome {
        match self.fetch().await {
            Ok(FetchOutcome::Document(records)) => {
                debug!("Fetched {} records from {}", records.len(), self.url);
                if let Err(e) = cache.store(&records) {
                    warn!("Could not update fallback cache: {}", e);
                }
                RefreshOutcome::Fresh(records)
            }
            Ok(FetchOutcome::NotFound) => {
                debug!("Document at {} not created yet", self.url);
                RefreshOutcome::Empty
            }
            Err(e) => match cache.load() {
                Some(records) => {
                    warn!("Refresh failed ({}); serving cached copy", e);
                    RefreshOutcome::Cached(records)
                }
                None => {
                    warn!("Refresh failed ({}); no cached copy available", e);
                    RefreshOutcome::Unavailable
                }
            },
        }
    }
}
