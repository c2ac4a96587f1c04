// Raw-text transport for the four CSV sources.
//
// The core only needs the text of each resource; where it comes from is
// decided by whichever `SourceFetcher` the caller hands to `Dataset::load`.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("source not found: {name}")]
    NotFound { name: String },

    #[error("failed to fetch source {name}: {message}")]
    Unavailable { name: String, message: String },

    #[error("unexpected header shape: expected at least {expected} columns, found {found}")]
    HeaderShape { expected: usize, found: usize },

    #[error("unexpected header at column {column}: expected `{expected}`, found `{found}`")]
    HeaderMismatch {
        column: usize,
        expected: &'static str,
        found: String,
    },
}

impl SourceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SourceError::NotFound { .. })
    }
}

// ---------------------------------------------------------------------------
// Fetchers
// ---------------------------------------------------------------------------

/// Fetches the full text of a named resource.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    async fn fetch(&self, name: &str) -> Result<String, SourceError>;
}

/// Reads resources from files under a root directory.
#[derive(Debug, Clone)]
pub struct FileFetcher {
    root: PathBuf,
}

impl FileFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileFetcher { root: root.into() }
    }
}

#[async_trait]
impl SourceFetcher for FileFetcher {
    async fn fetch(&self, name: &str) -> Result<String, SourceError> {
        let path = self.root.join(name);
        debug!("reading source {}", path.display());
        tokio::fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SourceError::NotFound {
                    name: path.display().to_string(),
                }
            } else {
                SourceError::Unavailable {
                    name: path.display().to_string(),
                    message: e.to_string(),
                }
            }
        })
    }
}

/// Per-request limit used when the caller does not pick one.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches resources over HTTP relative to a base URL.
///
/// Every request is bounded by the client timeout, so a server that accepts
/// and never answers yields `Unavailable` instead of stalling the load.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let base_url = base_url.into();
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Unavailable {
                name: base_url.clone(),
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(HttpFetcher { http, base_url })
    }

    fn url(&self, name: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), name.trim_start_matches('/'))
    }
}

#[async_trait]
impl SourceFetcher for HttpFetcher {
    async fn fetch(&self, name: &str) -> Result<String, SourceError> {
        let url = self.url(name);
        debug!("fetching source {}", url);
        let unavailable = |message: String| SourceError::Unavailable {
            name: url.clone(),
            message,
        };
        let request_failed = |e: reqwest::Error| {
            if e.is_timeout() {
                unavailable(format!("timed out: {e}"))
            } else {
                unavailable(e.to_string())
            }
        };

        let response = self.http.get(&url).send().await.map_err(request_failed)?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound { name: url.clone() });
        }
        if !status.is_success() {
            return Err(unavailable(format!("HTTP {status}")));
        }

        response.text().await.map_err(request_failed)
    }
}

/// Serves resources from memory. Names with no entry are not found.
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    texts: HashMap<String, String>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.texts.insert(name.into(), text.into());
        self
    }
}

#[async_trait]
impl SourceFetcher for MemoryFetcher {
    async fn fetch(&self, name: &str) -> Result<String, SourceError> {
        self.texts
            .get(name)
            .cloned()
            .ok_or_else(|| SourceError::NotFound {
                name: name.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
