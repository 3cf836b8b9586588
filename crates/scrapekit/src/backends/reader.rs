//! Jina Reader proxy fetcher
//!
//! The reader service fetches and converts the target page itself; the
//! response body is already markdown-like text. Unauthenticated requests
//! are valid against the public tier, a bearer token is attached only
//! when a key is configured.

use crate::backends::{Backend, BackendKind};
use crate::error::ScrapeError;
use crate::types::{RawContent, ScrapeRequest};
use async_trait::async_trait;
use std::time::Duration;

/// Public reader endpoint used when no host override is configured
pub const DEFAULT_READER_HOST: &str = "https://r.jina.ai";

/// Jina Reader proxy fetcher
pub struct ReaderProxy {
    api_key: Option<String>,
    api_host: String,
    timeout: Duration,
}

impl ReaderProxy {
    /// Create a reader fetcher with explicit settings
    pub fn new(api_key: Option<String>, api_host: Option<String>, timeout: Duration) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.is_empty()),
            api_host: api_host
                .filter(|h| !h.is_empty())
                .unwrap_or_else(|| DEFAULT_READER_HOST.to_string()),
            timeout,
        }
    }

    /// Configure from a scrape request
    pub fn from_request(request: &ScrapeRequest) -> Self {
        let options = request.failover.reader.clone().unwrap_or_default();
        Self::new(
            options.api_key,
            options.api_host,
            Duration::from_millis(request.network.timeout_ms),
        )
    }
}

#[async_trait]
impl Backend for ReaderProxy {
    fn kind(&self) -> BackendKind {
        BackendKind::Reader
    }

    async fn retrieve(&self, url: &str) -> Result<RawContent, ScrapeError> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(ScrapeError::ClientBuildError)?;

        // The reader takes the target URL as its path
        let endpoint = format!("{}/{}", self.api_host.trim_end_matches('/'), url);

        let mut request = client.get(&endpoint);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(ScrapeError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus(status.as_u16()));
        }

        let body = response.text().await.map_err(ScrapeError::from_reqwest)?;
        Ok(RawContent::bare(body))
    }
}
