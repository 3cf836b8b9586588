//! Backend adapters for content retrieval
//!
//! Design: each adapter knows how to retrieve raw content from exactly one
//! kind of backend. The failover orchestrator resolves a trial order of
//! [`BackendKind`] values and dispatches over this closed set.

mod direct;
mod reader;
mod scrape_api;

pub use direct::DirectFetcher;
pub use reader::{ReaderProxy, DEFAULT_READER_HOST};
pub use scrape_api::{ScrapeApi, DEFAULT_SCRAPE_API_HOST};

use crate::error::ScrapeError;
use crate::types::{RawContent, ScrapeRequest};
use async_trait::async_trait;

/// The closed set of retrieval backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Direct HTTP GET with readability extraction
    Direct,
    /// Jina Reader proxy service
    Reader,
    /// Firecrawl scrape API
    ScrapeApi,
}

impl BackendKind {
    /// Short identifier for logging
    pub fn name(&self) -> &'static str {
        match self {
            BackendKind::Direct => "direct",
            BackendKind::Reader => "reader",
            BackendKind::ScrapeApi => "scrape_api",
        }
    }

    /// Human-readable label stamped onto outcomes as `scrapingMethod`
    pub fn label(&self) -> &'static str {
        match self {
            BackendKind::Direct => "HTTP GET with content extraction",
            BackendKind::Reader => "Jina AI Reader",
            BackendKind::ScrapeApi => "Firecrawl API",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Trait for content-retrieval backends
///
/// Implementations return raw content plus backend-native metadata.
/// Formatting happens downstream and is identical for every backend.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Which member of the closed backend set this adapter is
    fn kind(&self) -> BackendKind;

    /// Retrieve raw content for the URL
    ///
    /// Any error is recorded by the orchestrator and triggers failover
    /// to the next backend in the resolved order.
    async fn retrieve(&self, url: &str) -> Result<RawContent, ScrapeError>;
}

/// Construct the adapter for a backend, configured from the request
pub fn build_backend(kind: BackendKind, request: &ScrapeRequest) -> Box<dyn Backend> {
    match kind {
        BackendKind::Direct => Box::new(DirectFetcher::from_request(request)),
        BackendKind::Reader => Box::new(ReaderProxy::from_request(request)),
        BackendKind::ScrapeApi => Box::new(ScrapeApi::from_request(request)),
    }
}
