//! Failover orchestration
//!
//! This module provides the main entry points for scraping URLs. Per
//! URL the resolved backends are tried strictly in order; the first
//! success wins and the remaining backends are skipped. Failed attempts
//! are recorded and surfaced as one aggregate error when the chain is
//! exhausted.

use crate::backends::{build_backend, Backend};
use crate::error::ScrapeError;
use crate::format::format_document;
use crate::strategy::resolve_order;
use crate::types::{FailurePolicy, RawContent, ScrapeOutcome, ScrapeRecord, ScrapeRequest};
use chrono::{SecondsFormat, Utc};
use std::time::Duration;

/// Base delay between re-issued attempts of one backend
const RETRY_BACKOFF: Duration = Duration::from_millis(250);

/// Scrape every URL in the request
///
/// URLs are processed sequentially and independently. Under
/// [`FailurePolicy::Continue`] a URL whose whole failover chain fails
/// yields a [`ScrapeRecord::Failure`] and processing continues; under
/// [`FailurePolicy::Abort`] the first such failure is returned.
pub async fn scrape(request: &ScrapeRequest) -> Result<Vec<ScrapeRecord>, ScrapeError> {
    if request.urls.is_empty() {
        return Err(ScrapeError::MissingUrl);
    }

    let mut records = Vec::with_capacity(request.urls.len());
    for url in &request.urls {
        match scrape_url(url, request).await {
            Ok(outcome) => records.push(ScrapeRecord::Success(outcome)),
            Err(err) => match request.on_error {
                FailurePolicy::Abort => return Err(err),
                FailurePolicy::Continue => {
                    records.push(ScrapeRecord::Failure {
                        error: err.to_string(),
                        url: url.clone(),
                    });
                }
            },
        }
    }

    Ok(records)
}

/// Run the failover chain for a single URL
///
/// Discards the per-attempt error trail of a successful chain; use
/// [`scrape_url_with_report`] to inspect it.
pub async fn scrape_url(url: &str, request: &ScrapeRequest) -> Result<ScrapeOutcome, ScrapeError> {
    Ok(scrape_url_with_report(url, request).await?.outcome)
}

/// Result of a failover chain that ended in success
#[derive(Debug, Clone)]
pub struct FailoverReport {
    /// The winning outcome
    pub outcome: ScrapeOutcome,
    /// One `{backend label}: {message}` entry per backend that failed
    /// before the winner
    pub attempt_errors: Vec<String>,
}

/// Run the failover chain for a single URL, keeping the error trail
///
/// Validates the URL before any network call, then walks the resolved
/// backend order. Individual backend errors never escape; they are
/// folded into the report on success or into
/// [`ScrapeError::AllBackendsFailed`] when no backend succeeds.
pub async fn scrape_url_with_report(
    url: &str,
    request: &ScrapeRequest,
) -> Result<FailoverReport, ScrapeError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ScrapeError::MissingUrl);
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ScrapeError::InvalidUrlScheme);
    }

    let order = resolve_order(
        request.strategy,
        request.failover.reader.is_some(),
        request.failover.scrape_api.is_some(),
    );

    let mut errors = Vec::new();
    for kind in order {
        let backend = build_backend(kind, request);
        tracing::debug!(backend = kind.name(), url, "Trying backend");

        match retrieve_with_retry(backend.as_ref(), url, request.network.retry_count).await {
            Ok(raw) => {
                tracing::debug!(backend = kind.name(), url, "Backend succeeded");
                let document = format_document(raw, &request.output);
                let outcome = ScrapeOutcome {
                    content: document.content,
                    metadata: document.metadata,
                    extra: document.extra,
                    scraping_method: kind.label().to_string(),
                    url: url.to_string(),
                    timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                };
                return Ok(FailoverReport {
                    outcome,
                    attempt_errors: errors,
                });
            }
            Err(err) => {
                tracing::warn!(backend = kind.name(), url, error = %err, "Backend failed");
                errors.push(format!("{}: {}", kind.label(), err));
            }
        }
    }

    Err(ScrapeError::AllBackendsFailed {
        url: url.to_string(),
        errors,
    })
}

/// Re-issue one backend attempt up to `retry_count` times
///
/// Only transport-class errors are retried; configuration errors are
/// deterministic and fail immediately. Backoff is fixed and bounded.
async fn retrieve_with_retry(
    backend: &dyn Backend,
    url: &str,
    retry_count: u32,
) -> Result<RawContent, ScrapeError> {
    let mut attempt: u32 = 0;
    loop {
        match backend.retrieve(url).await {
            Ok(raw) => return Ok(raw),
            Err(err) if err.is_retryable() && attempt < retry_count => {
                attempt += 1;
                tracing::debug!(
                    backend = backend.kind().name(),
                    url,
                    attempt,
                    error = %err,
                    "Retrying backend attempt"
                );
                tokio::time::sleep(RETRY_BACKOFF * attempt).await;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scrape_empty_url_list() {
        let request = ScrapeRequest::new("");
        let result = scrape(&request).await;
        assert!(matches!(result, Err(ScrapeError::MissingUrl)));
    }

    #[tokio::test]
    async fn test_scrape_url_rejects_empty() {
        let request = ScrapeRequest::new("https://example.com");
        let result = scrape_url("   ", &request).await;
        assert!(matches!(result, Err(ScrapeError::MissingUrl)));
    }

    #[tokio::test]
    async fn test_scrape_url_rejects_bad_scheme() {
        let request = ScrapeRequest::new("ftp://example.com");
        let result = scrape_url("ftp://example.com", &request).await;
        assert!(matches!(result, Err(ScrapeError::InvalidUrlScheme)));
    }

    #[tokio::test]
    async fn test_bad_scheme_aborts_batch_by_default() {
        let request = ScrapeRequest::new("ftp://example.com");
        let result = scrape(&request).await;
        assert!(matches!(result, Err(ScrapeError::InvalidUrlScheme)));
    }

    #[tokio::test]
    async fn test_bad_scheme_tolerated_under_continue_policy() {
        let request = ScrapeRequest::new("ftp://example.com").on_error(FailurePolicy::Continue);
        let records = scrape(&request).await.unwrap();
        assert_eq!(records.len(), 1);
        match &records[0] {
            ScrapeRecord::Failure { error, url } => {
                assert!(error.contains("http:// or https://"));
                assert_eq!(url, "ftp://example.com");
            }
            ScrapeRecord::Success(_) => panic!("expected failure record"),
        }
    }
}
