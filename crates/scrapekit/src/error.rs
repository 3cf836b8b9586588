//! Error types for ScrapeKit

use thiserror::Error;

/// Errors that can occur during scrape operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// No URL was provided
    #[error("No valid URLs provided")]
    MissingUrl,

    /// URL has invalid scheme
    #[error("Invalid URL: must start with http:// or https://")]
    InvalidUrlScheme,

    /// Required API key is missing for an enabled backend
    #[error("{backend} API key is required")]
    MissingApiKey {
        /// Human-readable backend name
        backend: &'static str,
    },

    /// Proxy configuration could not be applied
    #[error("Invalid proxy configuration: {0}")]
    InvalidProxy(String),

    /// Failed to build HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuildError(#[source] reqwest::Error),

    /// Request timed out
    #[error("Request timed out")]
    Timeout,

    /// Failed to connect to server
    #[error("Failed to connect to server")]
    ConnectError(#[source] reqwest::Error),

    /// Backend returned a non-success status
    #[error("Request failed with status {0}")]
    HttpStatus(u16),

    /// Other request/transport error
    #[error("Request failed: {0}")]
    RequestError(String),

    /// Every backend in the failover chain failed for a URL
    #[error("Failed to scrape URL {url} with all available methods. Errors: {}", .errors.join("; "))]
    AllBackendsFailed {
        /// The URL that could not be scraped
        url: String,
        /// One `{backend label}: {message}` entry per failed attempt
        errors: Vec<String>,
    },
}

impl ScrapeError {
    /// Create an error from a reqwest error
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ScrapeError::Timeout
        } else if err.is_connect() {
            ScrapeError::ConnectError(err)
        } else {
            ScrapeError::RequestError(err.to_string())
        }
    }

    /// True for errors that may succeed on a re-issued attempt.
    ///
    /// Configuration and validation errors are deterministic and are
    /// never retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ScrapeError::Timeout
                | ScrapeError::ConnectError(_)
                | ScrapeError::HttpStatus(_)
                | ScrapeError::RequestError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ScrapeError::MissingUrl.to_string(),
            "No valid URLs provided"
        );
        assert_eq!(
            ScrapeError::InvalidUrlScheme.to_string(),
            "Invalid URL: must start with http:// or https://"
        );
        assert_eq!(
            ScrapeError::MissingApiKey {
                backend: "Firecrawl"
            }
            .to_string(),
            "Firecrawl API key is required"
        );
        assert_eq!(
            ScrapeError::HttpStatus(503).to_string(),
            "Request failed with status 503"
        );
    }

    #[test]
    fn test_aggregate_message_joins_all_entries() {
        let err = ScrapeError::AllBackendsFailed {
            url: "https://example.com".to_string(),
            errors: vec![
                "HTTP GET with content extraction: Request timed out".to_string(),
                "Jina AI Reader: Request failed with status 500".to_string(),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("https://example.com"));
        assert!(msg.contains("HTTP GET with content extraction: Request timed out"));
        assert!(msg.contains("; Jina AI Reader: Request failed with status 500"));
    }

    #[test]
    fn test_retryable_classification() {
        assert!(ScrapeError::Timeout.is_retryable());
        assert!(ScrapeError::HttpStatus(500).is_retryable());
        assert!(!ScrapeError::MissingUrl.is_retryable());
        assert!(!ScrapeError::MissingApiKey { backend: "Jina" }.is_retryable());
        assert!(!ScrapeError::InvalidProxy("bad".to_string()).is_retryable());
    }
}
