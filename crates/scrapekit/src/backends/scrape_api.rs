//! Firecrawl scrape API fetcher
//!
//! Bearer-authenticated POST to the scrape endpoint. The API key is
//! required: enabling this backend without one is a configuration error
//! raised before any network call.

use crate::backends::{Backend, BackendKind};
use crate::error::ScrapeError;
use crate::types::{OutputFormat, RawContent, ScrapeRequest};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

/// Scrape API endpoint used when no host override is configured
pub const DEFAULT_SCRAPE_API_HOST: &str = "https://api.firecrawl.dev";

/// Firecrawl scrape API fetcher
pub struct ScrapeApi {
    api_key: Option<String>,
    api_host: String,
    format: OutputFormat,
    only_main_content: bool,
    timeout: Duration,
}

impl ScrapeApi {
    /// Create a scrape API fetcher with explicit settings
    pub fn new(
        api_key: Option<String>,
        api_host: Option<String>,
        format: OutputFormat,
        only_main_content: bool,
        timeout: Duration,
    ) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.is_empty()),
            api_host: api_host
                .filter(|h| !h.is_empty())
                .unwrap_or_else(|| DEFAULT_SCRAPE_API_HOST.to_string()),
            format,
            only_main_content,
            timeout,
        }
    }

    /// Configure from a scrape request
    pub fn from_request(request: &ScrapeRequest) -> Self {
        let options = request.failover.scrape_api.clone().unwrap_or_default();
        Self::new(
            options.api_key,
            options.api_host,
            request.output.format,
            request.output.extract_main_content,
            Duration::from_millis(request.network.timeout_ms),
        )
    }
}

#[async_trait]
impl Backend for ScrapeApi {
    fn kind(&self) -> BackendKind {
        BackendKind::ScrapeApi
    }

    async fn retrieve(&self, url: &str) -> Result<RawContent, ScrapeError> {
        // Checked before any network call
        let api_key = self.api_key.as_deref().ok_or(ScrapeError::MissingApiKey {
            backend: "Firecrawl",
        })?;

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(ScrapeError::ClientBuildError)?;

        let endpoint = format!("{}/v0/scrape", self.api_host.trim_end_matches('/'));
        let body = json!({
            "url": url,
            "formats": [self.format.as_str()],
            "onlyMainContent": self.only_main_content,
        });

        let response = client
            .post(&endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(ScrapeError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus(status.as_u16()));
        }

        let payload: Value = response.json().await.map_err(ScrapeError::from_reqwest)?;
        Ok(parse_envelope(&payload))
    }
}

/// Unpack the response envelope defensively
///
/// The payload may be nested under `data` or flat. Content is taken in
/// priority order markdown, content, text; metadata when present.
fn parse_envelope(payload: &Value) -> RawContent {
    let data = match payload.get("data") {
        Some(data) if data.is_object() => data,
        _ => payload,
    };

    let content = ["markdown", "content", "text"]
        .iter()
        .find_map(|key| data.get(*key).and_then(Value::as_str))
        .unwrap_or_default()
        .to_string();

    let metadata = data
        .get("metadata")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    RawContent { content, metadata }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_envelope_nested_data() {
        let payload = json!({
            "success": true,
            "data": {
                "markdown": "# Hello",
                "metadata": { "title": "Hello" }
            }
        });
        let raw = parse_envelope(&payload);
        assert_eq!(raw.content, "# Hello");
        assert_eq!(raw.metadata["title"], "Hello");
    }

    #[test]
    fn test_parse_envelope_flat() {
        let payload = json!({ "content": "plain body" });
        let raw = parse_envelope(&payload);
        assert_eq!(raw.content, "plain body");
        assert!(raw.metadata.is_empty());
    }

    #[test]
    fn test_parse_envelope_content_priority() {
        let payload = json!({
            "markdown": "md wins",
            "content": "not this",
            "text": "nor this"
        });
        assert_eq!(parse_envelope(&payload).content, "md wins");

        let payload = json!({ "text": "last resort" });
        assert_eq!(parse_envelope(&payload).content, "last resort");
    }

    #[test]
    fn test_parse_envelope_empty_payload() {
        let raw = parse_envelope(&json!({}));
        assert!(raw.content.is_empty());
        assert!(raw.metadata.is_empty());
    }

    #[tokio::test]
    async fn test_missing_api_key_is_configuration_error() {
        let api = ScrapeApi::new(
            None,
            None,
            OutputFormat::Markdown,
            true,
            Duration::from_secs(30),
        );
        let err = api.retrieve("https://example.com").await.unwrap_err();
        assert!(matches!(
            err,
            ScrapeError::MissingApiKey {
                backend: "Firecrawl"
            }
        ));
    }

    #[test]
    fn test_empty_api_key_treated_as_missing() {
        let api = ScrapeApi::new(
            Some(String::new()),
            None,
            OutputFormat::Markdown,
            true,
            Duration::from_secs(30),
        );
        assert!(api.api_key.is_none());
        assert_eq!(api.api_host, DEFAULT_SCRAPE_API_HOST);
    }
}
