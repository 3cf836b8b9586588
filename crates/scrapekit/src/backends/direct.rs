//! Direct HTTP fetcher
//!
//! Issues a plain GET with the configured timeout, user agent, custom
//! headers and optional proxy, then runs readability extraction on the
//! returned markup when main-content extraction is requested.

use crate::backends::{Backend, BackendKind};
use crate::error::ScrapeError;
use crate::types::{NetworkOptions, ProxyOptions, RawContent, ScrapeRequest};
use crate::DEFAULT_USER_AGENT;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use scraper::{Html, Selector};
use serde_json::{Map, Value};
use std::io::Cursor;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Direct HTTP fetcher
///
/// The only backend that is always enabled: it needs no credentials.
/// A declared proxy is never silently bypassed; if the proxy
/// configuration cannot be applied the attempt fails.
pub struct DirectFetcher {
    network: NetworkOptions,
    proxy: Option<ProxyOptions>,
    extract_main_content: bool,
}

impl DirectFetcher {
    /// Create a direct fetcher with explicit settings
    pub fn new(
        network: NetworkOptions,
        proxy: Option<ProxyOptions>,
        extract_main_content: bool,
    ) -> Self {
        Self {
            network,
            proxy,
            extract_main_content,
        }
    }

    /// Configure from a scrape request
    pub fn from_request(request: &ScrapeRequest) -> Self {
        Self::new(
            request.network.clone(),
            request.failover.proxy.clone(),
            request.output.extract_main_content,
        )
    }

    fn build_client(&self) -> Result<reqwest::Client, ScrapeError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.network.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT)),
        );
        for (name, value) in &self.network.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => warn!(header = %name, "Skipping invalid custom header"),
            }
        }

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(self.network.timeout_ms));

        if let Some(ref proxy) = self.proxy {
            let mut reqwest_proxy = reqwest::Proxy::all(proxy.endpoint())
                .map_err(|e| ScrapeError::InvalidProxy(e.to_string()))?;
            if let Some(ref username) = proxy.username {
                let password = proxy.password.as_deref().unwrap_or("");
                reqwest_proxy = reqwest_proxy.basic_auth(username, password);
            }
            builder = builder.proxy(reqwest_proxy);
        }

        builder.build().map_err(ScrapeError::ClientBuildError)
    }
}

#[async_trait]
impl Backend for DirectFetcher {
    fn kind(&self) -> BackendKind {
        BackendKind::Direct
    }

    async fn retrieve(&self, url: &str) -> Result<RawContent, ScrapeError> {
        let client = self.build_client()?;

        let response = client
            .get(url)
            .send()
            .await
            .map_err(ScrapeError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus(status.as_u16()));
        }

        let body = response.text().await.map_err(ScrapeError::from_reqwest)?;

        if !self.extract_main_content {
            return Ok(RawContent::bare(body));
        }

        Ok(extract_article(&body, url))
    }
}

/// Run readability extraction on the fetched markup
///
/// On success returns the article markup plus a metadata envelope of
/// title, author, excerpt, siteName and length. When no article can be
/// isolated, falls back to the raw body with empty metadata.
fn extract_article(html: &str, url: &str) -> RawContent {
    let parsed_url = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!(url, error = %e, "URL not parseable, skipping extraction");
            return RawContent::bare(html);
        }
    };

    let mut cursor = Cursor::new(html.as_bytes());
    match readability::extractor::extract(&mut cursor, &parsed_url) {
        Ok(article) => {
            let mut metadata = page_metadata(html);
            metadata.insert("title".to_string(), Value::String(article.title));
            metadata.insert(
                "length".to_string(),
                Value::Number(article.text.chars().count().into()),
            );
            RawContent {
                content: article.content,
                metadata,
            }
        }
        Err(e) => {
            debug!(url, error = ?e, "No extractable article, using raw body");
            RawContent::bare(html)
        }
    }
}

/// Pull author, excerpt and siteName from the document's meta tags
fn page_metadata(html: &str) -> Map<String, Value> {
    let document = Html::parse_document(html);
    let mut metadata = Map::new();

    if let Some(author) = meta_content(&document, "meta[name=\"author\"]") {
        metadata.insert("author".to_string(), Value::String(author));
    }
    let excerpt = meta_content(&document, "meta[name=\"description\"]")
        .or_else(|| meta_content(&document, "meta[property=\"og:description\"]"));
    if let Some(excerpt) = excerpt {
        metadata.insert("excerpt".to_string(), Value::String(excerpt));
    }
    if let Some(site_name) = meta_content(&document, "meta[property=\"og:site_name\"]") {
        metadata.insert("siteName".to_string(), Value::String(site_name));
    }

    metadata
}

fn meta_content(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
