//! Core types for ScrapeKit

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::str::FromStr;

use crate::DEFAULT_USER_AGENT;

/// Strategy for ordering backend attempts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Use the fastest available method first
    SpeedFirst,
    /// Start with premium APIs for best extraction quality
    QualityFirst,
    /// Try free methods first (HTTP GET, then Jina, then Firecrawl)
    ///
    /// Also the fallback for unrecognized strategy names.
    #[default]
    #[serde(other)]
    CostEffective,
}

impl FromStr for Strategy {
    type Err = std::convert::Infallible;

    /// Unknown strategy names fall back to `CostEffective`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "speed_first" => Strategy::SpeedFirst,
            "quality_first" => Strategy::QualityFirst,
            _ => Strategy::CostEffective,
        })
    }
}

/// Output format for scraped content
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Clean markdown
    #[default]
    Markdown,
    /// Plain text without formatting
    Text,
    /// Cleaned HTML content
    Html,
    /// Structured JSON with metadata merged at the top level
    Json,
}

impl OutputFormat {
    /// Wire name of the format (also sent to the scrape API)
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "markdown",
            OutputFormat::Text => "text",
            OutputFormat::Html => "html",
            OutputFormat::Json => "json",
        }
    }
}

/// Proxy protocol
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProxyProtocol {
    /// Plain HTTP proxy
    #[default]
    Http,
    /// HTTPS proxy
    Https,
    /// SOCKS5 proxy
    Socks5,
}

impl std::fmt::Display for ProxyProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProxyProtocol::Http => write!(f, "http"),
            ProxyProtocol::Https => write!(f, "https"),
            ProxyProtocol::Socks5 => write!(f, "socks5"),
        }
    }
}

/// Outbound proxy settings for the direct-fetch backend
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProxyOptions {
    /// Proxy server hostname or IP
    pub host: String,
    /// Proxy server port
    #[serde(default = "default_proxy_port")]
    pub port: u16,
    /// Proxy protocol
    #[serde(default)]
    pub protocol: ProxyProtocol,
    /// Proxy authentication username (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Proxy authentication password (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

fn default_proxy_port() -> u16 {
    8080
}

impl ProxyOptions {
    /// Proxy endpoint URL, e.g. `socks5://proxy.example.com:1080`
    pub fn endpoint(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }
}

/// Jina Reader backend settings; presence enables the backend
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ReaderOptions {
    /// API key for the paid tier (optional, the public tier needs none)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL override for the reader endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_host: Option<String>,
}

/// Firecrawl backend settings; presence enables the backend
///
/// The API key is still optional here: enabling the backend without a key
/// is a configuration error surfaced when the backend is attempted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ScrapeApiOptions {
    /// API key (required for the backend to succeed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL override for the scrape API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_host: Option<String>,
}

/// Optional failover backends and proxy routing
///
/// The direct HTTP backend is always enabled and needs no configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct FailoverOptions {
    /// Jina Reader proxy backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reader: Option<ReaderOptions>,
    /// Firecrawl scrape API backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scrape_api: Option<ScrapeApiOptions>,
    /// Proxy for direct HTTP requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ProxyOptions>,
}

/// Output shaping options
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct OutputOptions {
    /// Output format for the scraped content
    #[serde(default)]
    pub format: OutputFormat,
    /// Maximum content length in characters (0 for unlimited)
    #[serde(default)]
    pub max_length: usize,
    /// Whether to include metadata like title, author and excerpt
    #[serde(default = "default_true")]
    pub include_metadata: bool,
    /// Whether to extract only the main article content
    #[serde(default = "default_true")]
    pub extract_main_content: bool,
}

fn default_true() -> bool {
    true
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            max_length: 0,
            include_metadata: true,
            extract_main_content: true,
        }
    }
}

/// Network settings applied to every backend attempt
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NetworkOptions {
    /// Per-attempt timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// User agent string for direct HTTP requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Additional headers for direct HTTP requests
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
    /// Number of times a failing backend attempt is re-issued
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_retry_count() -> u32 {
    2
}

impl Default for NetworkOptions {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
            headers: HashMap::new(),
            retry_count: default_retry_count(),
        }
    }
}

/// What to do when every backend fails for one URL in a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop processing and surface the error
    #[default]
    Abort,
    /// Emit an error record for the URL and continue with the rest
    Continue,
}

/// Request to scrape one or more URLs
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ScrapeRequest {
    /// URLs to scrape, each handled independently
    pub urls: Vec<String>,
    /// Backend trial order strategy
    #[serde(default)]
    pub strategy: Strategy,
    /// Optional backends and proxy
    #[serde(default)]
    pub failover: FailoverOptions,
    /// Output shaping
    #[serde(default)]
    pub output: OutputOptions,
    /// Network settings
    #[serde(default)]
    pub network: NetworkOptions,
    /// Per-URL failure policy for batches
    #[serde(default)]
    pub on_error: FailurePolicy,
}

impl ScrapeRequest {
    /// Create a request from a comma- or newline-separated URL list
    pub fn new(urls: impl AsRef<str>) -> Self {
        Self {
            urls: parse_url_list(urls.as_ref()),
            network: NetworkOptions::default(),
            output: OutputOptions::default(),
            ..Default::default()
        }
    }

    /// Set the strategy
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set failover options
    pub fn failover(mut self, failover: FailoverOptions) -> Self {
        self.failover = failover;
        self
    }

    /// Set output options
    pub fn output(mut self, output: OutputOptions) -> Self {
        self.output = output;
        self
    }

    /// Set network options
    pub fn network(mut self, network: NetworkOptions) -> Self {
        self.network = network;
        self
    }

    /// Set the failure policy
    pub fn on_error(mut self, policy: FailurePolicy) -> Self {
        self.on_error = policy;
        self
    }
}

/// Split a raw URL input on commas and newlines, dropping empty entries
pub fn parse_url_list(input: &str) -> Vec<String> {
    input
        .split(|c| c == ',' || c == '\n')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Raw content returned by a backend, before formatting
///
/// Transient: owned by the failover loop and folded into the final
/// outcome or discarded.
#[derive(Debug, Clone, Default)]
pub struct RawContent {
    /// Raw markup or markdown body
    pub content: String,
    /// Backend-native metadata (title, author, ...)
    pub metadata: Map<String, Value>,
}

impl RawContent {
    /// Content with no metadata
    pub fn bare(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: Map::new(),
        }
    }
}

/// Result record for one successfully scraped URL
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeOutcome {
    /// Formatted content
    pub content: String,
    /// Metadata envelope (present when include_metadata is set)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    /// Metadata fields merged at the top level (JSON output format only)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Human-readable label of the backend that produced the content
    pub scraping_method: String,
    /// The scraped URL
    pub url: String,
    /// ISO-8601 timestamp of the scrape
    pub timestamp: String,
}

/// Per-URL element of a batch result
///
/// Under [`FailurePolicy::Continue`] a failed URL yields a `Failure`
/// record instead of aborting the batch.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ScrapeRecord {
    /// The URL was scraped
    Success(ScrapeOutcome),
    /// Every backend failed for the URL
    Failure {
        /// Aggregate error message
        error: String,
        /// The URL that failed
        url: String,
    },
}

impl ScrapeRecord {
    /// True for success records
    pub fn is_success(&self) -> bool {
        matches!(self, ScrapeRecord::Success(_))
    }

    /// The outcome, if this record is a success
    pub fn outcome(&self) -> Option<&ScrapeOutcome> {
        match self {
            ScrapeRecord::Success(outcome) => Some(outcome),
            ScrapeRecord::Failure { .. } => None,
        }
    }
}
