//! ScrapeKit - web scraping library with multi-backend failover
//!
//! This crate retrieves web content through an ordered chain of
//! backends, stopping at the first success and normalizing the result
//! into markdown, plain text, HTML or structured JSON.
//!
//! ## Backend System
//!
//! Three backends are supported, tried in an order determined by the
//! selected [`Strategy`]:
//! - [`DirectFetcher`] - plain HTTP GET with readability extraction
//! - [`ReaderProxy`] - the Jina Reader proxy service
//! - [`ScrapeApi`] - the Firecrawl scrape API
//!
//! Direct fetching is always enabled; the other backends are enabled by
//! supplying their options (and credentials) in [`FailoverOptions`].
//!
//! ```no_run
//! use scrapekit::{scrape, ScrapeRequest, Strategy};
//!
//! # async fn run() -> Result<(), scrapekit::ScrapeError> {
//! let request = ScrapeRequest::new("https://example.com/article")
//!     .strategy(Strategy::CostEffective);
//! let records = scrape(&request).await?;
//! # Ok(())
//! # }
//! ```

pub mod backends;
mod client;
mod error;
mod format;
mod strategy;
mod tool;
mod types;

pub use backends::{Backend, BackendKind, DirectFetcher, ReaderProxy, ScrapeApi};
pub use client::{scrape, scrape_url, scrape_url_with_report, FailoverReport};
pub use error::ScrapeError;
pub use format::{html_to_markdown, html_to_text, looks_like_markup};
pub use strategy::resolve_order;
pub use tool::{Tool, ToolBuilder};
pub use types::{
    parse_url_list, FailoverOptions, FailurePolicy, NetworkOptions, OutputFormat, OutputOptions,
    ProxyOptions, ProxyProtocol, RawContent, ReaderOptions, ScrapeApiOptions, ScrapeOutcome,
    ScrapeRecord, ScrapeRequest, Strategy,
};

/// Default User-Agent string for direct HTTP requests
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Tool description for LLM consumption
pub const TOOL_DESCRIPTION: &str = r#"Scrapes web pages with automatic failover and content extraction.

- Tries multiple retrieval methods until one succeeds
- Extracts clean main content from pages
- Outputs markdown, plain text, HTML or structured JSON
- Per-attempt timeouts and bounded retries"#;

/// Extended documentation for LLM consumption (llmtxt)
pub const TOOL_LLMTXT: &str = r#"# ScrapeKit Tool

Scrapes one or more URLs with automatic failover across retrieval
methods, extracting clean main content.

## Retrieval Methods
- HTTP GET with content extraction (always enabled, no credentials)
- Jina AI Reader (optional; API key only needed for the paid tier)
- Firecrawl API (optional; API key required)

## Strategies
- `cost_effective`: free methods first (HTTP GET, Jina, Firecrawl)
- `speed_first`: fastest method first (HTTP GET, Firecrawl, Jina)
- `quality_first`: premium APIs first (Firecrawl, Jina, HTTP GET)

## Input Parameters
- `urls` (required): URLs to scrape
- `strategy` (optional): method trial order (default: cost_effective)
- `failover` (optional): reader/scrape_api credentials, proxy settings
- `output` (optional): format (markdown/text/html/json), max_length,
  include_metadata, extract_main_content
- `network` (optional): timeout_ms, user_agent, headers, retry_count
- `on_error` (optional): abort or continue on per-URL failure

## Output Fields (per URL)
- `content`: the scraped content in the requested format
- `metadata`: title, author, excerpt, siteName, length (when available)
- `scrapingMethod`: which method produced the content
- `url`: the scraped URL
- `timestamp`: ISO-8601 scrape time
- On failure with `on_error: continue`: `{ "error": ..., "url": ... }`

## Examples

### Scrape a page as markdown
```json
{"urls": ["https://example.com/article"]}
```

### Premium-first with Firecrawl
```json
{"urls": ["https://example.com"], "strategy": "quality_first",
 "failover": {"scrape_api": {"api_key": "fc-..."}}}
```

## Error Handling
- Invalid URLs are rejected before any network call
- Each failed method is recorded and the next one is tried
- When all methods fail, the error lists every per-method message
"#;
