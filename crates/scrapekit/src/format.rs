//! Content formatting
//!
//! Converts raw backend output into the requested representation,
//! applies length truncation and assembles the metadata envelope.
//! Operates purely on strings and the metadata mapping; no backend
//! awareness, no I/O.

use crate::types::{OutputFormat, OutputOptions, RawContent};
use htmd::options::{CodeBlockStyle, HeadingStyle, Options};
use htmd::HtmlToMarkdown;
use scraper::{Html, Selector};
use serde_json::{Map, Value};

/// Marker appended to length-truncated content
const ELLIPSIS: &str = "...";

/// Formatted content plus its metadata envelope, before provenance
/// stamping
#[derive(Debug, Clone, Default)]
pub struct FormattedDocument {
    /// Content in the requested representation
    pub content: String,
    /// Metadata envelope (present when include_metadata is set)
    pub metadata: Option<Map<String, Value>>,
    /// Metadata merged to the top level (JSON format only)
    pub extra: Map<String, Value>,
}

/// Heuristic for content that still contains markup
pub fn looks_like_markup(content: &str) -> bool {
    content.contains('<') && content.contains('>')
}

/// Convert markup to markdown with ATX headings and fenced code blocks
///
/// Falls back to the input unchanged if conversion fails.
pub fn html_to_markdown(html: &str) -> String {
    let converter = HtmlToMarkdown::builder()
        .options(Options {
            heading_style: HeadingStyle::Atx,
            code_block_style: CodeBlockStyle::Fenced,
            ..Default::default()
        })
        .build();
    converter.convert(html).unwrap_or_else(|_| html.to_string())
}

/// Extract the visible text of the document body
///
/// Falls back to the input unchanged when parsing yields nothing.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let text = Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next())
        .map(|body| {
            body.text()
                .flat_map(str::split_whitespace)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        html.to_string()
    } else {
        text
    }
}

/// Format raw backend output per the output options
pub fn format_document(raw: RawContent, options: &OutputOptions) -> FormattedDocument {
    let RawContent { content, metadata } = raw;

    let mut formatted = match options.format {
        OutputFormat::Markdown if looks_like_markup(&content) => html_to_markdown(&content),
        OutputFormat::Text if looks_like_markup(&content) => html_to_text(&content),
        // HTML passes through unchanged; markdown-ish input stays as-is
        _ => content,
    };

    if options.max_length > 0 {
        formatted = truncate_chars(formatted, options.max_length);
    }

    // JSON output flattens the metadata regardless of include_metadata
    let extra = if options.format == OutputFormat::Json {
        metadata.clone()
    } else {
        Map::new()
    };
    let metadata = options.include_metadata.then_some(metadata);

    FormattedDocument {
        content: formatted,
        metadata,
        extra,
    }
}

/// Truncate to `max` characters and append the ellipsis marker
fn truncate_chars(content: String, max: usize) -> String {
    if content.chars().count() <= max {
        return content;
    }
    let mut truncated: String = content.chars().take(max).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}
