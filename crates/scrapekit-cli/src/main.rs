//! ScrapeKit CLI - command-line interface for scraping web content

use clap::{Parser, Subcommand, ValueEnum};
use scrapekit::{
    scrape, FailurePolicy, OutputFormat, OutputOptions, ProxyOptions, ProxyProtocol,
    ReaderOptions, ScrapeApiOptions, ScrapeRecord, ScrapeRequest, Strategy, TOOL_LLMTXT,
};
use std::io::{self, Write};

/// Output mode for the scrape subcommand
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputMode {
    /// Markdown with YAML frontmatter per URL
    #[default]
    Md,
    /// JSON array of per-URL records
    Json,
}

/// Backend trial-order strategy
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum StrategyArg {
    /// Free methods first (HTTP GET, Jina, Firecrawl)
    #[default]
    CostEffective,
    /// Fastest method first
    SpeedFirst,
    /// Premium APIs first
    QualityFirst,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::CostEffective => Strategy::CostEffective,
            StrategyArg::SpeedFirst => Strategy::SpeedFirst,
            StrategyArg::QualityFirst => Strategy::QualityFirst,
        }
    }
}

/// Content output format
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum FormatArg {
    #[default]
    Markdown,
    Text,
    Html,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Markdown => OutputFormat::Markdown,
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Html => OutputFormat::Html,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

/// Proxy protocol
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ProxyProtocolArg {
    #[default]
    Http,
    Https,
    Socks5,
}

impl From<ProxyProtocolArg> for ProxyProtocol {
    fn from(arg: ProxyProtocolArg) -> Self {
        match arg {
            ProxyProtocolArg::Http => ProxyProtocol::Http,
            ProxyProtocolArg::Https => ProxyProtocol::Https,
            ProxyProtocolArg::Socks5 => ProxyProtocol::Socks5,
        }
    }
}

/// ScrapeKit - web scraping with multi-backend failover
#[derive(Parser, Debug)]
#[command(name = "scrapekit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Print full help with examples (llmtxt)
    #[arg(long)]
    llmtxt: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scrape one or more URLs (comma- or newline-separated)
    Scrape {
        /// URLs to scrape
        urls: String,

        /// Backend trial-order strategy
        #[arg(long, short, default_value = "cost-effective")]
        strategy: StrategyArg,

        /// Content format
        #[arg(long, short, default_value = "markdown")]
        format: FormatArg,

        /// Maximum content length in characters (0 for unlimited)
        #[arg(long, default_value_t = 0)]
        max_length: usize,

        /// Omit the metadata envelope
        #[arg(long)]
        no_metadata: bool,

        /// Return the full page instead of the extracted main content
        #[arg(long)]
        full_page: bool,

        /// Enable the Jina Reader backend
        #[arg(long)]
        jina: bool,

        /// Jina API key (implies --jina)
        #[arg(long)]
        jina_api_key: Option<String>,

        /// Jina API host override (implies --jina)
        #[arg(long)]
        jina_api_host: Option<String>,

        /// Firecrawl API key (enables the Firecrawl backend)
        #[arg(long)]
        firecrawl_api_key: Option<String>,

        /// Firecrawl API host override
        #[arg(long)]
        firecrawl_api_host: Option<String>,

        /// Proxy hostname or IP for direct requests
        #[arg(long)]
        proxy_host: Option<String>,

        /// Proxy port
        #[arg(long, default_value_t = 8080)]
        proxy_port: u16,

        /// Proxy protocol
        #[arg(long, default_value = "http")]
        proxy_protocol: ProxyProtocolArg,

        /// Proxy username
        #[arg(long)]
        proxy_username: Option<String>,

        /// Proxy password
        #[arg(long)]
        proxy_password: Option<String>,

        /// Per-attempt timeout in milliseconds
        #[arg(long, default_value_t = 30_000)]
        timeout: u64,

        /// Custom User-Agent for direct requests
        #[arg(long)]
        user_agent: Option<String>,

        /// Retry attempts per backend
        #[arg(long, default_value_t = 2)]
        retry_count: u32,

        /// Extra header for direct requests, as name=value (repeatable)
        #[arg(long = "header")]
        headers: Vec<String>,

        /// Emit an error record and continue when a URL fails
        #[arg(long)]
        continue_on_error: bool,

        /// Output mode
        #[arg(long, short, default_value = "md")]
        output: OutputMode,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Handle --llmtxt flag
    if cli.llmtxt {
        writeln_safe(TOOL_LLMTXT);
        std::process::exit(0);
    }

    match cli.command {
        Some(Commands::Scrape {
            urls,
            strategy,
            format,
            max_length,
            no_metadata,
            full_page,
            jina,
            jina_api_key,
            jina_api_host,
            firecrawl_api_key,
            firecrawl_api_host,
            proxy_host,
            proxy_port,
            proxy_protocol,
            proxy_username,
            proxy_password,
            timeout,
            user_agent,
            retry_count,
            headers,
            continue_on_error,
            output,
        }) => {
            let mut request = ScrapeRequest::new(&urls)
                .strategy(strategy.into())
                .output(OutputOptions {
                    format: format.into(),
                    max_length,
                    include_metadata: !no_metadata,
                    extract_main_content: !full_page,
                });

            request.network.timeout_ms = timeout;
            request.network.retry_count = retry_count;
            if let Some(ua) = user_agent {
                request.network.user_agent = ua;
            }
            for entry in &headers {
                match entry.split_once('=') {
                    Some((name, value)) => {
                        request
                            .network
                            .headers
                            .insert(name.trim().to_string(), value.trim().to_string());
                    }
                    None => {
                        eprintln!("Ignoring malformed header (expected name=value): {entry}");
                    }
                }
            }

            if jina || jina_api_key.is_some() || jina_api_host.is_some() {
                request.failover.reader = Some(ReaderOptions {
                    api_key: jina_api_key,
                    api_host: jina_api_host,
                });
            }
            if firecrawl_api_key.is_some() || firecrawl_api_host.is_some() {
                request.failover.scrape_api = Some(ScrapeApiOptions {
                    api_key: firecrawl_api_key,
                    api_host: firecrawl_api_host,
                });
            }
            if let Some(host) = proxy_host {
                request.failover.proxy = Some(ProxyOptions {
                    host,
                    port: proxy_port,
                    protocol: proxy_protocol.into(),
                    username: proxy_username,
                    password: proxy_password,
                });
            }
            if continue_on_error {
                request.on_error = FailurePolicy::Continue;
            }

            run_scrape(&request, output).await;
        }
        None => {
            eprintln!("Usage: scrapekit scrape <URLS>");
            eprintln!("   or: scrapekit --help");
            std::process::exit(1);
        }
    }
}

async fn run_scrape(request: &ScrapeRequest, output: OutputMode) {
    match scrape(request).await {
        Ok(records) => match output {
            OutputMode::Md => {
                for record in &records {
                    writeln_safe(&format_md_with_frontmatter(record));
                }
            }
            OutputMode::Json => {
                let json = serde_json::to_string_pretty(&records).unwrap_or_else(|e| {
                    eprintln!("Error serializing records: {e}");
                    std::process::exit(1);
                });
                writeln_safe(&json);
            }
        },
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Format one record as markdown with YAML frontmatter
fn format_md_with_frontmatter(record: &ScrapeRecord) -> String {
    let mut output = String::new();

    match record {
        ScrapeRecord::Success(outcome) => {
            output.push_str("---\n");
            output.push_str(&format!("url: {}\n", outcome.url));
            output.push_str(&format!("scraping_method: {}\n", outcome.scraping_method));
            output.push_str(&format!("timestamp: {}\n", outcome.timestamp));
            if let Some(ref metadata) = outcome.metadata {
                if let Some(title) = metadata.get("title").and_then(|v| v.as_str()) {
                    output.push_str(&format!("title: {title}\n"));
                }
                if let Some(author) = metadata.get("author").and_then(|v| v.as_str()) {
                    output.push_str(&format!("author: {author}\n"));
                }
            }
            output.push_str("---\n");
            output.push_str(&outcome.content);
        }
        ScrapeRecord::Failure { error, url } => {
            output.push_str("---\n");
            output.push_str(&format!("url: {url}\n"));
            output.push_str("---\n");
            output.push_str(error);
        }
    }

    output
}

/// Write to stdout, exit silently on broken pipe
fn writeln_safe(s: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", s) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        eprintln!("Error writing to stdout: {}", e);
        std::process::exit(1);
    }
}
