//! Example: Scrape a few URLs and display results
//!
//! Run with: cargo run -p scrapekit --example scrape_urls
//!
//! This example demonstrates the failover chain with only the direct
//! backend enabled; pass JINA=1 in the environment to add the reader.

use scrapekit::{scrape, FailurePolicy, ReaderOptions, ScrapeRecord, ScrapeRequest, Strategy};

const URLS: &str = "https://example.com, https://httpbin.org/html";

#[tokio::main]
async fn main() {
    let mut request = ScrapeRequest::new(URLS)
        .strategy(Strategy::CostEffective)
        .on_error(FailurePolicy::Continue);

    if std::env::var_os("JINA").is_some() {
        request.failover.reader = Some(ReaderOptions::default());
    }

    println!("ScrapeKit URL Examples");
    println!("======================\n");

    match scrape(&request).await {
        Ok(records) => {
            for (i, record) in records.iter().enumerate() {
                match record {
                    ScrapeRecord::Success(outcome) => {
                        println!("{}. {}", i + 1, outcome.url);
                        println!("   Method: {}", outcome.scraping_method);
                        if let Some(ref metadata) = outcome.metadata {
                            if let Some(title) = metadata.get("title") {
                                println!("   Title: {title}");
                            }
                        }
                        let preview = outcome.content.chars().take(100).collect::<String>();
                        println!("   Preview: {}\n", preview.replace('\n', " "));
                    }
                    ScrapeRecord::Failure { error, url } => {
                        println!("{}. {} FAILED", i + 1, url);
                        println!("   {error}\n");
                    }
                }
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
