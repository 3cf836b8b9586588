//! Integration tests for ScrapeKit using wiremock

use scrapekit::{
    scrape, scrape_url, scrape_url_with_report, FailurePolicy, OutputFormat, ProxyOptions,
    ProxyProtocol, ReaderOptions, ScrapeApiOptions, ScrapeError, ScrapeRecord, ScrapeRequest,
    Strategy,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Request with retries disabled so failure tests stay fast
fn request_for(urls: &str) -> ScrapeRequest {
    let mut request = ScrapeRequest::new(urls);
    request.network.retry_count = 0;
    request
}

fn enable_reader(request: &mut ScrapeRequest, host: &str, key: Option<&str>) {
    request.failover.reader = Some(ReaderOptions {
        api_key: key.map(str::to_string),
        api_host: Some(host.to_string()),
    });
}

fn enable_scrape_api(request: &mut ScrapeRequest, host: &str, key: Option<&str>) {
    request.failover.scrape_api = Some(ScrapeApiOptions {
        api_key: key.map(str::to_string),
        api_host: Some(host.to_string()),
    });
}

#[tokio::test]
async fn test_direct_markup_to_markdown() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<html><body><h1>Hi</h1></body></html>", "text/html"),
        )
        .mount(&server)
        .await;

    let mut request = request_for(&format!("{}/a", server.uri()));
    request.output.extract_main_content = false;
    request.output.format = OutputFormat::Markdown;

    let outcome = scrape_url(&format!("{}/a", server.uri()), &request)
        .await
        .unwrap();

    assert_eq!(outcome.content.trim(), "# Hi");
    assert_eq!(outcome.scraping_method, "HTTP GET with content extraction");
    assert_eq!(outcome.url, format!("{}/a", server.uri()));
    // RFC 3339 timestamp
    assert!(outcome.timestamp.contains('T'));
}

#[tokio::test]
async fn test_direct_extracts_article_metadata() {
    let server = MockServer::start().await;

    let html = r#"<!DOCTYPE html>
<html>
<head>
    <title>Deep Dive</title>
    <meta name="author" content="Jane Doe">
    <meta name="description" content="An article about things.">
</head>
<body>
    <nav>Home | Archive</nav>
    <article>
        <h1>Deep Dive</h1>
        <p>The opening paragraph has enough prose for the extractor to
        score it as the main content of the page rather than chrome.</p>
        <p>A follow-up paragraph keeps the candidate comfortably above
        the scoring threshold used by readability.</p>
    </article>
</body>
</html>"#;

    Mock::given(method("GET"))
        .and(path("/article"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html, "text/html"))
        .mount(&server)
        .await;

    let url = format!("{}/article", server.uri());
    let request = request_for(&url);

    let outcome = scrape_url(&url, &request).await.unwrap();

    let metadata = outcome.metadata.expect("metadata expected by default");
    assert_eq!(metadata["title"], "Deep Dive");
    assert_eq!(metadata["author"], "Jane Doe");
    assert!(metadata["length"].as_u64().unwrap() > 0);
    assert!(outcome.content.contains("opening paragraph"));
    assert!(!outcome.content.contains("Home | Archive"));
}

#[tokio::test]
async fn test_failover_direct_to_reader() {
    let target = MockServer::start().await;
    let reader = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&target)
        .await;

    Mock::given(method("GET"))
        .and(path_regex("^/http.*"))
        .respond_with(ResponseTemplate::new(200).set_body_string("# Page via reader"))
        .mount(&reader)
        .await;

    let url = format!("{}/page", target.uri());
    let mut request = request_for(&url);
    enable_reader(&mut request, &reader.uri(), None);

    let report = scrape_url_with_report(&url, &request).await.unwrap();

    assert_eq!(report.outcome.scraping_method, "Jina AI Reader");
    assert_eq!(report.outcome.content, "# Page via reader");
    assert_eq!(report.attempt_errors.len(), 1);
    assert!(report.attempt_errors[0].starts_with("HTTP GET with content extraction:"));
    assert!(report.attempt_errors[0].contains("500"));
}

#[tokio::test]
async fn test_reader_sends_bearer_only_when_key_configured() {
    let reader = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex("^/http.*"))
        .and(header("authorization", "Bearer jina_secret"))
        .respond_with(ResponseTemplate::new(200).set_body_string("authenticated"))
        .mount(&reader)
        .await;

    let target = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&target)
        .await;

    let url = format!("{}/doc", target.uri());
    let mut request = request_for(&url);
    enable_reader(&mut request, &reader.uri(), Some("jina_secret"));

    let outcome = scrape_url(&url, &request).await.unwrap();
    assert_eq!(outcome.content, "authenticated");
}

#[tokio::test]
async fn test_scrape_api_nested_envelope_and_auth() {
    let api = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v0/scrape"))
        .and(header("authorization", "Bearer fc-test"))
        .and(body_partial_json(json!({
            "formats": ["markdown"],
            "onlyMainContent": true,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "markdown": "# From Firecrawl",
                "metadata": { "title": "Firecrawl Title" }
            }
        })))
        .mount(&api)
        .await;

    let mut request = request_for("https://example.com/premium");
    request.strategy = Strategy::QualityFirst;
    enable_scrape_api(&mut request, &api.uri(), Some("fc-test"));

    let outcome = scrape_url("https://example.com/premium", &request)
        .await
        .unwrap();

    assert_eq!(outcome.scraping_method, "Firecrawl API");
    assert_eq!(outcome.content, "# From Firecrawl");
    assert_eq!(outcome.metadata.unwrap()["title"], "Firecrawl Title");
}

#[tokio::test]
async fn test_scrape_api_flat_envelope() {
    let api = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v0/scrape"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "content": "flat body" })),
        )
        .mount(&api)
        .await;

    let mut request = request_for("https://example.com/x");
    request.strategy = Strategy::QualityFirst;
    enable_scrape_api(&mut request, &api.uri(), Some("fc-test"));

    let outcome = scrape_url("https://example.com/x", &request).await.unwrap();
    assert_eq!(outcome.content, "flat body");
}

#[tokio::test]
async fn test_missing_scrape_api_key_recorded_as_attempt_error() {
    let target = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200).set_body_string("plain content"))
        .mount(&target)
        .await;

    let url = format!("{}/ok", target.uri());
    let mut request = request_for(&url);
    request.strategy = Strategy::QualityFirst;
    request.output.extract_main_content = false;
    // Firecrawl enabled but no key: configuration error, no network call
    enable_scrape_api(&mut request, "https://firecrawl.invalid", None);

    let report = scrape_url_with_report(&url, &request).await.unwrap();

    assert_eq!(
        report.outcome.scraping_method,
        "HTTP GET with content extraction"
    );
    assert_eq!(report.attempt_errors.len(), 1);
    assert_eq!(
        report.attempt_errors[0],
        "Firecrawl API: Firecrawl API key is required"
    );
}

#[tokio::test]
async fn test_all_backends_failed_aggregates_every_message() {
    let target = MockServer::start().await;
    let reader = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&target)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&reader)
        .await;

    let url = format!("{}/gone", target.uri());
    let mut request = request_for(&url);
    request.strategy = Strategy::QualityFirst;
    enable_reader(&mut request, &reader.uri(), None);
    // No key: fails without a network call
    enable_scrape_api(&mut request, "https://firecrawl.invalid", None);

    let err = scrape_url(&url, &request).await.unwrap_err();

    match err {
        ScrapeError::AllBackendsFailed { url: failed, errors } => {
            assert_eq!(failed, url);
            assert_eq!(errors.len(), 3);
            assert!(errors[0].starts_with("Firecrawl API:"));
            assert!(errors[1].starts_with("Jina AI Reader:"));
            assert!(errors[2].starts_with("HTTP GET with content extraction:"));
        }
        other => panic!("expected AllBackendsFailed, got {other}"),
    }
}

#[tokio::test]
async fn test_batch_continue_policy_yields_ordered_records() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bad"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/good"))
        .respond_with(ResponseTemplate::new(200).set_body_string("fine"))
        .mount(&server)
        .await;

    let urls = format!("{0}/bad, {0}/good", server.uri());
    let mut request = request_for(&urls);
    request.output.extract_main_content = false;
    request.on_error = FailurePolicy::Continue;

    let records = scrape(&request).await.unwrap();

    assert_eq!(records.len(), 2);
    match &records[0] {
        ScrapeRecord::Failure { error, url } => {
            assert_eq!(url, &format!("{}/bad", server.uri()));
            assert!(error.contains("all available methods"));
            assert!(error.contains("HTTP GET with content extraction"));
        }
        ScrapeRecord::Success(_) => panic!("first record should be a failure"),
    }
    match &records[1] {
        ScrapeRecord::Success(outcome) => assert_eq!(outcome.content, "fine"),
        ScrapeRecord::Failure { .. } => panic!("second record should be a success"),
    }
}

#[tokio::test]
async fn test_batch_abort_policy_stops_on_first_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bad"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let urls = format!("{0}/bad, {0}/good", server.uri());
    let request = request_for(&urls);

    let err = scrape(&request).await.unwrap_err();
    assert!(matches!(err, ScrapeError::AllBackendsFailed { .. }));
}

#[tokio::test]
async fn test_retry_reissues_failing_attempt() {
    let server = MockServer::start().await;

    // First attempt fails, the re-issued attempt succeeds
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("recovered"))
        .mount(&server)
        .await;

    let url = format!("{}/flaky", server.uri());
    let mut request = ScrapeRequest::new(&url);
    request.network.retry_count = 1;
    request.output.extract_main_content = false;

    let report = scrape_url_with_report(&url, &request).await.unwrap();

    assert_eq!(report.outcome.content, "recovered");
    // The retry happened inside one backend attempt: no failover entry
    assert!(report.attempt_errors.is_empty());
}

#[tokio::test]
async fn test_invalid_proxy_hard_fails_direct_attempt() {
    let server = MockServer::start().await;

    // A misconfigured proxy must never be bypassed by going direct
    Mock::given(method("GET"))
        .and(path("/p"))
        .respond_with(ResponseTemplate::new(200).set_body_string("reachable"))
        .expect(0)
        .mount(&server)
        .await;

    let url = format!("{}/p", server.uri());
    let mut request = request_for(&url);
    request.failover.proxy = Some(ProxyOptions {
        host: "not a host name".to_string(),
        port: 8080,
        protocol: ProxyProtocol::Http,
        username: None,
        password: None,
    });

    let err = scrape_url(&url, &request).await.unwrap_err();

    match err {
        ScrapeError::AllBackendsFailed { errors, .. } => {
            assert_eq!(errors.len(), 1);
            assert!(errors[0].starts_with("HTTP GET with content extraction:"));
            assert!(errors[0].contains("Invalid proxy configuration"));
        }
        other => panic!("expected AllBackendsFailed, got {other}"),
    }
}

#[tokio::test]
async fn test_custom_headers_and_user_agent_forwarded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/hdr"))
        .and(header("user-agent", "ScrapeBot/1.0"))
        .and(header("x-custom", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let url = format!("{}/hdr", server.uri());
    let mut request = request_for(&url);
    request.network.user_agent = "ScrapeBot/1.0".to_string();
    request
        .network
        .headers
        .insert("x-custom".to_string(), "42".to_string());
    request.output.extract_main_content = false;

    let outcome = scrape_url(&url, &request).await.unwrap();
    assert_eq!(outcome.content, "ok");
}

#[tokio::test]
async fn test_max_length_truncates_formatted_content() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/long"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(100)))
        .mount(&server)
        .await;

    let url = format!("{}/long", server.uri());
    let mut request = request_for(&url);
    request.output.extract_main_content = false;
    request.output.max_length = 10;

    let outcome = scrape_url(&url, &request).await.unwrap();
    assert_eq!(outcome.content, format!("{}...", "x".repeat(10)));
}

#[tokio::test]
async fn test_json_format_merges_metadata_top_level() {
    let api = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v0/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "markdown": "body text",
                "metadata": { "title": "Merged" }
            }
        })))
        .mount(&api)
        .await;

    let mut request = request_for("https://example.com/j");
    request.strategy = Strategy::QualityFirst;
    request.output.format = OutputFormat::Json;
    enable_scrape_api(&mut request, &api.uri(), Some("fc-test"));

    let outcome = scrape_url("https://example.com/j", &request).await.unwrap();
    let value = serde_json::to_value(&outcome).unwrap();

    assert_eq!(value["content"], "body text");
    assert_eq!(value["title"], "Merged");
    assert_eq!(value["metadata"]["title"], "Merged");
    assert_eq!(value["scrapingMethod"], "Firecrawl API");
}

#[tokio::test]
async fn test_include_metadata_false_omits_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/m"))
        .respond_with(ResponseTemplate::new(200).set_body_string("plain"))
        .mount(&server)
        .await;

    let url = format!("{}/m", server.uri());
    let mut request = request_for(&url);
    request.output.extract_main_content = false;
    request.output.include_metadata = false;

    let outcome = scrape_url(&url, &request).await.unwrap();
    assert!(outcome.metadata.is_none());

    let json = serde_json::to_string(&outcome).unwrap();
    assert!(!json.contains("metadata"));
}
