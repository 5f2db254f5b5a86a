//! Integration tests for the request controller
//!
//! These tests use wiremock to stand in for the crawl service and drive full
//! sessions end-to-end: fetch, decode, failure handling, stale responses and
//! export.

use crawl_report::codec::encode;
use crawl_report::config::{parse_config, DefaultsConfig, RequestConfig, ServiceConfig};
use crawl_report::controller::{Completion, RequestLifecycle, Session};
use crawl_report::output::ExportArtifact;
use crawl_report::HttpCrawlService;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HEADER: &str = "page_url,h1,first_paragraph,outgoing_link_urls,image_urls";

/// Creates an HTTP service pointed at the mock server
fn create_service(server: &MockServer) -> HttpCrawlService {
    let config = ServiceConfig {
        base_url: server.uri(),
        timeout_secs: 5,
    };
    HttpCrawlService::new(&config).expect("Failed to create service")
}

fn csv_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/csv")
}

#[tokio::test]
async fn test_full_fetch_and_decode() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/crawl"))
        .and(query_param("url", "https://a.com"))
        .and(query_param("maxConcurrency", "5"))
        .and(query_param("maxPages", "25"))
        .respond_with(csv_response(format!(
            "{}\nhttps://a.com,Hello,\"Para, with comma\",https://b.com,https://a.com/img.png\n",
            HEADER
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let session = Session::new(create_service(&mock_server), DefaultsConfig::default());
    session.update_form(|form| form.set_url("https://a.com"));

    let completion = session.run().await.expect("Form should be valid");
    assert_eq!(completion, Completion::Applied);

    let state = session.snapshot();
    assert!(state.lifecycle().is_success());
    assert!(state.expansion().is_empty());

    let rows = state.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].page_url, "https://a.com");
    assert_eq!(rows[0].h1, "Hello");
    assert_eq!(rows[0].first_paragraph, "Para, with comma");
    assert_eq!(rows[0].outgoing_link_urls, "https://b.com");
    assert_eq!(rows[0].image_urls, "https://a.com/img.png");
}

#[tokio::test]
async fn test_permuted_columns_from_service() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/crawl"))
        .respond_with(csv_response(
            "h1,image_urls,page_url\nTitle,https://a.com/i.png,https://a.com\n".to_string(),
        ))
        .mount(&mock_server)
        .await;

    let session = Session::new(create_service(&mock_server), DefaultsConfig::default());
    session.update_form(|form| form.set_url("https://a.com"));
    session.run().await.unwrap();

    let state = session.snapshot();
    let row = &state.rows()[0];
    assert_eq!(row.page_url, "https://a.com");
    assert_eq!(row.h1, "Title");
    assert_eq!(row.image_urls, "https://a.com/i.png");
    assert_eq!(row.first_paragraph, "");
}

#[tokio::test]
async fn test_http_error_is_fetch_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/crawl"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Missing url parameter"))
        .mount(&mock_server)
        .await;

    let session = Session::new(create_service(&mock_server), DefaultsConfig::default());
    session.update_form(|form| form.set_url("https://a.com"));
    session.run().await.unwrap();

    let state = session.snapshot();
    let message = state.error().expect("Request should have failed");
    assert!(message.starts_with("Failed to fetch report"), "{}", message);
    assert!(state.rows().is_empty());
}

#[tokio::test]
async fn test_bad_payload_is_decode_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/crawl"))
        .respond_with(csv_response("<html>not a report</html>".to_string()))
        .mount(&mock_server)
        .await;

    let session = Session::new(create_service(&mock_server), DefaultsConfig::default());
    session.update_form(|form| form.set_url("https://a.com"));
    session.run().await.unwrap();

    let state = session.snapshot();
    let message = state.error().expect("Request should have failed");
    assert!(message.starts_with("Failed to decode report"), "{}", message);
}

#[tokio::test]
async fn test_empty_report_is_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/crawl"))
        .respond_with(csv_response(format!("{}\n", HEADER)))
        .mount(&mock_server)
        .await;

    let session = Session::new(create_service(&mock_server), DefaultsConfig::default());
    session.update_form(|form| form.set_url("https://a.com"));
    session.run().await.unwrap();

    let state = session.snapshot();
    assert!(state.lifecycle().is_success());
    assert!(state.rows().is_empty());
}

#[tokio::test]
async fn test_timeout_fails_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/crawl"))
        .respond_with(csv_response(format!("{}\n", HEADER)).set_delay(Duration::from_secs(2)))
        .mount(&mock_server)
        .await;

    let service = create_service(&mock_server).with_timeout(Duration::from_millis(100));
    let session = Session::new(service, DefaultsConfig::default());
    session.update_form(|form| form.set_url("https://a.com"));
    session.run().await.unwrap();

    let state = session.snapshot();
    let message = state.error().expect("Request should have timed out");
    assert!(message.contains("timed out"), "{}", message);
}

#[tokio::test]
async fn test_unreachable_service() {
    // Nothing listens on port 1
    let config = ServiceConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        timeout_secs: 5,
    };
    let service = HttpCrawlService::new(&config).unwrap();
    let session = Session::new(service, DefaultsConfig::default());
    session.update_form(|form| form.set_url("https://a.com"));
    session.run().await.unwrap();

    let state = session.snapshot();
    let message = state.error().expect("Request should have failed");
    assert!(message.starts_with("Failed to fetch report"), "{}", message);
}

#[tokio::test]
async fn test_superseded_response_is_ignored() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/crawl"))
        .and(query_param("url", "https://slow.com"))
        .respond_with(
            csv_response(format!("{}\nhttps://slow.com,Slow,,,\n", HEADER))
                .set_delay(Duration::from_millis(500)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/crawl"))
        .and(query_param("url", "https://fast.com"))
        .respond_with(csv_response(format!("{}\nhttps://fast.com,Fast,,,\n", HEADER)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let session = Session::new(create_service(&mock_server), DefaultsConfig::default());

    let first = session.submit_config(RequestConfig::new("https://slow.com", 5, 25).unwrap());
    let second = session.submit_config(RequestConfig::new("https://fast.com", 5, 25).unwrap());

    let (first, second) = tokio::join!(tokio::spawn(first), tokio::spawn(second));
    assert_eq!(second.unwrap(), Completion::Applied);
    assert_eq!(first.unwrap(), Completion::Discarded);

    let state = session.snapshot();
    assert_eq!(state.rows().len(), 1);
    assert_eq!(state.rows()[0].h1, "Fast");
    assert_eq!(state.form().url(), "https://fast.com");
}

#[tokio::test]
async fn test_reset_after_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/crawl"))
        .respond_with(csv_response(format!(
            "{}\nhttps://a.com,A,,,\nhttps://a.com/b,B,,,\n",
            HEADER
        )))
        .mount(&mock_server)
        .await;

    let defaults = DefaultsConfig {
        max_concurrency: 4,
        max_pages: 50,
    };
    let session = Session::new(create_service(&mock_server), defaults);
    session.update_form(|form| {
        form.set_url("https://a.com");
        form.set_max_pages(10);
    });
    session.run().await.unwrap();
    assert!(session.toggle(1));

    session.reset();

    let state = session.snapshot();
    assert_eq!(state.lifecycle(), &RequestLifecycle::Idle);
    assert!(state.rows().is_empty());
    assert!(state.expansion().is_empty());
    assert_eq!(state.form().url(), "");
    assert_eq!(state.form().max_concurrency(), 4);
    assert_eq!(state.form().max_pages(), 50);
}

#[tokio::test]
async fn test_export_uses_held_rows_only() {
    let mock_server = MockServer::start().await;

    // Exactly one request: exporting must not fetch again
    Mock::given(method("GET"))
        .and(path("/api/crawl"))
        .respond_with(csv_response(format!(
            "{}\nhttps://a.com,\"Say \"\"hi\"\"\",\"line one\nline two\",,\n",
            HEADER
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let session = Session::new(create_service(&mock_server), DefaultsConfig::default());
    session.update_form(|form| form.set_url("https://a.com"));
    session.run().await.unwrap();

    let state = session.snapshot();
    let report = state.report().expect("Report should be held");
    assert_eq!(report.rows()[0].h1, "Say \"hi\"");
    assert_eq!(report.rows()[0].first_paragraph, "line one\nline two");

    let dir = TempDir::new().unwrap();
    let artifact = ExportArtifact::from_report(report, "goScraper");
    let path = artifact.write_to(dir.path()).unwrap();

    assert_eq!(path.file_name().unwrap(), "goScraper_report.csv");
    assert_eq!(std::fs::read_to_string(&path).unwrap(), encode(report));
}

#[tokio::test]
async fn test_service_from_config_file() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/crawl"))
        .and(query_param("maxConcurrency", "2"))
        .and(query_param("maxPages", "7"))
        .respond_with(csv_response(format!("{}\nhttps://a.com,,,,\n", HEADER)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = parse_config(&format!(
        "[service]\nbase-url = \"{}\"\n\n[defaults]\nmax-concurrency = 2\nmax-pages = 7\n",
        mock_server.uri()
    ))
    .unwrap();

    let service = HttpCrawlService::new(&config.service).unwrap();
    let session = Session::new(service, config.defaults.clone());
    session.update_form(|form| form.set_url("https://a.com"));
    session.run().await.unwrap();

    assert!(session.snapshot().lifecycle().is_success());
}
