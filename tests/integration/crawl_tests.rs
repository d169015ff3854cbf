//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use chrono::NaiveDate;
use paraulogic_crawler::config::{validate, Config};
use paraulogic_crawler::crawler::{run_crawl, Coordinator};
use paraulogic_crawler::dates::DateRange;
use paraulogic_crawler::output::write_words;
use std::collections::HashSet;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server, with fast retries
fn create_test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.crawler.url_template = format!("{}/{{date}}-solucions/", base_url);
    config.crawler.max_concurrent_fetches = 4;
    config.crawler.request_timeout_secs = 5;
    config.crawler.connect_timeout_secs = 1;
    config.retry.backoff_base_ms = 1;
    config.retry.backoff_max_ms = 10;
    config
}

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
}

fn solutions_page(words: &[&str]) -> String {
    let items: String = words
        .iter()
        .enumerate()
        .map(|(i, w)| format!("<p>{}. {}</p>", i + 1, w))
        .collect();
    format!(
        r#"<html><head><title>Solucions</title></head><body>
        <nav>1. inici</nav>
        <div class="entry-content">{}</div>
        </body></html>"#,
        items
    )
}

fn words(list: &[&str]) -> HashSet<String> {
    list.iter().map(|w| w.to_string()).collect()
}

#[tokio::test]
async fn test_full_crawl_with_missing_day() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/01-06-2024-solucions/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(solutions_page(&["a", "b o bb"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    // A 404 is final: exactly one request
    Mock::given(method("GET"))
        .and(path("/02-06-2024-solucions/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/03-06-2024-solucions/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(solutions_page(&["b", "c"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    validate(&config).expect("test config should be valid");

    let range = DateRange::new(date(1), date(3)).unwrap();
    let report = run_crawl(&config, range).await.expect("crawl should complete");

    assert_eq!(report.result.words, words(&["a", "b", "c"]));
    assert_eq!(report.result.failed, 1);
    assert_eq!(report.statistics.not_found, 1);
    assert_eq!(report.statistics.dates_succeeded, 2);
    assert_eq!(report.statistics.tokens_seen, 4);
}

#[tokio::test]
async fn test_transient_errors_are_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/05-06-2024-solucions/"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/05-06-2024-solucions/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(solutions_page(&["pluja"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let range = DateRange::new(date(5), date(5)).unwrap();
    let report = run_crawl(&config, range).await.unwrap();

    assert_eq!(report.result.words, words(&["pluja"]));
    assert_eq!(report.result.failed, 0);
}

#[tokio::test]
async fn test_retry_budget_exhausted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/06-06-2024-solucions/"))
        .respond_with(ResponseTemplate::new(503).insert_header("retry-after", "0"))
        .expect(5)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let range = DateRange::new(date(6), date(6)).unwrap();
    let report = run_crawl(&config, range).await.unwrap();

    assert!(report.result.words.is_empty());
    assert_eq!(report.result.failed, 1);
    assert_eq!(report.statistics.transient_failures, 1);
}

#[tokio::test]
async fn test_other_client_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/07-06-2024-solucions/"))
        .respond_with(ResponseTemplate::new(410))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let range = DateRange::new(date(7), date(7)).unwrap();
    let report = run_crawl(&config, range).await.unwrap();

    assert_eq!(report.result.failed, 1);
    assert_eq!(report.statistics.not_found, 1);
}

#[tokio::test]
async fn test_page_without_content_region() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/08-06-2024-solucions/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body><article><p>1. fals</p></article></body></html>"),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let range = DateRange::new(date(8), date(8)).unwrap();
    let report = run_crawl(&config, range).await.unwrap();

    assert!(report.result.words.is_empty());
    assert_eq!(report.statistics.unparseable, 1);
}

#[tokio::test]
async fn test_unreachable_server_is_transient() {
    // Reserve a port, then free it so connections are refused
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = create_test_config(&format!("http://127.0.0.1:{}", port));
    let range = DateRange::new(date(9), date(10)).unwrap();
    let report = run_crawl(&config, range).await.unwrap();

    assert_eq!(report.result.failed, 2);
    assert_eq!(report.statistics.transient_failures, 2);
}

#[tokio::test]
async fn test_month_of_pages_written_to_file() {
    let mock_server = MockServer::start().await;

    // Every day lists the same word plus one of its own
    for day in 1..=30u32 {
        let own = format!("mot{}", day);
        Mock::given(method("GET"))
            .and(path(format!("/{:02}-06-2024-solucions/", day)))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(solutions_page(&["comú", &own])),
            )
            .mount(&mock_server)
            .await;
    }

    let config = create_test_config(&mock_server.uri());
    let coordinator = Coordinator::new(&config).expect("Failed to create coordinator");
    let range = DateRange::new(date(1), date(30)).unwrap();
    let report = coordinator.run(range).await.unwrap();

    assert_eq!(report.result.words.len(), 31);
    assert_eq!(report.result.failed, 0);

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("words.json");
    write_words(&report.result, &output).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    let rows = value["words"].as_array().unwrap();
    assert_eq!(rows.len(), 31);
    assert!(rows.iter().any(|row| row[0] == "comú"));
}
