//! Integration tests for the scrape pipeline
//!
//! These tests use wiremock to create mock HTTP servers and check full runs
//! end-to-end: ordering, failure isolation, pacing and CSV output.

use email_scraper::config::{Config, OutputConfig, ScraperConfig, UserAgentConfig};
use email_scraper::output::{write_csv, RunStatistics};
use email_scraper::{resolve_domain, run_scrape, FailureReason, ResultRecord};
use std::time::{Duration, Instant};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with the given limits
fn create_test_config(concurrency_limit: u32, delay: f64, timeout: f64) -> Config {
    Config {
        scraper: ScraperConfig {
            concurrency_limit,
            inter_dispatch_delay: delay,
            per_request_timeout: timeout,
            max_retries: 0,
            retry_delay: 0.0,
        },
        user_agent: UserAgentConfig {
            value: "TestBot/1.0".to_string(),
        },
        output: OutputConfig::default(),
    }
}

fn page(title: &str, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!(
            "<html><head><title>{}</title></head><body>{}</body></html>",
            title, body
        ))
        .insert_header("content-type", "text/html")
}

/// Mounts a small site mixing good pages, errors and a slow page
async fn mount_site(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/acme"))
        .and(header("user-agent", "TestBot/1.0"))
        .respond_with(page(
            "Acme Corp",
            "Contact: sales@acme.test and sales@acme.test<br>Support: help@acme.test",
        ))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/no-title"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><body>owner@plain.test</body></html>"),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/quiet"))
        .respond_with(page("Quiet Shop", "No contact details here"))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(page("Too Slow", "late@slow.test").set_delay(Duration::from_secs(3)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_run_mixed_outcomes() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let base = server.uri();
    let domain = resolve_domain(&base);

    let urls = vec![
        format!("{}/acme", base),
        format!("{}/gone", base),
        "not a url".to_string(),
        format!("{}/slow", base),
        format!("{}/no-title", base),
        format!("{}/quiet", base),
    ];

    let config = create_test_config(3, 0.0, 0.5);
    let records = run_scrape(&config, urls.clone()).await.expect("run failed");

    // One record per URL, in input order
    assert_eq!(records.len(), urls.len());
    for (record, url) in records.iter().zip(&urls) {
        assert_eq!(&record.url, url);
        assert!(!record.domain.is_empty());
    }

    assert_eq!(records[0].business, "Acme Corp");
    assert_eq!(records[0].emails, "sales@acme.test, help@acme.test");
    assert_eq!(records[0].domain, domain);

    assert_eq!(records[1].business, domain);
    assert_eq!(records[1].emails, "");
    assert_eq!(records[1].failure, Some(FailureReason::HttpStatus(404)));

    assert_eq!(records[2].domain, "not a url");
    assert_eq!(records[2].business, "not a url");
    assert_eq!(records[2].emails, "");

    // Timed out
    assert_eq!(records[3].emails, "");
    assert_eq!(records[3].domain, domain);
    assert_eq!(records[3].failure, Some(FailureReason::Timeout));

    assert_eq!(records[4].business, domain);
    assert_eq!(records[4].emails, "owner@plain.test");

    assert_eq!(records[5].business, "Quiet Shop");
    assert_eq!(records[5].emails, "");
    assert!(records[5].is_success());

    let stats = RunStatistics::from_records(&records);
    assert_eq!(stats.total_urls, 6);
    assert_eq!(stats.succeeded, 3);
    assert_eq!(stats.failed, 3);
}

#[tokio::test]
async fn test_concurrency_does_not_change_results() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let base = server.uri();

    let urls: Vec<String> = ["acme", "gone", "quiet", "no-title", "acme", "missing", "quiet"]
        .iter()
        .map(|p| format!("{}/{}", base, p))
        .collect();

    let serial = run_scrape(&create_test_config(1, 0.0, 2.0), urls.clone())
        .await
        .unwrap();
    let parallel = run_scrape(&create_test_config(10, 0.0, 2.0), urls)
        .await
        .unwrap();

    assert_eq!(serial, parallel);
}

#[tokio::test]
async fn test_rerun_is_byte_identical() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let base = server.uri();

    let urls = vec![
        format!("{}/acme", base),
        format!("{}/gone", base),
        format!("{}/no-title", base),
    ];
    let config = create_test_config(4, 0.0, 2.0);

    let first = run_scrape(&config, urls.clone()).await.unwrap();
    let second = run_scrape(&config, urls).await.unwrap();
    assert_eq!(first, second);

    let dir = tempfile::tempdir().unwrap();
    let first_path = dir.path().join("first.csv");
    let second_path = dir.path().join("second.csv");
    write_csv(&first_path, &first).unwrap();
    write_csv(&second_path, &second).unwrap();

    let first_bytes = std::fs::read(&first_path).unwrap();
    assert_eq!(first_bytes, std::fs::read(&second_path).unwrap());

    let content = String::from_utf8(first_bytes).unwrap();
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("url,business,emails,domain"));
    assert_eq!(
        lines.next(),
        Some(
            format!(
                "{}/acme,Acme Corp,\"sales@acme.test, help@acme.test\",{}",
                base,
                resolve_domain(&base)
            )
            .as_str()
        )
    );
    assert_eq!(lines.count(), 2);
}

#[tokio::test]
async fn test_dispatch_pacing_bounds_run_time() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(page("Fast", "fast@pace.test"))
        .expect(5)
        .mount(&server)
        .await;

    let urls: Vec<String> = (0..5).map(|i| format!("{}/p{}", server.uri(), i)).collect();
    let config = create_test_config(10, 0.1, 2.0);

    let start = Instant::now();
    let records = run_scrape(&config, urls).await.unwrap();

    // The last dispatch cannot happen before (N - 1) * delay
    assert!(start.elapsed() >= Duration::from_millis(400));
    assert_eq!(records.len(), 5);
    assert!(records.iter().all(ResultRecord::is_success));
}

#[tokio::test]
async fn test_slow_url_does_not_block_others() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let base = server.uri();

    let mut urls = vec![format!("{}/slow", base)];
    urls.extend((0..6).map(|_| format!("{}/acme", base)));

    let start = Instant::now();
    let records = run_scrape(&create_test_config(2, 0.0, 1.0), urls)
        .await
        .unwrap();

    // The slow page holds one slot until its own timeout; the rest finish meanwhile
    assert!(start.elapsed() < Duration::from_secs(3));
    assert_eq!(records[0].failure, Some(FailureReason::Timeout));
    assert!(records[1..].iter().all(|r| r.business == "Acme Corp"));
}

#[tokio::test]
async fn test_unreachable_host_yields_record() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let url = format!("http://127.0.0.1:{}/contact", port);
    let records = run_scrape(&create_test_config(1, 0.0, 1.0), vec![url.clone()])
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].url, url);
    assert_eq!(records[0].domain, format!("127.0.0.1:{}", port));
    assert!(matches!(
        records[0].failure,
        Some(FailureReason::ConnectionError(_))
    ));
}
