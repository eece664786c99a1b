//! Integration tests for `WebCollector` and `collect_all` using wiremock HTTP mocks.

use resa_core::SourceKind;
use resa_sources::{collect_all, RetryPolicy, SourceError, WebCollector, XCollector};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn feed(items: &[(&str, &str)]) -> String {
    let body: String = items
        .iter()
        .map(|(title, link)| {
            format!(
                "<item><title>{title}</title><link>{link}</link>\
                 <pubDate>Tue, 02 Jan 2024 10:00:00 GMT</pubDate>\
                 <source url=\"https://src.example\">Example</source></item>"
            )
        })
        .collect();
    format!(r#"<?xml version="1.0"?><rss version="2.0"><channel>{body}</channel></rss>"#)
}

fn instant_retry(max_retries: u32) -> RetryPolicy {
    RetryPolicy {
        max_retries,
        base_delay_ms: 0,
        max_delay_ms: 0,
    }
}

fn collector(server: &MockServer, retry: RetryPolicy) -> WebCollector {
    WebCollector::new(5, "resa-test/0.1", retry)
        .expect("client construction should not fail")
        .with_base_urls(&server.uri(), &server.uri())
}

async fn mount_google(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/rss/search"))
        .and(query_param("q", "Uniswap v4"))
        .respond_with(template)
        .mount(server)
        .await;
}

async fn mount_bing(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/news/search"))
        .and(query_param("q", "Uniswap v4"))
        .and(query_param("format", "rss"))
        .respond_with(template)
        .mount(server)
        .await;
}

#[tokio::test]
async fn merges_feeds_and_dedups_by_url() {
    let server = MockServer::start().await;
    mount_google(
        &server,
        ResponseTemplate::new(200).set_body_string(feed(&[
            ("Hooks launch", "https://a.example/1"),
            ("Fees drop", "https://a.example/2"),
        ])),
    )
    .await;
    mount_bing(
        &server,
        ResponseTemplate::new(200).set_body_string(feed(&[
            ("Hooks launch (Bing)", "https://a.example/1"),
            ("Volumes up", "https://b.example/3"),
        ])),
    )
    .await;

    let items = collector(&server, RetryPolicy::none())
        .collect("Uniswap v4", 10)
        .await
        .expect("collection should succeed");

    let urls: Vec<&str> = items.iter().map(|i| i.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://a.example/1",
            "https://a.example/2",
            "https://b.example/3"
        ]
    );
    assert_eq!(items[0].title(), "Hooks launch");
    assert_eq!(items[0].author, "Example");
    assert_eq!(items[0].date.as_deref(), Some("2024-01-02T10:00:00+00:00"));
}

#[tokio::test]
async fn truncates_to_max_items() {
    let server = MockServer::start().await;
    let many: Vec<(String, String)> = (0..5)
        .map(|i| (format!("t{i}"), format!("https://a.example/{i}")))
        .collect();
    let refs: Vec<(&str, &str)> = many.iter().map(|(t, l)| (t.as_str(), l.as_str())).collect();
    mount_google(&server, ResponseTemplate::new(200).set_body_string(feed(&refs))).await;
    mount_bing(&server, ResponseTemplate::new(200).set_body_string(feed(&refs))).await;

    let items = collector(&server, RetryPolicy::none())
        .collect("Uniswap v4", 3)
        .await
        .unwrap();
    assert_eq!(items.len(), 3);
}

#[tokio::test]
async fn one_failing_feed_is_tolerated() {
    let server = MockServer::start().await;
    mount_google(&server, ResponseTemplate::new(403)).await;
    mount_bing(
        &server,
        ResponseTemplate::new(200).set_body_string(feed(&[("Only Bing", "https://b.example/1")])),
    )
    .await;

    let items = collector(&server, RetryPolicy::none())
        .collect("Uniswap v4", 10)
        .await
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title(), "Only Bing");
}

#[tokio::test]
async fn all_feeds_failing_is_an_error() {
    let server = MockServer::start().await;
    mount_google(&server, ResponseTemplate::new(401)).await;
    mount_bing(&server, ResponseTemplate::new(404)).await;

    let err = collector(&server, RetryPolicy::none())
        .collect("Uniswap v4", 10)
        .await
        .unwrap_err();
    assert!(
        matches!(err, SourceError::UnexpectedStatus { status: 401, .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn transient_server_error_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rss/search"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    mount_google(
        &server,
        ResponseTemplate::new(200)
            .set_body_string(feed(&[("After retry", "https://a.example/r")])),
    )
    .await;
    mount_bing(&server, ResponseTemplate::new(404)).await;

    let items = collector(&server, instant_retry(2))
        .collect("Uniswap v4", 10)
        .await
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title(), "After retry");
}

#[tokio::test]
async fn collect_all_records_per_source_results() {
    let server = MockServer::start().await;
    mount_google(
        &server,
        ResponseTemplate::new(200).set_body_string(feed(&[("Story", "https://a.example/s")])),
    )
    .await;
    mount_bing(&server, ResponseTemplate::new(500)).await;

    let web = collector(&server, RetryPolicy::none());
    let x = XCollector::new(None, None);
    let outcome = collect_all(&x, &web, &SourceKind::ALL, "Uniswap v4", 10).await;

    assert_eq!(outcome.items.len(), 1);
    assert_eq!(outcome.succeeded, vec![SourceKind::Web]);
    assert_eq!(outcome.empty, vec![SourceKind::X]);
    assert!(outcome.failed.is_empty());
    assert!(outcome.is_partial());
    assert_eq!(outcome.count(SourceKind::Web), 1);
    assert_eq!(outcome.count(SourceKind::X), 0);
}

#[tokio::test]
async fn collect_all_skips_unselected_sources() {
    let server = MockServer::start().await;
    mount_google(&server, ResponseTemplate::new(500)).await;
    mount_bing(&server, ResponseTemplate::new(500)).await;

    let web = collector(&server, RetryPolicy::none());
    let x = XCollector::new(None, None);
    let outcome = collect_all(&x, &web, &[SourceKind::Web], "Uniswap v4", 10).await;

    assert!(outcome.items.is_empty());
    assert!(outcome.empty.is_empty());
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].0, SourceKind::Web);
    assert!(!outcome.is_partial());
}
