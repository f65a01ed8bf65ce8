//! Downloader tests against a local mock server.
//!
//! The blocking client must not run on the async runtime, so each download
//! happens inside `spawn_blocking`.

use std::fs;

use pretty_assertions::assert_eq;
use rapidfeed_parser::fetch::{fetch_urls, FetchReport, INDEX_FILE};
use rapidfeed_parser::http::{
    create_client, download_bytes, fetch_feed, Fetched, Validators, FEED_ACCEPT, MAX_RETRIES,
};
use rapidfeed_parser::{parse_bytes, FeedError, FormatToken, ParseOptions};
use tempfile::TempDir;
use wiremock::matchers::{any, header, headers, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const VALID_RSS: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>Mock Feed</title>
<item><title>Hello</title><link>http://example.com/hello</link></item>
</channel></rss>"#;

async fn download(url: String) -> rapidfeed_parser::Result<Vec<u8>> {
    tokio::task::spawn_blocking(move || {
        let client = create_client()?;
        download_bytes(&client, &url)
    })
    .await
    .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_download_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(VALID_RSS)
                .insert_header("content-type", "application/rss+xml"),
        )
        .mount(&server)
        .await;

    let bytes = download(format!("{}/feed.xml", server.uri())).await.unwrap();
    let doc = parse_bytes(&bytes, &ParseOptions::default());

    assert_eq!(doc.version, Some(FormatToken::Rss20));
    assert_eq!(doc.feed.title, "Mock Feed");
}

async fn fetch(url: String, validators: Option<Validators>) -> rapidfeed_parser::Result<Fetched> {
    tokio::task::spawn_blocking(move || {
        let client = create_client()?;
        fetch_feed(&client, &url, validators.as_ref())
    })
    .await
    .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_request_accepts_feed_types() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(headers(
            "accept",
            FEED_ACCEPT.split(',').map(str::trim).collect(),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(VALID_RSS))
        .expect(1)
        .mount(&server)
        .await;

    let bytes = download(server.uri()).await.unwrap();
    assert_eq!(bytes, VALID_RSS.as_bytes());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_keeps_validators_and_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(VALID_RSS)
                .insert_header("content-type", "application/rss+xml")
                .insert_header("etag", "\"v1\"")
                .insert_header("last-modified", "Mon, 06 Sep 2021 16:45:00 GMT"),
        )
        .mount(&server)
        .await;

    let Fetched::Updated(response) = fetch(server.uri(), None).await.unwrap() else {
        panic!("expected a feed body");
    };
    assert_eq!(response.content_type.as_deref(), Some("application/rss+xml"));
    assert_eq!(
        response.validators,
        Validators {
            etag: Some("\"v1\"".to_string()),
            last_modified: Some("Mon, 06 Sep 2021 16:45:00 GMT".to_string()),
        }
    );
    assert_eq!(response.body, VALID_RSS.as_bytes());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_conditional_request_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("if-none-match", "\"v1\""))
        .respond_with(ResponseTemplate::new(304))
        .expect(1)
        .mount(&server)
        .await;

    let validators = Validators {
        etag: Some("\"v1\"".to_string()),
        last_modified: None,
    };
    let fetched = fetch(server.uri(), Some(validators)).await.unwrap();
    assert_eq!(fetched, Fetched::Unchanged);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_download_not_modified_is_error() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(304))
        .expect(1)
        .mount(&server)
        .await;

    let err = download(server.uri()).await.unwrap_err();
    assert!(matches!(err, FeedError::NotModified(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_download_429_retried() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_string(VALID_RSS))
        .mount(&server)
        .await;

    let bytes = download(server.uri()).await.unwrap();
    assert_eq!(bytes, VALID_RSS.as_bytes());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_download_404_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let err = download(server.uri()).await.unwrap_err();
    assert!(matches!(err, FeedError::Http(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_download_500_retries_then_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(u64::from(MAX_RETRIES))
        .mount(&server)
        .await;

    let err = download(server.uri()).await.unwrap_err();
    assert!(matches!(
        err,
        FeedError::RetriesExhausted { attempts, .. } if attempts == MAX_RETRIES
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_download_503_then_success() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_string(VALID_RSS))
        .mount(&server)
        .await;

    let bytes = download(server.uri()).await.unwrap();
    assert_eq!(bytes, VALID_RSS.as_bytes());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_urls_writes_numbered_files() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(VALID_RSS))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing.xml"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let out = TempDir::new().unwrap();
    let out_path = out.path().join("feeds");
    let urls = vec![
        format!("{}/a.xml", server.uri()),
        format!("{}/missing.xml", server.uri()),
    ];

    let (report, results) = {
        let out_path = out_path.clone();
        let urls = urls.clone();
        tokio::task::spawn_blocking(move || -> (FetchReport, Vec<bool>) {
            let client = create_client().unwrap();
            let mut results = Vec::new();
            let report = fetch_urls(&client, &urls, &out_path, |_, ok| results.push(ok)).unwrap();
            (report, results)
        })
        .await
        .unwrap()
    };

    assert_eq!(results, vec![true, false]);
    assert_eq!(report.requested, 2);
    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.files.get("0001.dat"), Some(&urls[0]));
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].url, urls[1]);

    assert_eq!(fs::read_to_string(out_path.join("0001.dat")).unwrap(), VALID_RSS);
    assert!(!out_path.join("0002.dat").exists());

    let index: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out_path.join(INDEX_FILE)).unwrap()).unwrap();
    assert_eq!(index["0001.dat"], urls[0].as_str());
}
