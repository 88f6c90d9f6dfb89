//! Route tests driving the router directly with `oneshot`.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use tower::ServiceExt;
use waylook_scan::{ArchiveConfig, Capture, MockDirectory, MockFetcher, PolitenessDelay, Scanner};
use waylook_server::server::build_app;

const ARCHIVE_URL: &str = "https://web.archive.org/web/20200101000000/example.com";

fn app(directory: MockDirectory, fetcher: MockFetcher) -> Router {
    let scanner = Scanner::new(
        Arc::new(directory),
        Arc::new(fetcher),
        ArchiveConfig::new().with_politeness(PolitenessDelay::none()),
    );
    build_app(Arc::new(scanner), Vec::new())
}

async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_missing_keyword_is_rejected() {
    let directory = MockDirectory::new();
    let (status, _, body) = get(
        app(directory.clone(), MockFetcher::new()),
        "/api/scan?domain=example.com",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["error"], "Missing required parameters: domain and keyword");
    assert_eq!(directory.query_count(), 0);
}

#[tokio::test]
async fn test_malformed_year_is_rejected() {
    let (status, _, body) = get(
        app(MockDirectory::new(), MockFetcher::new()),
        "/api/scan?domain=example.com&keyword=login&year=15",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("\"error\""));
}

#[tokio::test]
async fn test_scan_streams_events() {
    let directory =
        MockDirectory::new().with_capture(Capture::new("20200101000000", "example.com"));
    let fetcher =
        MockFetcher::new().with_page(ARCHIVE_URL, "<html><body><p>Please login here</p></body></html>");

    let (status, headers, body) = get(
        app(directory.clone(), fetcher),
        "/api/scan?domain=example.com&keyword=login&year=&limit=abc",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));
    assert_eq!(headers[header::CACHE_CONTROL], "no-cache");
    assert_eq!(headers["x-accel-buffering"], "no");

    let payloads: Vec<serde_json::Value> = body
        .lines()
        .filter_map(|line| line.strip_prefix("data: "))
        .map(|data| serde_json::from_str(data).unwrap())
        .collect();
    let kinds: Vec<&str> = payloads
        .iter()
        .map(|p| p["type"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["progress", "progress", "progress", "match", "complete"]);
    assert_eq!(payloads[3]["match"]["matchType"], "TEXT");
    assert_eq!(payloads[3]["match"]["archiveUrl"], ARCHIVE_URL);
    assert_eq!(payloads[4]["message"], "Scan complete.");

    let queries = directory.queries();
    assert_eq!(queries[0].year, None);
    assert_eq!(queries[0].limit, 100);
}

#[tokio::test]
async fn test_health() {
    let (status, _, body) = get(app(MockDirectory::new(), MockFetcher::new()), "/health").await;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_landing_page() {
    let (status, headers, body) = get(app(MockDirectory::new(), MockFetcher::new()), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    assert!(body.contains("/api/scan"));
}
