//! Mock directory and fetcher for testing.
//!
//! Both record their calls so tests can assert on what the orchestrator asked for.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::{FetchError, FetchResult};
use crate::traits::directory::{DirectoryQuery, SnapshotDirectory};
use crate::traits::fetcher::CaptureFetcher;
use crate::types::Capture;

/// Directory returning a fixed capture list.
///
/// # Example
///
/// ```rust
/// use waylook_scan::clients::MockDirectory;
/// use waylook_scan::types::Capture;
///
/// let directory = MockDirectory::new()
///     .with_capture(Capture::new("20200101000000", "example.com"));
/// assert_eq!(directory.query_count(), 0);
/// ```
#[derive(Default, Clone)]
pub struct MockDirectory {
    captures: Arc<RwLock<Vec<Capture>>>,
    queries: Arc<RwLock<Vec<DirectoryQuery>>>,
}

impl MockDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a capture (builder pattern).
    pub fn with_capture(self, capture: Capture) -> Self {
        self.captures.write().unwrap().push(capture);
        self
    }

    /// Add several captures (builder pattern).
    pub fn with_captures(self, captures: Vec<Capture>) -> Self {
        self.captures.write().unwrap().extend(captures);
        self
    }

    /// Number of `list_captures` calls.
    pub fn query_count(&self) -> usize {
        self.queries.read().unwrap().len()
    }

    /// Queries received, in order.
    pub fn queries(&self) -> Vec<DirectoryQuery> {
        self.queries.read().unwrap().clone()
    }
}

#[async_trait]
impl SnapshotDirectory for MockDirectory {
    async fn list_captures(&self, query: &DirectoryQuery) -> Vec<Capture> {
        self.queries.write().unwrap().push(query.clone());

        self.captures
            .read()
            .unwrap()
            .iter()
            .take(query.limit as usize)
            .cloned()
            .collect()
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Canned failure returned for a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    Timeout,
    Status(u16),
}

/// Fetcher returning canned HTML per archive URL.
///
/// URLs with neither a page nor a failure configured fail as unavailable.
#[derive(Default, Clone)]
pub struct MockFetcher {
    pages: Arc<RwLock<HashMap<String, String>>>,
    failures: Arc<RwLock<HashMap<String, MockFailure>>>,
    calls: Arc<RwLock<Vec<String>>>,
    latency: Option<Duration>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` for `archive_url` (builder pattern).
    pub fn with_page(self, archive_url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages
            .write()
            .unwrap()
            .insert(archive_url.into(), html.into());
        self
    }

    /// Fail `archive_url` with a timeout (builder pattern).
    pub fn with_timeout(self, archive_url: impl Into<String>) -> Self {
        self.failures
            .write()
            .unwrap()
            .insert(archive_url.into(), MockFailure::Timeout);
        self
    }

    /// Fail `archive_url` with an HTTP status (builder pattern).
    pub fn with_status(self, archive_url: impl Into<String>, status: u16) -> Self {
        self.failures
            .write()
            .unwrap()
            .insert(archive_url.into(), MockFailure::Status(status));
        self
    }

    /// Delay every fetch by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of fetches attempted.
    pub fn fetch_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    /// URLs fetched, in order.
    pub fn fetch_calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl CaptureFetcher for MockFetcher {
    async fn fetch(&self, archive_url: &str) -> FetchResult<String> {
        self.calls.write().unwrap().push(archive_url.to_string());

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let failure = self.failures.read().unwrap().get(archive_url).copied();
        match failure {
            Some(MockFailure::Timeout) => Err(FetchError::Timeout {
                url: archive_url.to_string(),
            }),
            Some(MockFailure::Status(status)) => Err(FetchError::Status {
                status,
                url: archive_url.to_string(),
            }),
            None => self
                .pages
                .read()
                .unwrap()
                .get(archive_url)
                .cloned()
                .ok_or_else(|| FetchError::Unavailable {
                    url: archive_url.to_string(),
                }),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_directory_respects_limit() {
        let directory = MockDirectory::new().with_captures(vec![
            Capture::new("1", "a.com"),
            Capture::new("2", "a.com"),
            Capture::new("3", "a.com"),
        ]);

        let captures = directory
            .list_captures(&DirectoryQuery::new("a.com", 2))
            .await;
        assert_eq!(captures.len(), 2);
        assert_eq!(directory.query_count(), 1);
        assert_eq!(directory.queries()[0].domain, "a.com");
    }

    #[tokio::test]
    async fn test_mock_fetcher_canned_responses() {
        let fetcher = MockFetcher::new()
            .with_page("https://a/1", "<p>hi</p>")
            .with_timeout("https://a/2")
            .with_status("https://a/3", 503);

        assert_eq!(fetcher.fetch("https://a/1").await.unwrap(), "<p>hi</p>");
        assert!(matches!(
            fetcher.fetch("https://a/2").await,
            Err(FetchError::Timeout { .. })
        ));
        assert!(matches!(
            fetcher.fetch("https://a/3").await,
            Err(FetchError::Status { status: 503, .. })
        ));
        assert!(matches!(
            fetcher.fetch("https://a/4").await,
            Err(FetchError::Unavailable { .. })
        ));
        assert_eq!(fetcher.fetch_count(), 4);
    }
}
