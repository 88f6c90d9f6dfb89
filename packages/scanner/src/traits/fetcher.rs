//! Capture fetcher trait.

use async_trait::async_trait;

use crate::error::FetchResult;

/// Retrieves the HTML of one archived capture.
///
/// Any error means "skip this capture"; the orchestrator never retries.
#[async_trait]
pub trait CaptureFetcher: Send + Sync {
    /// Fetch the body at `archive_url`. Non-2xx responses are errors.
    async fn fetch(&self, archive_url: &str) -> FetchResult<String>;

    /// Name for logging.
    fn name(&self) -> &str;
}
