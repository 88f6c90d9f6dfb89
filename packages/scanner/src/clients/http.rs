//! HTTP capture fetcher.

use async_trait::async_trait;
use tracing::debug;

use crate::error::{FetchError, FetchResult, ScanResult};
use crate::traits::fetcher::CaptureFetcher;
use crate::types::ArchiveConfig;

/// Fetches archived pages with the configured identity headers and timeout.
pub struct HttpCaptureFetcher {
    client: reqwest::Client,
}

impl HttpCaptureFetcher {
    pub fn new(config: &ArchiveConfig) -> ScanResult<Self> {
        Ok(Self {
            client: super::build_http_client(config)?,
        })
    }

    /// Reuse an existing HTTP client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CaptureFetcher for HttpCaptureFetcher {
    async fn fetch(&self, archive_url: &str) -> FetchResult<String> {
        debug!(url = %archive_url, "Fetching capture");

        let response = self
            .client
            .get(archive_url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(archive_url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: archive_url.to_string(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(archive_url, e))
    }

    fn name(&self) -> &str {
        "http"
    }
}
