//! Archive clients.
//!
//! - `CdxDirectory` - capture discovery via the CDX index
//! - `HttpCaptureFetcher` - capture retrieval over HTTP
//! - `MockDirectory` / `MockFetcher` - canned responses for tests

mod cdx;
mod http;
mod mock;

pub use cdx::{cdx_params, parse_cdx_rows, CdxDirectory};
pub use http::HttpCaptureFetcher;
pub use mock::{MockDirectory, MockFailure, MockFetcher};

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, REFERER};

use crate::error::{ScanError, ScanResult};
use crate::types::ArchiveConfig;

/// Build the shared HTTP client: identity headers plus the per-request timeout.
pub fn build_http_client(config: &ArchiveConfig) -> ScanResult<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        REFERER,
        HeaderValue::from_str(&config.referer)
            .map_err(|e| ScanError::Config(format!("invalid referer: {e}")))?,
    );
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/json;q=0.9,*/*;q=0.8"),
    );

    let client = reqwest::Client::builder()
        .timeout(config.timeout)
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .build()?;

    Ok(client)
}
