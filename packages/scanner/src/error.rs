//! Typed errors for the scanning library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can tell a
//! skipped capture apart from a pipeline fault.

use thiserror::Error;

/// Pipeline-level faults. Any of these ends a scan with an `error` event.
#[derive(Debug, Error)]
pub enum ScanError {
    /// A capture record violated the non-empty field invariant
    #[error("invalid capture record: {reason}")]
    InvalidCapture { reason: String },

    /// The scan was started without a domain or keyword
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// Event serialization failed
    #[error("event encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    /// The scan task stopped abnormally
    #[error("scan task failed: {0}")]
    Task(String),

    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    /// Invalid configuration value
    #[error("config error: {0}")]
    Config(String),
}

/// Errors raised while querying the snapshot directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Transport failure (connect, timeout, TLS)
    #[error("directory request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The index answered with a non-success status
    #[error("directory returned HTTP {status}")]
    Status { status: u16 },

    /// The index answered with something other than a row list
    #[error("malformed directory payload: {0}")]
    Payload(String),
}

/// Errors raised while retrieving a single capture.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure (connect, TLS, body decode)
    #[error("capture request failed: {0}")]
    Http(#[source] reqwest::Error),

    /// The request exceeded the configured timeout
    #[error("timeout fetching: {url}")]
    Timeout { url: String },

    /// Non-2xx response
    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// No canned page or other test-double failure
    #[error("capture unavailable: {url}")]
    Unavailable { url: String },
}

impl FetchError {
    /// Classify a reqwest error, separating timeouts from other transport failures.
    pub fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Http(err)
        }
    }
}

/// Result type alias for pipeline operations.
pub type ScanResult<T> = std::result::Result<T, ScanError>;

/// Result type alias for directory queries.
pub type DirectoryResult<T> = std::result::Result<T, DirectoryError>;

/// Result type alias for capture retrieval.
pub type FetchResult<T> = std::result::Result<T, FetchError>;
