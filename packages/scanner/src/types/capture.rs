//! Capture records returned by the snapshot directory.

use serde::{Deserialize, Serialize};

use crate::error::{ScanError, ScanResult};

/// One archived snapshot of a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capture {
    /// Archive-assigned compact date-time (e.g. `20200101000000`), echoed verbatim.
    pub timestamp: String,

    /// The live URL that was captured.
    #[serde(rename = "original")]
    pub original_url: String,
}

impl Capture {
    pub fn new(timestamp: impl Into<String>, original_url: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            original_url: original_url.into(),
        }
    }

    /// Both fields present.
    pub fn is_valid(&self) -> bool {
        !self.timestamp.trim().is_empty() && !self.original_url.trim().is_empty()
    }

    /// Replay URL for this capture: `<base>/web/<timestamp>/<original>`.
    pub fn archive_url(&self, base_url: &str) -> ScanResult<String> {
        if self.timestamp.trim().is_empty() {
            return Err(ScanError::InvalidCapture {
                reason: format!("empty timestamp for {}", self.original_url),
            });
        }
        if self.original_url.trim().is_empty() {
            return Err(ScanError::InvalidCapture {
                reason: format!("empty original URL for {}", self.timestamp),
            });
        }

        Ok(format!(
            "{}/web/{}/{}",
            base_url.trim_end_matches('/'),
            self.timestamp,
            self.original_url
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_url() {
        let capture = Capture::new("20200101000000", "example.com");
        assert_eq!(
            capture.archive_url("https://web.archive.org").unwrap(),
            "https://web.archive.org/web/20200101000000/example.com"
        );
        assert_eq!(
            capture.archive_url("https://web.archive.org/").unwrap(),
            "https://web.archive.org/web/20200101000000/example.com"
        );
    }

    #[test]
    fn test_archive_url_keeps_original_scheme() {
        let capture = Capture::new("19990203040506", "http://example.com:80/index.html");
        assert_eq!(
            capture.archive_url("https://web.archive.org").unwrap(),
            "https://web.archive.org/web/19990203040506/http://example.com:80/index.html"
        );
    }

    #[test]
    fn test_empty_fields_rejected() {
        assert!(!Capture::new("", "example.com").is_valid());
        assert!(!Capture::new("2020", " ").is_valid());

        let err = Capture::new("", "example.com")
            .archive_url("https://web.archive.org")
            .unwrap_err();
        assert!(matches!(err, ScanError::InvalidCapture { .. }));
    }
}
