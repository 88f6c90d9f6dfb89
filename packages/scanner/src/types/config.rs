//! Configuration for talking to the archive.

use std::time::Duration;

/// Default CDX index endpoint.
pub const DEFAULT_CDX_ENDPOINT: &str = "https://web.archive.org/cdx/search/cdx";

/// Default host serving archived captures.
pub const DEFAULT_ARCHIVE_BASE_URL: &str = "https://web.archive.org";

/// Browser-like identity; the archive throttles obvious bots harder.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36";

/// Referer sent with every archive request.
pub const DEFAULT_REFERER: &str = "https://web.archive.org/";

/// Script sources containing this domain are archive instrumentation.
pub const DEFAULT_INSTRUMENTATION_DOMAIN: &str = "archive.org";

/// Default capture cap per scan.
pub const DEFAULT_LIMIT: u32 = 100;

/// Randomized pause applied before each capture fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolitenessDelay {
    pub min: Duration,
    pub max: Duration,
}

impl Default for PolitenessDelay {
    fn default() -> Self {
        Self {
            min: Duration::from_millis(500),
            max: Duration::from_millis(1000),
        }
    }
}

impl PolitenessDelay {
    /// Create a delay range. Bounds are swapped if given out of order.
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// No delay at all (tests, local mirrors).
    pub fn none() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.max.is_zero()
    }

    /// Pick a delay uniformly within `[min, max]`.
    pub fn sample(&self) -> Duration {
        let min = self.min.as_millis() as u64;
        let max = self.max.as_millis() as u64;
        if max <= min {
            return self.min;
        }
        Duration::from_millis(fastrand::u64(min..=max))
    }
}

/// Connection settings shared by the directory client, the capture fetcher
/// and the orchestrator.
#[derive(Debug, Clone)]
pub struct ArchiveConfig {
    /// CDX index endpoint queried for captures.
    pub cdx_endpoint: String,

    /// Base URL captures are replayed from (`<base>/web/<timestamp>/<original>`).
    pub archive_base_url: String,

    /// User-Agent header for every outbound request.
    pub user_agent: String,

    /// Referer header for every outbound request.
    pub referer: String,

    /// Per-request timeout. Default: 60s.
    pub timeout: Duration,

    /// Pause before each capture fetch.
    pub politeness: PolitenessDelay,

    /// Capture cap used when the caller does not supply a valid one.
    pub default_limit: u32,

    /// Domain whose `<script src>` references are stripped before scanning.
    pub instrumentation_domain: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            cdx_endpoint: DEFAULT_CDX_ENDPOINT.to_string(),
            archive_base_url: DEFAULT_ARCHIVE_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            referer: DEFAULT_REFERER.to_string(),
            timeout: Duration::from_secs(60),
            politeness: PolitenessDelay::default(),
            default_limit: DEFAULT_LIMIT,
            instrumentation_domain: DEFAULT_INSTRUMENTATION_DOMAIN.to_string(),
        }
    }
}

impl ArchiveConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the CDX endpoint.
    pub fn with_cdx_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.cdx_endpoint = endpoint.into();
        self
    }

    /// Set the replay base URL. Trailing slashes are dropped.
    pub fn with_archive_base_url(mut self, base: impl Into<String>) -> Self {
        self.archive_base_url = base.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the politeness delay range.
    pub fn with_politeness(mut self, politeness: PolitenessDelay) -> Self {
        self.politeness = politeness;
        self
    }

    /// Set the default capture cap.
    pub fn with_default_limit(mut self, limit: u32) -> Self {
        self.default_limit = limit;
        self
    }

    /// Set the domain treated as archive instrumentation.
    pub fn with_instrumentation_domain(mut self, domain: impl Into<String>) -> Self {
        self.instrumentation_domain = domain.into();
        self
    }
}
