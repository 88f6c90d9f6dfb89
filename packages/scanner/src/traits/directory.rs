//! Snapshot directory trait.
//!
//! A directory answers "which captures exist for this domain?". Discovery
//! failures never surface as errors here: an unreachable or confused index is
//! indistinguishable from an empty one as far as the orchestrator is concerned.

use async_trait::async_trait;

use crate::types::Capture;

/// Parameters of one directory query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryQuery {
    /// Target domain or URL prefix.
    pub domain: String,

    /// Restrict captures to one calendar year (`YYYY`).
    pub year: Option<String>,

    /// Maximum number of captures returned.
    pub limit: u32,
}

impl DirectoryQuery {
    pub fn new(domain: impl Into<String>, limit: u32) -> Self {
        Self {
            domain: domain.into(),
            year: None,
            limit,
        }
    }

    /// Restrict to a year.
    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }

    /// `(from, to)` date bounds for the year filter, if any.
    pub fn date_range(&self) -> Option<(String, String)> {
        self.year
            .as_ref()
            .map(|year| (format!("{year}0101"), format!("{year}1231")))
    }
}

/// Lists captures for a domain.
#[async_trait]
pub trait SnapshotDirectory: Send + Sync {
    /// Captures in index order. Empty on no results or any failure.
    async fn list_captures(&self, query: &DirectoryQuery) -> Vec<Capture>;

    /// Name for logging.
    fn name(&self) -> &str;
}
