//! Keyword matches found inside a capture.

use serde::{Deserialize, Serialize};

/// Document zone a match was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatchType {
    /// Visible body text
    Text,
    /// Inline script body
    Js,
    /// HTML comment
    Comment,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Text => "TEXT",
            MatchType::Js => "JS",
            MatchType::Comment => "COMMENT",
        }
    }
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One keyword occurrence inside one capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    /// Timestamp of the owning capture.
    pub timestamp: String,

    /// URL the capture can be re-viewed at.
    pub archive_url: String,

    /// Zone the occurrence was found in.
    pub match_type: MatchType,

    /// `...<context>...`, keyword plus up to 30 characters either side.
    pub snippet: String,
}

impl Match {
    pub fn new(
        timestamp: impl Into<String>,
        archive_url: impl Into<String>,
        match_type: MatchType,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            archive_url: archive_url.into(),
            match_type,
            snippet: snippet.into(),
        }
    }
}
