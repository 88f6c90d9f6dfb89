//! Events emitted by a scan, in stream order.

use serde::{Deserialize, Serialize};

use super::scan_match::Match;

/// Unit of the scan output stream.
///
/// Zero or more `Progress`/`Match` events are followed by exactly one
/// terminal `Complete` or `Error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ScanEvent {
    Progress {
        message: String,
        #[serde(
            rename = "currentSnapshot",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        current_snapshot: Option<usize>,
        #[serde(
            rename = "totalSnapshots",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        total_snapshots: Option<usize>,
    },
    Match {
        #[serde(rename = "match")]
        scan_match: Match,
    },
    Complete {
        message: String,
    },
    Error {
        error: String,
    },
}

impl ScanEvent {
    /// Status message without counters.
    pub fn progress(message: impl Into<String>) -> Self {
        ScanEvent::Progress {
            message: message.into(),
            current_snapshot: None,
            total_snapshots: None,
        }
    }

    /// Status message with `current`/`total` counters.
    pub fn progress_at(message: impl Into<String>, current: usize, total: usize) -> Self {
        ScanEvent::Progress {
            message: message.into(),
            current_snapshot: Some(current),
            total_snapshots: Some(total),
        }
    }

    pub fn found(scan_match: Match) -> Self {
        ScanEvent::Match { scan_match }
    }

    pub fn complete(message: impl Into<String>) -> Self {
        ScanEvent::Complete {
            message: message.into(),
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        ScanEvent::Error {
            error: error.into(),
        }
    }

    /// `complete` and `error` end the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ScanEvent::Complete { .. } | ScanEvent::Error { .. })
    }

    /// Wire name of the variant (`progress`, `match`, `complete`, `error`).
    pub fn kind(&self) -> &'static str {
        match self {
            ScanEvent::Progress { .. } => "progress",
            ScanEvent::Match { .. } => "match",
            ScanEvent::Complete { .. } => "complete",
            ScanEvent::Error { .. } => "error",
        }
    }
}
