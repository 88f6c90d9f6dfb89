//! Event stream encoder.
//!
//! Frames each [`ScanEvent`] as a server-sent-events block: `data: <json>\n\n`.
//! JSON from `serde_json` never contains raw newlines, so one `data:` line
//! always carries the whole payload.

use crate::types::ScanEvent;

/// JSON payload for an event.
pub fn payload(event: &ScanEvent) -> String {
    serde_json::to_string(event).unwrap_or_else(|e| {
        // Unreachable for the event shapes defined here.
        serde_json::json!({ "type": "error", "error": format!("event encoding failed: {e}") })
            .to_string()
    })
}

/// Full wire fragment for an event.
pub fn encode(event: &ScanEvent) -> String {
    format!("data: {}\n\n", payload(event))
}
