//! Wayback keyword scanner.
//!
//! Lists the archived captures of a domain, downloads each one in turn and
//! searches it for a keyword in three zones: visible body text, inline
//! script bodies and HTML comments. Matches stream out as they are found.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tokio_stream::StreamExt;
//! use waylook_scan::{ArchiveConfig, ScanRequest, Scanner};
//!
//! let scanner = Arc::new(Scanner::from_config(ArchiveConfig::default())?);
//! let mut events = scanner.stream(ScanRequest::new("example.com", "login").with_year("2015"));
//! while let Some(event) = events.next().await {
//!     print!("{}", waylook_scan::encoder::encode(&event));
//! }
//! ```
//!
//! # Modules
//!
//! - [`snippet`] - literal case-insensitive search and context snippets
//! - [`zones`] - per-zone scanning of one capture
//! - [`traits`] - directory and fetcher seams
//! - [`clients`] - CDX directory, HTTP fetcher, mocks
//! - [`orchestrator`] - the sequential scan pipeline
//! - [`encoder`] - server-sent-events framing
//! - [`types`] - captures, matches, events, config

pub mod clients;
pub mod encoder;
pub mod error;
pub mod orchestrator;
pub mod snippet;
pub mod traits;
pub mod types;
pub mod zones;

pub use clients::{CdxDirectory, HttpCaptureFetcher, MockDirectory, MockFetcher};
pub use error::{DirectoryError, FetchError, ScanError};
pub use orchestrator::{CaptureOutcome, ScanPhase, ScanRequest, ScanSummary, Scanner};
pub use snippet::{extract_snippets, find_occurrences};
pub use traits::{CaptureFetcher, DirectoryQuery, SnapshotDirectory};
pub use types::{ArchiveConfig, Capture, Match, MatchType, PolitenessDelay, ScanEvent};
pub use zones::ZoneScanner;
