//! Scan data types.

pub mod capture;
pub mod config;
pub mod event;
pub mod scan_match;

pub use capture::Capture;
pub use config::{ArchiveConfig, PolitenessDelay};
pub use event::ScanEvent;
pub use scan_match::{Match, MatchType};
