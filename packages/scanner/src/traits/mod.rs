//! Seams between the orchestrator and the outside world.

pub mod directory;
pub mod fetcher;

pub use directory::{DirectoryQuery, SnapshotDirectory};
pub use fetcher::CaptureFetcher;
