// WayLook HTTP service: SSE scan endpoint over the waylook-scan pipeline
pub mod config;
pub mod server;

pub use config::Config;
