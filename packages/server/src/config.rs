use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;
use waylook_scan::{ArchiveConfig, PolitenessDelay};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub archive: ArchiveConfig,
    /// Empty means any origin.
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut archive = ArchiveConfig::default();

        if let Some(url) = lookup("WAYBACK_CDX_URL") {
            archive = archive.with_cdx_endpoint(url);
        }
        if let Some(url) = lookup("WAYBACK_BASE_URL") {
            archive = archive.with_archive_base_url(url);
        }
        if let Some(secs) = lookup("WAYBACK_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .context("WAYBACK_TIMEOUT_SECS must be a whole number of seconds")?;
            archive = archive.with_timeout(Duration::from_secs(secs));
        }

        let min_ms = parse_millis(&lookup, "POLITENESS_MIN_MS")?;
        let max_ms = parse_millis(&lookup, "POLITENESS_MAX_MS")?;
        if min_ms.is_some() || max_ms.is_some() {
            let current = archive.politeness;
            archive = archive.with_politeness(PolitenessDelay::new(
                min_ms.unwrap_or(current.min),
                max_ms.unwrap_or(current.max),
            ));
        }

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .unwrap_or_else(|| "5001".to_string())
                .trim()
                .parse()
                .context("PORT must be a valid number")?,
            archive,
            allowed_origins: lookup("ALLOWED_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(str::trim)
                        .filter(|o| !o.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_millis(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<Duration>> {
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .with_context(|| format!("{key} must be a whole number of milliseconds"))
        })
        .transpose()
}
