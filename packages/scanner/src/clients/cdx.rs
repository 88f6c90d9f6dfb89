//! CDX index client.
//!
//! Queries `cdx/search/cdx` for successful captures of a domain. The JSON
//! output is a list of rows whose first row is the field header.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{DirectoryError, DirectoryResult, ScanResult};
use crate::traits::directory::{DirectoryQuery, SnapshotDirectory};
use crate::types::{ArchiveConfig, Capture};

/// Snapshot directory backed by the Wayback Machine CDX API.
pub struct CdxDirectory {
    client: reqwest::Client,
    endpoint: String,
}

impl CdxDirectory {
    /// Create a directory client from the archive config.
    pub fn new(config: &ArchiveConfig) -> ScanResult<Self> {
        Ok(Self {
            client: super::build_http_client(config)?,
            endpoint: config.cdx_endpoint.clone(),
        })
    }

    /// Reuse an existing HTTP client.
    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Run the query, surfacing every failure.
    pub async fn try_list_captures(&self, query: &DirectoryQuery) -> DirectoryResult<Vec<Capture>> {
        debug!(domain = %query.domain, year = ?query.year, limit = query.limit, "Querying CDX index");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&cdx_params(query))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let value: Value =
            serde_json::from_str(&body).map_err(|e| DirectoryError::Payload(e.to_string()))?;

        parse_cdx_rows(&value)
    }
}

#[async_trait]
impl SnapshotDirectory for CdxDirectory {
    async fn list_captures(&self, query: &DirectoryQuery) -> Vec<Capture> {
        match self.try_list_captures(query).await {
            Ok(captures) => {
                info!(domain = %query.domain, captures = captures.len(), "CDX query completed");
                captures
            }
            Err(e) => {
                warn!(domain = %query.domain, error = %e, "CDX query failed, treating as no results");
                Vec::new()
            }
        }
    }

    fn name(&self) -> &str {
        "cdx"
    }
}

/// Query string for a directory query.
pub fn cdx_params(query: &DirectoryQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("url", query.domain.clone()),
        ("output", "json".to_string()),
        ("fl", "timestamp,original".to_string()),
        ("filter", "statuscode:200".to_string()),
        ("limit", query.limit.to_string()),
    ];

    if let Some((from, to)) = query.date_range() {
        params.push(("from", from));
        params.push(("to", to));
    }

    params
}

/// Convert CDX JSON rows into captures.
///
/// The payload must be a list. A list without data rows (empty, or header
/// only) yields no captures. Rows that are too short, non-string, or have
/// empty fields are dropped.
pub fn parse_cdx_rows(value: &Value) -> DirectoryResult<Vec<Capture>> {
    let rows = value
        .as_array()
        .ok_or_else(|| DirectoryError::Payload("expected a JSON array of rows".to_string()))?;

    if rows.len() < 2 {
        return Ok(Vec::new());
    }

    let captures = rows
        .iter()
        .skip(1)
        .filter_map(|row| {
            let fields = row.as_array()?;
            let timestamp = fields.first()?.as_str()?;
            let original = fields.get(1)?.as_str()?;
            Some(Capture::new(timestamp, original))
        })
        .filter(Capture::is_valid)
        .collect();

    Ok(captures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_header_only_is_empty() {
        let value = json!([["timestamp", "original"]]);
        assert!(parse_cdx_rows(&value).unwrap().is_empty());
        assert!(parse_cdx_rows(&json!([])).unwrap().is_empty());
    }

    #[test]
    fn test_rows_after_header() {
        let value = json!([
            ["timestamp", "original"],
            ["20200101000000", "http://example.com/"],
            ["20210101000000", "http://example.com/login", "extra"]
        ]);
        let captures = parse_cdx_rows(&value).unwrap();
        assert_eq!(
            captures,
            vec![
                Capture::new("20200101000000", "http://example.com/"),
                Capture::new("20210101000000", "http://example.com/login"),
            ]
        );
    }

    #[test]
    fn test_malformed_rows_dropped() {
        let value = json!([
            ["timestamp", "original"],
            ["20200101000000"],
            [20200101000000u64, "http://example.com/"],
            ["", "http://example.com/"],
            "not a row",
            ["20220101000000", "http://example.com/ok"]
        ]);
        let captures = parse_cdx_rows(&value).unwrap();
        assert_eq!(
            captures,
            vec![Capture::new("20220101000000", "http://example.com/ok")]
        );
    }

    #[test]
    fn test_non_list_payload_is_error() {
        let err = parse_cdx_rows(&json!({"error": "nope"})).unwrap_err();
        assert!(matches!(err, DirectoryError::Payload(_)));
    }

    #[test]
    fn test_params_without_year() {
        let params = cdx_params(&DirectoryQuery::new("example.com", 100));
        assert_eq!(
            params,
            vec![
                ("url", "example.com".to_string()),
                ("output", "json".to_string()),
                ("fl", "timestamp,original".to_string()),
                ("filter", "statuscode:200".to_string()),
                ("limit", "100".to_string()),
            ]
        );
    }

    #[test]
    fn test_params_with_year() {
        let params = cdx_params(&DirectoryQuery::new("example.com", 5).with_year("2015"));
        assert!(params.contains(&("from", "20150101".to_string())));
        assert!(params.contains(&("to", "20151231".to_string())));
        assert!(params.contains(&("limit", "5".to_string())));
    }

    #[tokio::test]
    async fn test_unreachable_index_yields_empty() {
        let config = ArchiveConfig::new()
            .with_cdx_endpoint("http://127.0.0.1:9/cdx/search/cdx")
            .with_timeout(std::time::Duration::from_secs(2));
        let directory = CdxDirectory::new(&config).unwrap();

        let captures = directory
            .list_captures(&DirectoryQuery::new("example.com", 10))
            .await;
        assert!(captures.is_empty());
    }
}
