//! SSE scan endpoint.
//!
//! GET /api/scan?domain=&keyword=&year=&limit=
//!
//! Validates the query synchronously, then streams the scan's events, one
//! `data: <json>` block each. Dropping the connection stops the scan.

use std::convert::Infallible;

use axum::{
    extract::{Extension, Query},
    http::{header::CACHE_CONTROL, HeaderName},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
};
use serde::Deserialize;
use tokio_stream::StreamExt;
use waylook_scan::{encoder, ScanRequest};

use crate::server::app::AppState;
use crate::server::error::ApiError;

const X_ACCEL_BUFFERING: HeaderName = HeaderName::from_static("x-accel-buffering");

/// Raw query parameters. Everything is optional here so that validation
/// produces our own error body instead of a framework rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ScanQuery {
    pub domain: Option<String>,
    pub keyword: Option<String>,
    pub year: Option<String>,
    pub limit: Option<String>,
}

impl ScanQuery {
    /// Validate into a scan request.
    ///
    /// A blank `year` counts as absent. An unparseable or zero `limit` falls
    /// back to `default_limit`.
    pub fn into_request(self, default_limit: u32) -> Result<ScanRequest, ApiError> {
        let request = ScanRequest::new(
            self.domain.unwrap_or_default(),
            self.keyword.unwrap_or_default(),
        );
        if request.validate().is_err() {
            return Err(ApiError::MissingParameters);
        }

        let limit = self
            .limit
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|limit| *limit > 0)
            .unwrap_or(default_limit);
        let request = request.with_limit(limit);

        match self.year.map(|y| y.trim().to_string()) {
            None => Ok(request),
            Some(year) if year.is_empty() => Ok(request),
            Some(year) if year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()) => {
                Ok(request.with_year(year))
            }
            Some(year) => Err(ApiError::InvalidYear(year)),
        }
    }
}

/// SSE scan handler.
pub async fn scan_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<ScanQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let request = query.into_request(state.scanner.config().default_limit)?;

    tracing::info!(
        domain = %request.domain,
        keyword = %request.keyword,
        year = ?request.year,
        limit = request.limit,
        "Scan requested"
    );

    let events = state
        .scanner
        .clone()
        .stream(request)
        .map(|event| Ok::<_, Infallible>(Event::default().data(encoder::payload(&event))));

    Ok((
        [(CACHE_CONTROL, "no-cache"), (X_ACCEL_BUFFERING, "no")],
        Sse::new(events).keep_alive(KeepAlive::default()),
    ))
}
