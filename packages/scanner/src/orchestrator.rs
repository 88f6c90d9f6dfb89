//! Scan orchestrator.
//!
//! Drives one scan end to end: a single directory query, then a strictly
//! sequential walk over the captures (pause, fetch, zone scan, emit). Events
//! go out through a bounded channel of capacity one, so the producer never
//! runs ahead of the consumer, and a dropped receiver stops the walk at the
//! next await point.
//!
//! ```text
//! Starting -> Discovering -> Scanning -> Done
//!     \            \             \
//!      +------------+-------------+--> Failed (single `error` event)
//! ```

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::clients::{build_http_client, CdxDirectory, HttpCaptureFetcher};
use crate::error::{FetchError, ScanError, ScanResult};
use crate::traits::{CaptureFetcher, DirectoryQuery, SnapshotDirectory};
use crate::types::{ArchiveConfig, Capture, Match, ScanEvent};
use crate::zones::ZoneScanner;

/// What to scan for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    pub domain: String,
    pub keyword: String,
    pub year: Option<String>,
    pub limit: u32,
}

impl ScanRequest {
    pub fn new(domain: impl Into<String>, keyword: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            keyword: keyword.into(),
            year: None,
            limit: crate::types::config::DEFAULT_LIMIT,
        }
    }

    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Domain and keyword must both be present.
    pub fn validate(&self) -> ScanResult<()> {
        if self.domain.trim().is_empty() {
            return Err(ScanError::MissingParameter("domain"));
        }
        if self.keyword.trim().is_empty() {
            return Err(ScanError::MissingParameter("keyword"));
        }
        Ok(())
    }

    fn directory_query(&self) -> DirectoryQuery {
        DirectoryQuery {
            domain: self.domain.clone(),
            year: self.year.clone(),
            limit: self.limit,
        }
    }
}

/// Lifecycle of one scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    Starting,
    Discovering,
    Scanning,
    Done,
    Failed,
}

/// Result of processing one capture. Skips are expected and never end a scan.
#[derive(Debug)]
pub enum CaptureOutcome {
    Scanned { matches: Vec<Match> },
    Skipped { reason: FetchError },
}

/// Counters reported once a scan stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSummary {
    pub phase: ScanPhase,
    pub total_captures: usize,
    pub scanned: usize,
    pub skipped: usize,
    pub matches: usize,
    /// The consumer went away before the terminal event.
    pub cancelled: bool,
}

impl ScanSummary {
    fn new() -> Self {
        Self {
            phase: ScanPhase::Starting,
            total_captures: 0,
            scanned: 0,
            skipped: 0,
            matches: 0,
            cancelled: false,
        }
    }

    fn cancelled(mut self) -> Self {
        self.cancelled = true;
        self
    }
}

/// The scan pipeline, shareable across requests.
pub struct Scanner {
    directory: Arc<dyn SnapshotDirectory>,
    fetcher: Arc<dyn CaptureFetcher>,
    zones: ZoneScanner,
    config: ArchiveConfig,
}

impl Scanner {
    pub fn new(
        directory: Arc<dyn SnapshotDirectory>,
        fetcher: Arc<dyn CaptureFetcher>,
        config: ArchiveConfig,
    ) -> Self {
        Self {
            directory,
            fetcher,
            zones: ZoneScanner::new(config.instrumentation_domain.clone()),
            config,
        }
    }

    /// Production wiring: CDX directory and HTTP fetcher sharing one client.
    pub fn from_config(config: ArchiveConfig) -> ScanResult<Self> {
        let client = build_http_client(&config)?;
        let directory = CdxDirectory::with_client(client.clone(), config.cdx_endpoint.clone());
        let fetcher = HttpCaptureFetcher::with_client(client);
        Ok(Self::new(Arc::new(directory), Arc::new(fetcher), config))
    }

    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    /// Start a scan on the runtime and return its event stream.
    ///
    /// The stream always ends with one terminal event unless the consumer
    /// drops it first. Pipeline faults, including a panicking scan task, are
    /// turned into that terminal `error` event here.
    pub fn stream(self: Arc<Self>, request: ScanRequest) -> ReceiverStream<ScanEvent> {
        let (tx, rx) = mpsc::channel(1);
        let scan_id = Uuid::new_v4();
        let span = info_span!(
            "scan",
            %scan_id,
            domain = %request.domain,
            keyword = %request.keyword
        );

        tokio::spawn(
            async move {
                let producer_tx = tx.clone();
                let producer =
                    tokio::spawn(async move { self.run(&request, &producer_tx).await }.in_current_span());

                let failure = match producer.await {
                    Ok(Ok(summary)) => {
                        info!(
                            phase = ?summary.phase,
                            captures = summary.total_captures,
                            scanned = summary.scanned,
                            skipped = summary.skipped,
                            matches = summary.matches,
                            cancelled = summary.cancelled,
                            "Scan finished"
                        );
                        None
                    }
                    Ok(Err(e)) => Some(e),
                    Err(join_err) => Some(ScanError::Task(join_err.to_string())),
                };

                if let Some(e) = failure {
                    error!(phase = ?ScanPhase::Failed, error = %e, "Scan failed");
                    let _ = tx.send(ScanEvent::error(e.to_string())).await;
                }
            }
            .instrument(span),
        );

        ReceiverStream::new(rx)
    }

    /// Run the state machine, emitting into `events`.
    ///
    /// Returns `Err` for pipeline faults; the caller owns turning that into
    /// the terminal `error` event. A closed channel ends the run early with
    /// `cancelled` set.
    pub async fn run(
        &self,
        request: &ScanRequest,
        events: &mpsc::Sender<ScanEvent>,
    ) -> ScanResult<ScanSummary> {
        let mut summary = ScanSummary::new();
        request.validate()?;

        summary.phase = ScanPhase::Discovering;
        debug!(phase = ?summary.phase, "Scan phase");
        if !emit(
            events,
            ScanEvent::progress(format!(
                "Contacting Wayback Machine for: {}...",
                request.domain
            )),
        )
        .await
        {
            return Ok(summary.cancelled());
        }

        let query = request.directory_query();
        let captures = tokio::select! {
            captures = self.directory.list_captures(&query) => captures,
            _ = events.closed() => return Ok(summary.cancelled()),
        };

        if captures.is_empty() {
            summary.phase = ScanPhase::Done;
            info!(directory = self.directory.name(), "No snapshots found");
            emit(
                events,
                ScanEvent::complete("No snapshots found for this criteria."),
            )
            .await;
            return Ok(summary);
        }

        let total = captures.len();
        summary.total_captures = total;
        summary.phase = ScanPhase::Scanning;
        debug!(phase = ?summary.phase, total, "Scan phase");
        if !emit(
            events,
            ScanEvent::progress_at(
                format!("Analyzing {} snapshots for '{}'...", total, request.keyword),
                0,
                total,
            ),
        )
        .await
        {
            return Ok(summary.cancelled());
        }

        for (index, capture) in captures.iter().enumerate() {
            if !emit(
                events,
                ScanEvent::progress_at(
                    format!("Scanning snapshot: {}...", capture.timestamp),
                    index + 1,
                    total,
                ),
            )
            .await
            {
                return Ok(summary.cancelled());
            }

            let outcome = tokio::select! {
                biased;
                _ = events.closed() => return Ok(summary.cancelled()),
                outcome = self.process_capture(capture, &request.keyword) => outcome?,
            };

            match outcome {
                CaptureOutcome::Scanned { matches } => {
                    summary.scanned += 1;
                    for found in matches {
                        if !emit(events, ScanEvent::found(found)).await {
                            return Ok(summary.cancelled());
                        }
                        summary.matches += 1;
                    }
                }
                CaptureOutcome::Skipped { reason } => {
                    summary.skipped += 1;
                    warn!(
                        timestamp = %capture.timestamp,
                        original = %capture.original_url,
                        error = %reason,
                        "Skipping capture"
                    );
                }
            }
        }

        summary.phase = ScanPhase::Done;
        let message = if summary.matches > 0 {
            "Scan complete."
        } else {
            "Scan finished. No matches found."
        };
        if !emit(events, ScanEvent::complete(message)).await {
            return Ok(summary.cancelled());
        }

        Ok(summary)
    }

    /// Pause, fetch and scan one capture.
    ///
    /// Fetch failures become `Skipped`. Only a capture that cannot even be
    /// addressed is a pipeline fault.
    pub async fn process_capture(
        &self,
        capture: &Capture,
        keyword: &str,
    ) -> ScanResult<CaptureOutcome> {
        let archive_url = capture.archive_url(&self.config.archive_base_url)?;

        if !self.config.politeness.is_zero() {
            tokio::time::sleep(self.config.politeness.sample()).await;
        }

        let html = match self.fetcher.fetch(&archive_url).await {
            Ok(html) => html,
            Err(reason) => return Ok(CaptureOutcome::Skipped { reason }),
        };

        let zones = self.zones.clone();
        let keyword = keyword.to_string();
        let timestamp = capture.timestamp.clone();
        let url = archive_url.clone();
        let matches = match tokio::task::spawn_blocking(move || {
            zones.scan(&html, &keyword, &timestamp, &url)
        })
        .await
        {
            Ok(matches) => matches,
            Err(e) => {
                warn!(url = %archive_url, error = %e, "Capture could not be parsed, no matches");
                Vec::new()
            }
        };

        debug!(url = %archive_url, matches = matches.len(), "Capture scanned");
        Ok(CaptureOutcome::Scanned { matches })
    }
}

/// Send one event. `false` once the consumer has gone away.
async fn emit(events: &mpsc::Sender<ScanEvent>, event: ScanEvent) -> bool {
    let kind = event.kind();
    match events.send(event).await {
        Ok(()) => true,
        Err(_) => {
            info!(event = kind, "Event consumer disconnected, stopping scan");
            false
        }
    }
}
