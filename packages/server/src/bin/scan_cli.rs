//! CLI for running one scan from the terminal
//!
//! Prints the event stream exactly as the HTTP endpoint would send it, one
//! `data: <json>` block per event on stdout. Logs go to stderr.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio_stream::StreamExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use waylook_scan::{encoder, PolitenessDelay, ScanEvent, ScanRequest, Scanner};
use waylook_server::Config;

#[derive(Parser)]
#[command(name = "scan_cli")]
#[command(about = "Scan a domain's archived snapshots for a keyword")]
struct Cli {
    /// Domain whose captures are scanned
    #[arg(long)]
    domain: String,

    /// Literal keyword, matched case-insensitively
    #[arg(long)]
    keyword: String,

    /// Restrict captures to one four-digit year
    #[arg(long, value_parser = parse_year)]
    year: Option<String>,

    /// Maximum number of captures to scan
    #[arg(long)]
    limit: Option<u32>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Lower bound of the pause before each capture, in milliseconds
    #[arg(long)]
    politeness_min_ms: Option<u64>,

    /// Upper bound of the pause before each capture, in milliseconds
    #[arg(long)]
    politeness_max_ms: Option<u64>,
}

fn parse_year(raw: &str) -> Result<String, String> {
    if raw.len() == 4 && raw.bytes().all(|b| b.is_ascii_digit()) {
        Ok(raw.to_string())
    } else {
        Err(format!("expected a four-digit year, got '{raw}'"))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,waylook_scan=debug,waylook_server=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    let mut archive = config.archive;
    if let Some(secs) = cli.timeout_secs {
        archive = archive.with_timeout(Duration::from_secs(secs));
    }
    if cli.politeness_min_ms.is_some() || cli.politeness_max_ms.is_some() {
        let current = archive.politeness;
        archive = archive.with_politeness(PolitenessDelay::new(
            cli.politeness_min_ms
                .map(Duration::from_millis)
                .unwrap_or(current.min),
            cli.politeness_max_ms
                .map(Duration::from_millis)
                .unwrap_or(current.max),
        ));
    }

    let mut request = ScanRequest::new(cli.domain, cli.keyword)
        .with_limit(cli.limit.filter(|l| *l > 0).unwrap_or(archive.default_limit));
    if let Some(year) = cli.year {
        request = request.with_year(year);
    }
    request
        .validate()
        .context("Domain and keyword must not be blank")?;

    let scanner = Arc::new(Scanner::from_config(archive).context("Failed to build archive client")?);
    let mut events = scanner.stream(request);

    let mut stdout = std::io::stdout().lock();
    let mut failure = None;
    while let Some(event) = events.next().await {
        stdout
            .write_all(encoder::encode(&event).as_bytes())
            .context("Failed to write event")?;
        stdout.flush().context("Failed to flush stdout")?;

        if let ScanEvent::Error { error } = event {
            failure = Some(error);
        }
    }

    if let Some(error) = failure {
        bail!("Scan failed: {error}");
    }

    Ok(())
}
