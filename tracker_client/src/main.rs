//! Tracker Client — connects to a WebSocket price feed and keeps, per ticker, the
//! price history and its 20-point moving average, logging every update.
//!
//! If the feed does not complete its handshake within the connect timeout, or the
//! transport fails, the client switches to locally generated mock data so there
//! is always something to show. The current status is logged on every change.
//!
//! Usage example (CLI):
//! ```bash
//! tracker_client --url ws://127.0.0.1:9002 --max-history 500 --seeds ./seeds.txt
//! ```
//!
//! The seeds file holds one `TICKER PRICE` pair per line. See `tracker_common::seeds`.
#![warn(missing_docs)]
mod args;
mod feed;
mod render;

use crate::args::Args;
use crate::feed::FeedClient;
use clap::Parser;
use crossbeam_channel::unbounded;
use log::info;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Duration;
use tracker_common::driver::SessionDriver;
use tracker_common::generator::SyntheticGenerator;
use tracker_common::moving_average::HistoryLimit;
use tracker_common::seeds::{SeedParser, SeedTicker, default_seeds};
use tracker_common::{FeedEvent, Result, TrackerError, TrackerSession};

fn main() -> Result<(), TrackerError> {
    init_logger();
    let args = Args::parse();

    let seeds = match &args.seeds {
        Some(raw) => load_seeds(&normalize_path(raw))?,
        None => default_seeds(),
    };
    info!(
        "Mock seeds: {:?}",
        seeds.iter().map(|s| s.ticker.as_str()).collect::<Vec<_>>()
    );

    let (shutdown_tx, shutdown_rx) = unbounded::<()>();
    ctrlc::set_handler(move || {
        info!("Ctrl+C received. Shutting down client...");
        let _ = shutdown_tx.send(());
    })
    .map_err(|e| TrackerError::Format(format!("Failed to set Ctrl+C handler: {}", e)))?;

    let (events_tx, events_rx) = unbounded::<FeedEvent>();
    let feed = FeedClient::new(args.url.trim()).spawn(events_tx)?;

    let session = TrackerSession::new(
        SyntheticGenerator::new(seeds),
        HistoryLimit::from_option(args.max_history),
    );
    info!("STATUS: {}", render::status_line(session.status()));
    let driver = SessionDriver::new(
        session,
        move || feed.terminate(),
        Duration::from_secs(args.connect_timeout_secs),
    );

    info!("Client is running. Press Ctrl+C to exit.");
    let session = driver.run(events_rx, shutdown_rx, render::render);
    info!(
        "Session ended in state {} with {} tickers",
        session.status(),
        session.series().len()
    );
    Ok(())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

fn load_seeds(path: &PathBuf) -> Result<Vec<SeedTicker>> {
    let file = File::open(path)?;
    let seeds = SeedTicker::parse_from_file(BufReader::new(file))?;
    if seeds.is_empty() {
        return Err(TrackerError::ParseSeedsFile(format!(
            "{} has no seed tickers",
            path.display()
        )));
    }
    Ok(seeds)
}

/// Normalize a CLI-provided path string by trimming whitespace and matching quotes.
///
/// This allows passing Windows paths in quotes without breaking parsing.
fn normalize_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    let no_quotes = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    PathBuf::from(no_quotes)
}
