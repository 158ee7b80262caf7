//! Command-line arguments for the tracker client.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use std::num::NonZeroUsize;

use clap::Parser;
use tracker_common::net::{CONNECT_TIMEOUT, default_feed_url};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// WebSocket endpoint of the price feed.
    #[clap(long, default_value_t = default_feed_url())]
    pub url: String,

    /// Seconds to wait for the feed handshake before switching to mock data.
    #[clap(long, default_value_t = CONNECT_TIMEOUT.as_secs())]
    pub connect_timeout_secs: u64,

    /// Keep only the most recent N samples per ticker (default: keep everything).
    #[clap(long)]
    pub max_history: Option<NonZeroUsize>,

    /// Path to a text file with `TICKER PRICE` lines used to seed mock data.
    #[clap(long)]
    pub seeds: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_feed_constants() {
        let args = Args::parse_from(["tracker_client"]);
        assert_eq!(args.url, "ws://127.0.0.1:9002");
        assert_eq!(args.connect_timeout_secs, 3);
        assert!(args.max_history.is_none());
        assert!(args.seeds.is_none());
    }

    #[test]
    fn zero_history_is_rejected() {
        assert!(Args::try_parse_from(["tracker_client", "--max-history", "0"]).is_err());
        let args = Args::try_parse_from(["tracker_client", "--max-history", "500"]).unwrap();
        assert_eq!(args.max_history.map(NonZeroUsize::get), Some(500));
    }
}
