//! Networking constants and small helpers for the feed connection.
use std::time::Duration;

/// Host the feed is expected on when nothing else is configured.
pub const FEED_HOST: &str = "127.0.0.1";
/// WebSocket port of the feed.
pub const FEED_PORT: u16 = 9002;
/// How long a connection attempt may stay pending before mock data takes over.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Helper to format a WebSocket endpoint like "ws://ip:port".
pub fn ws_url(host: &str, port: u16) -> String {
    format!("ws://{}:{}", host, port)
}

/// Default feed endpoint, `ws://127.0.0.1:9002`.
pub fn default_feed_url() -> String {
    ws_url(FEED_HOST, FEED_PORT)
}
