//! Feed session state machine.
//!
//! A session starts in `Connecting` and settles in exactly one of `Connected`,
//! `Mock` or `Error`:
//!
//! - `FeedEvent::Connected` while connecting moves to `Connected`.
//! - `FeedEvent::TimeoutElapsed` while connecting moves to `Mock` and fills the
//!   session with synthetic series. A timeout in any other state is stale and
//!   ignored.
//! - `FeedEvent::TransportError` moves to `Error` from any state and fills the
//!   session with synthetic series, replacing live ones.
//! - `FeedEvent::Message` is applied only while `Connected`.
//!
//! Synthetic data is generated at most once per session: an error arriving
//! after the mock fallback changes the status but keeps the existing series.
//!
//! `TrackerSession::handle` is the only way to mutate a session; renderers get
//! read-only access through `status`, `series`, `get` and `snapshot`.

use std::collections::HashMap;

use log::{debug, error, info, warn};
use strum_macros::Display;

use crate::generator::SyntheticGenerator;
use crate::message::FeedMessage;
use crate::moving_average::HistoryLimit;
use crate::result::Result;
use crate::seeds::default_seeds;
use crate::series::SymbolSeries;

/// Where the data on display comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ConnectionStatus {
    /// Waiting for the feed handshake.
    Connecting,
    /// Live feed.
    Connected,
    /// No handshake in time, synthetic data.
    Mock,
    /// Transport failure, synthetic data.
    Error,
}

/// Everything the transport and the timer can tell the session.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// Handshake with the feed succeeded.
    Connected,
    /// One raw text frame from the feed.
    Message(String),
    /// The transport failed; carries a description.
    TransportError(String),
    /// The bounded connect wait ran out.
    TimeoutElapsed,
}

/// Outcome of handling one `FeedEvent`.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionUpdate {
    /// Status moved; `synthetic` is set when this transition generated mock data.
    StatusChanged {
        /// Previous status.
        from: ConnectionStatus,
        /// New status.
        to: ConnectionStatus,
        /// Whether synthetic series were generated by this transition.
        synthetic: bool,
    },
    /// A sample was appended to the series of `ticker`.
    SampleAppended {
        /// Ticker that received the sample.
        ticker: String,
    },
    /// A feed message was dropped without touching the session.
    Discarded {
        /// Why the message was dropped.
        reason: String,
    },
    /// The event had no effect in the current state.
    Ignored,
}

/// Owned copy of a session for consumers that outlive the borrow.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    /// Current status.
    pub status: ConnectionStatus,
    /// Series in first-observation order.
    pub series: Vec<SymbolSeries>,
}

/// All tracked series plus the connection status.
#[derive(Debug)]
pub struct TrackerSession {
    status: ConnectionStatus,
    series: Vec<SymbolSeries>,
    index: HashMap<String, usize>,
    generator: SyntheticGenerator,
    limit: HistoryLimit,
    synthetic_generations: usize,
}

impl Default for TrackerSession {
    fn default() -> Self {
        Self::new(SyntheticGenerator::new(default_seeds()), HistoryLimit::Unbounded)
    }
}

impl TrackerSession {
    /// Creates a session in `Connecting` with no series.
    pub fn new(generator: SyntheticGenerator, limit: HistoryLimit) -> Self {
        Self {
            status: ConnectionStatus::Connecting,
            series: Vec::new(),
            index: HashMap::new(),
            generator,
            limit,
            synthetic_generations: 0,
        }
    }

    /// Current status.
    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    /// All series in first-observation order.
    pub fn series(&self) -> &[SymbolSeries] {
        &self.series
    }

    /// Series for `ticker`, if it has been observed.
    pub fn get(&self, ticker: &str) -> Option<&SymbolSeries> {
        self.index.get(ticker).map(|&i| &self.series[i])
    }

    /// How many times synthetic data has been generated (0 or 1).
    pub fn synthetic_generations(&self) -> usize {
        self.synthetic_generations
    }

    /// Owned copy of the current state.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status,
            series: self.series.clone(),
        }
    }

    /// Apply one event. Never fails: bad messages are logged and discarded.
    pub fn handle(&mut self, event: FeedEvent) -> SessionUpdate {
        match event {
            FeedEvent::Connected => self.on_connected(),
            FeedEvent::TimeoutElapsed => self.on_timeout(),
            FeedEvent::TransportError(reason) => self.on_transport_error(&reason),
            FeedEvent::Message(text) => self.on_message(&text),
        }
    }

    fn on_connected(&mut self) -> SessionUpdate {
        if self.status != ConnectionStatus::Connecting {
            debug!("Handshake reported in state {}; ignored", self.status);
            return SessionUpdate::Ignored;
        }
        info!("Connected to feed");
        self.transition(ConnectionStatus::Connected, false)
    }

    fn on_timeout(&mut self) -> SessionUpdate {
        if self.status != ConnectionStatus::Connecting {
            debug!("Stale connect timeout in state {}", self.status);
            return SessionUpdate::Ignored;
        }
        warn!("Feed connection timeout, using mock data");
        let synthetic = self.fill_synthetic();
        self.transition(ConnectionStatus::Mock, synthetic)
    }

    fn on_transport_error(&mut self, reason: &str) -> SessionUpdate {
        error!("Feed transport error: {}", reason);
        if self.status == ConnectionStatus::Error {
            return SessionUpdate::Ignored;
        }
        let synthetic = self.fill_synthetic();
        self.transition(ConnectionStatus::Error, synthetic)
    }

    fn on_message(&mut self, text: &str) -> SessionUpdate {
        if self.status != ConnectionStatus::Connected {
            debug!("Message in state {} dropped", self.status);
            return SessionUpdate::Discarded {
                reason: format!("not connected ({})", self.status),
            };
        }
        match FeedMessage::parse(text).and_then(|msg| self.apply(msg)) {
            Ok(ticker) => SessionUpdate::SampleAppended { ticker },
            Err(e) => {
                warn!("Discarding feed message {:?}: {}", text, e);
                SessionUpdate::Discarded {
                    reason: e.to_string(),
                }
            }
        }
    }

    fn transition(&mut self, to: ConnectionStatus, synthetic: bool) -> SessionUpdate {
        let from = self.status;
        self.status = to;
        SessionUpdate::StatusChanged {
            from,
            to,
            synthetic,
        }
    }

    fn apply(&mut self, msg: FeedMessage) -> Result<String> {
        let timestamp = msg.epoch_seconds();
        match self.index.get(&msg.ticker) {
            Some(&i) => self.series[i].observe(msg.price, timestamp, self.limit)?,
            None => {
                let series = SymbolSeries::first_observation(&msg.ticker, msg.price, timestamp)?;
                debug!("New ticker {}", msg.ticker);
                self.index.insert(msg.ticker.clone(), self.series.len());
                self.series.push(series);
            }
        }
        Ok(msg.ticker)
    }

    /// Replace all series with synthetic ones unless that already happened.
    fn fill_synthetic(&mut self) -> bool {
        if self.synthetic_generations > 0 {
            debug!("Synthetic data already present; not regenerating");
            return false;
        }
        match self.generator.generate() {
            Ok(series) => {
                self.index = series
                    .iter()
                    .enumerate()
                    .map(|(i, s)| (s.ticker.clone(), i))
                    .collect();
                self.series = series;
                self.synthetic_generations += 1;
                true
            }
            Err(e) => {
                error!("Synthetic data generation failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::SAMPLE_COUNT;
    use std::num::NonZeroUsize;

    fn msg(ticker: &str, price: f64, ts: i64) -> FeedEvent {
        FeedEvent::Message(format!(
            r#"{{"ticker":"{}","price":{},"timestamp":{}}}"#,
            ticker, price, ts
        ))
    }

    fn connected() -> TrackerSession {
        let mut session = TrackerSession::default();
        session.handle(FeedEvent::Connected);
        session
    }

    #[test]
    fn starts_connecting_and_empty() {
        let session = TrackerSession::default();
        assert_eq!(session.status(), ConnectionStatus::Connecting);
        assert!(session.series().is_empty());
        assert_eq!(session.status().to_string(), "connecting");
    }

    #[test]
    fn handshake_connects_without_synthetic_data() {
        let mut session = TrackerSession::default();
        let update = session.handle(FeedEvent::Connected);
        assert_eq!(
            update,
            SessionUpdate::StatusChanged {
                from: ConnectionStatus::Connecting,
                to: ConnectionStatus::Connected,
                synthetic: false,
            }
        );
        assert_eq!(session.handle(FeedEvent::TimeoutElapsed), SessionUpdate::Ignored);
        assert_eq!(session.status(), ConnectionStatus::Connected);
        assert_eq!(session.synthetic_generations(), 0);
        assert!(session.series().is_empty());
    }

    #[test]
    fn timeout_falls_back_to_mock() {
        let mut session = TrackerSession::default();
        let update = session.handle(FeedEvent::TimeoutElapsed);
        assert!(matches!(
            update,
            SessionUpdate::StatusChanged { to: ConnectionStatus::Mock, synthetic: true, .. }
        ));
        let tickers: Vec<&str> = session.series().iter().map(|s| s.ticker.as_str()).collect();
        assert_eq!(tickers, ["AAPL", "GOOGL", "TSLA"]);
        assert!(session.series().iter().all(|s| s.history.len() == SAMPLE_COUNT));
        assert_eq!(session.get("GOOGL").unwrap().ticker, "GOOGL");
    }

    #[test]
    fn late_handshake_after_mock_is_ignored() {
        let mut session = TrackerSession::default();
        session.handle(FeedEvent::TimeoutElapsed);
        assert_eq!(session.handle(FeedEvent::Connected), SessionUpdate::Ignored);
        assert_eq!(session.status(), ConnectionStatus::Mock);
    }

    #[test]
    fn error_after_mock_does_not_regenerate() {
        let mut session = TrackerSession::default();
        session.handle(FeedEvent::TimeoutElapsed);
        let before = session.snapshot();
        let update = session.handle(FeedEvent::TransportError("reset".into()));
        assert_eq!(
            update,
            SessionUpdate::StatusChanged {
                from: ConnectionStatus::Mock,
                to: ConnectionStatus::Error,
                synthetic: false,
            }
        );
        assert_eq!(session.synthetic_generations(), 1);
        assert_eq!(session.series(), &before.series[..]);
    }

    #[test]
    fn repeated_errors_generate_once() {
        let mut session = TrackerSession::default();
        session.handle(FeedEvent::TransportError("refused".into()));
        assert_eq!(session.status(), ConnectionStatus::Error);
        assert_eq!(
            session.handle(FeedEvent::TransportError("again".into())),
            SessionUpdate::Ignored
        );
        assert_eq!(session.synthetic_generations(), 1);
        assert_eq!(session.series().len(), 3);
    }

    #[test]
    fn error_after_live_data_replaces_it() {
        let mut session = connected();
        session.handle(msg("MSFT", 300.0, 1));
        session.handle(FeedEvent::TransportError("closed".into()));
        assert_eq!(session.status(), ConnectionStatus::Error);
        assert!(session.get("MSFT").is_none());
        assert!(session.get("AAPL").is_some());
    }

    #[test]
    fn messages_append_in_arrival_order() {
        let mut session = connected();
        assert_eq!(
            session.handle(msg("AAPL", 101.0, 30)),
            SessionUpdate::SampleAppended { ticker: "AAPL".into() }
        );
        session.handle(msg("GOOG", 2000.0, 31));
        session.handle(msg("AAPL", 102.0, 10));

        let tickers: Vec<&str> = session.series().iter().map(|s| s.ticker.as_str()).collect();
        assert_eq!(tickers, ["AAPL", "GOOG"]);
        let aapl = session.get("AAPL").unwrap();
        let prices: Vec<f64> = aapl.history.iter().map(|s| s.price).collect();
        assert_eq!(prices, [101.0, 102.0]);
        assert_eq!(aapl.timestamp, 10);
    }

    #[test]
    fn malformed_message_leaves_session_untouched() {
        let mut session = connected();
        session.handle(msg("AAPL", 101.0, 30));
        let before = session.snapshot();
        let update = session.handle(FeedEvent::Message("{\"ticker\":\"AAPL\"".into()));
        assert!(matches!(update, SessionUpdate::Discarded { .. }));
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn messages_before_handshake_are_discarded() {
        let mut session = TrackerSession::default();
        let update = session.handle(msg("AAPL", 101.0, 30));
        assert!(matches!(update, SessionUpdate::Discarded { .. }));
        assert!(session.series().is_empty());
    }

    #[test]
    fn live_series_respect_history_limit() {
        let limit = HistoryLimit::Max(NonZeroUsize::new(22).unwrap());
        let mut session = TrackerSession::new(SyntheticGenerator::new(default_seeds()), limit);
        session.handle(FeedEvent::Connected);
        for i in 0..50 {
            session.handle(msg("AAPL", 100.0 + i as f64, i));
        }
        let aapl = session.get("AAPL").unwrap();
        assert_eq!(aapl.history.len(), 22);
        assert_eq!(aapl.price, 149.0);
        let expected = (130..150).map(|p| p as f64).sum::<f64>() / 20.0;
        assert!((aapl.latest_average().unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn fractional_timestamps_are_applied() {
        let mut session = connected();
        let update = session.handle(FeedEvent::Message(
            r#"{"ticker":"AAPL","price":151.5,"timestamp":1700000000.5}"#.into(),
        ));
        assert_eq!(update, SessionUpdate::SampleAppended { ticker: "AAPL".into() });
        session.handle(FeedEvent::Message(
            r#"{"ticker":"AAPL","price":152.0,"timestamp":1700000001.0}"#.into(),
        ));

        let aapl = session.get("AAPL").unwrap();
        assert_eq!(aapl.history.len(), 2);
        assert_eq!(aapl.price, 152.0);
        assert_eq!(aapl.timestamp, 1_700_000_001);
    }
}
