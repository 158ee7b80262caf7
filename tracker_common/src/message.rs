//! Inbound feed message and its validation.
//!
//! The feed pushes one JSON object per price update:
//!
//! ```json
//! { "ticker": "AAPL", "price": 151.25, "timestamp": 1700000000 }
//! ```
//!
//! `timestamp` is any JSON number of epoch seconds; fractional values are
//! accepted and truncated to whole seconds. Unknown fields are ignored. Non-number
//! field types are rejected rather than coerced, and so are blank tickers,
//! non-finite prices and timestamps that cannot be shown as a clock time.
use chrono::DateTime;
use serde::Deserialize;

use crate::error::TrackerError;
use crate::result::Result;

/// Price update pushed by the feed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeedMessage {
    /// Symbol identifier (e.g., `AAPL`).
    pub ticker: String,
    /// Last traded price.
    pub price: f64,
    /// Event time in seconds since the UNIX epoch, possibly fractional.
    pub timestamp: f64,
}

impl FeedMessage {
    /// Creates a new message.
    pub fn new(ticker: &str, price: f64, timestamp: f64) -> Self {
        Self {
            ticker: ticker.to_string(),
            price,
            timestamp,
        }
    }

    /// Decode and validate one text frame.
    pub fn parse(text: &str) -> Result<Self> {
        let message: FeedMessage = serde_json::from_str(text)?;
        message.validate()?;
        Ok(message)
    }

    /// Whole epoch seconds of `timestamp`; out-of-range values saturate.
    pub fn epoch_seconds(&self) -> i64 {
        self.timestamp.floor() as i64
    }

    /// Check the decoded values are usable.
    pub fn validate(&self) -> Result<()> {
        if self.ticker.trim().is_empty() {
            return Err(TrackerError::InvalidMessage("empty ticker".to_string()));
        }
        if !self.price.is_finite() {
            return Err(TrackerError::InvalidMessage(format!(
                "non-finite price for {}",
                self.ticker
            )));
        }
        if !self.timestamp.is_finite() {
            return Err(TrackerError::InvalidMessage(format!(
                "non-finite timestamp for {}",
                self.ticker
            )));
        }
        let secs = self.epoch_seconds();
        if DateTime::from_timestamp(secs, 0).is_none() {
            return Err(TrackerError::InvalidTimestamp(secs));
        }
        Ok(())
    }
}
