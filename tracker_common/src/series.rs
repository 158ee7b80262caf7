//! Per-ticker price history.

use crate::moving_average::{self, HistoryLimit};
use crate::result::Result;
use crate::sample::Sample;

/// Ordered price history of one ticker plus its latest price and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolSeries {
    /// Symbol identifier, unique within a session.
    pub ticker: String,
    /// Price of the most recent sample.
    pub price: f64,
    /// Epoch seconds of the most recent update.
    pub timestamp: i64,
    /// Samples in arrival order.
    pub history: Vec<Sample>,
}

impl SymbolSeries {
    /// Start a series from its first observation.
    pub fn first_observation(ticker: &str, price: f64, timestamp: i64) -> Result<Self> {
        let mut series = Self {
            ticker: ticker.to_string(),
            price,
            timestamp,
            history: Vec::new(),
        };
        moving_average::push_sample(&mut series.history, price, timestamp, HistoryLimit::Unbounded)?;
        Ok(series)
    }

    /// Append one observation. Arrival order wins; timestamps are not compared.
    pub fn observe(&mut self, price: f64, timestamp: i64, limit: HistoryLimit) -> Result<()> {
        moving_average::push_sample(&mut self.history, price, timestamp, limit)?;
        self.price = price;
        self.timestamp = timestamp;
        Ok(())
    }

    /// Price of the sample before the latest one.
    pub fn previous_price(&self) -> Option<f64> {
        self.history.len().checked_sub(2).map(|i| self.history[i].price)
    }

    /// Percent change from the previous sample, 0 when there is nothing to compare.
    pub fn change_percent(&self) -> f64 {
        match self.previous_price() {
            Some(prev) if prev != 0.0 => (self.price - prev) / prev * 100.0,
            _ => 0.0,
        }
    }

    /// Average attached to the latest sample.
    pub fn latest_average(&self) -> Option<f64> {
        self.history.last().and_then(|s| s.moving_average)
    }
}
