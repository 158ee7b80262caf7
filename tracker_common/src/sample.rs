//! A single price observation as the renderer sees it.
use chrono::{DateTime, Local};

use crate::error::TrackerError;
use crate::result::Result;

/// One price observation with its display label and optional 20-point average.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Observed price.
    pub price: f64,
    /// Local wall-clock time of the observation, `HH:MM:SS`.
    pub label: String,
    /// Mean of the 20 prices ending at this sample, if that many are retained.
    pub moving_average: Option<f64>,
}

impl Sample {
    /// Build a sample without an average; the maintainer fills it in.
    pub fn new(price: f64, timestamp: i64) -> Result<Self> {
        Ok(Self {
            price,
            label: time_label(timestamp)?,
            moving_average: None,
        })
    }
}

/// Render epoch seconds as a local `HH:MM:SS` label.
pub fn time_label(timestamp: i64) -> Result<String> {
    let utc = DateTime::from_timestamp(timestamp, 0).ok_or(TrackerError::InvalidTimestamp(timestamp))?;
    Ok(utc.with_timezone(&Local).format("%H:%M:%S").to_string())
}
