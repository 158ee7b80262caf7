//! Error types shared between the tracker library and the client binary.
//!
//! The `TrackerError` enum unifies the failure cases of feed decoding, seed
//! parsing, channel communication and transport setup, allowing crates to
//! propagate a single error type.
use std::io;

use thiserror::Error;

/// Unified error type shared by the library and the client.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// I/O error originating from the standard library (files, runtime setup).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic formatting/validation error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),

    /// Failure while decoding a feed message as JSON (malformed text, missing
    /// fields, wrong field types).
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// Feed message decoded but carried values the tracker refuses to apply.
    #[error("Invalid feed message: {0}")]
    InvalidMessage(String),

    /// Epoch seconds that cannot be turned into a calendar time.
    #[error("Timestamp out of range: {0}")]
    InvalidTimestamp(i64),

    /// Error while parsing the seeds file into `SeedTicker` values.
    #[error("Parse seeds file error: {0}")]
    ParseSeedsFile(String),

    /// Channel send failed (e.g., receiver dropped); contains a short context string.
    #[error("Channel send failed: {0}")]
    ChannelSend(String),
}
