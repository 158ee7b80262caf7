//!
//! Core of the stock tracker: per-ticker price histories with a 20-point moving
//! average, fed by a live feed or by synthetic data.
//!
//! This crate aggregates:
//! - `error` — unified error type `TrackerError` used across the workspace.
//! - `result` — handy `Result<T, TrackerError>` alias.
//! - `sample` / `series` — the data model handed to renderers.
//! - `moving_average` — incremental MA-20 maintenance and history limits.
//! - `seeds` / `generator` — synthetic fallback data.
//! - `message` — JSON payloads pushed by the feed.
//! - `session` — connection state machine owning all series.
//! - `driver` — event loop feeding the session from channels.
//! - `net` — feed endpoint constants.
#![warn(missing_docs)]
pub mod driver;
pub mod error;
pub mod generator;
pub mod message;
pub mod moving_average;
pub mod net;
pub mod result;
pub mod sample;
pub mod seeds;
pub mod series;
pub mod session;

pub use error::TrackerError;
pub use result::Result;
pub use session::{ConnectionStatus, FeedEvent, SessionUpdate, TrackerSession};
