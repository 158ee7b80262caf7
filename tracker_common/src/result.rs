//! Result type alias shared across the workspace.
//!
//! This module defines a convenient alias that defaults the error type to the
//! common `TrackerError`, so functions can simply return `Result<T>`.
use crate::error::TrackerError;

/// Workspace-wide `Result` alias with `TrackerError` as the default error.
pub type Result<T, E = TrackerError> = std::result::Result<T, E>;
