//! # Error Hierarchy
//!
//! Structured errors for the core crate, built with `thiserror`.
//! Normalization and evaluation are infallible; the only failures here are
//! caller-facing validation and loading an override rule set from disk.

use thiserror::Error;

/// Top-level error type for the core crate.
#[derive(Error, Debug)]
pub enum BylawError {
    /// Caller-supplied input failed validation (empty question, missing
    /// required project fields).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A default-rules override could not be read or parsed.
    #[error("failed to load rules from {path}: {reason}")]
    RulesLoad {
        /// The path that was read.
        path: String,
        /// Why loading failed.
        reason: String,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
