//! Error types for StudyBuddy
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for StudyBuddy operations
///
/// Store operations report `InvalidInput`, `NotFound` and `Parse`; the
/// reply gateway reports `Network`. None of them are fatal: front ends show
/// them as a transient status line and leave state unchanged.
#[derive(Error, Debug)]
pub enum StudyBuddyError {
    /// Required text was empty after trimming
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An index or id did not resolve to a chat or folder
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed persisted or imported JSON
    #[error("Parse error: {0}")]
    Parse(String),

    /// The reply backend could not be reached or returned a non-success status
    #[error("Network error: {0}")]
    Network(String),

    /// A reply is already in flight for this chat
    #[error("A reply is already pending for chat {0}")]
    ReplyPending(i64),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Key-value storage errors (database operations)
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for StudyBuddy operations
///
/// Uses `anyhow::Error` so call sites can add context; callers that need the
/// error kind use `err.downcast_ref::<StudyBuddyError>()`.
pub type Result<T> = anyhow::Result<T>;

/// Returns the `StudyBuddyError` carried by an `anyhow::Error`, if any
pub fn kind_of(err: &anyhow::Error) -> Option<&StudyBuddyError> {
    err.downcast_ref::<StudyBuddyError>()
}
