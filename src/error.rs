// ABOUTME: Error types for the timer core and its persistence layer.
// ABOUTME: TimerError is what commands surface to the user; StoreError wraps storage failures.

use std::path::PathBuf;

/// Failures from reading or writing the key-value store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access store file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store file {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("value under key '{key}' has an unexpected shape: {source}")]
    Shape {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised by session and history operations.
///
/// Every variant except `Storage` is raised before any state is mutated.
#[derive(Debug, thiserror::Error)]
pub enum TimerError {
    #[error("There is already a running session")]
    AlreadyRunning,

    #[error("There is no running session")]
    NoActiveSession,

    #[error(
        "You provided an invalid number ('{input}'). Try again or cancel. Example valid values are: 10, 25, 30"
    )]
    InvalidDuration { input: String },

    #[error("Pomodoro timer is not configured. Please set {key} in your settings.")]
    MissingConfiguration { key: &'static str },

    #[error(transparent)]
    Storage(#[from] StoreError),
}
