//! Error types
//!
//! Transport and protocol failures are recorded in a [`LastError`] slot and
//! surfaced as empty results. Only caller contract violations travel as `Err`.

use parking_lot::Mutex;
use reqwest::StatusCode;
use thiserror::Error;

/// Failure reported by a query executor.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExecutorError {
    /// The store answered with a non-success status; displays the bare code.
    #[error("{}", .0.as_u16())]
    Status(StatusCode),

    /// The request never produced a response.
    #[error("{0}")]
    Transport(String),

    /// The store answered with success but an empty body.
    #[error("no content")]
    NoContent,
}

/// Malformed or empty XML.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty document")]
    Empty,

    #[error("malformed XML at byte {position}: {message}")]
    Malformed { position: u64, message: String },

    #[error("unexpected root element: expected {expected}, found {found}")]
    UnexpectedRoot { expected: String, found: String },
}

/// API-level errors.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Node not found in tree: {0}")]
    NodeNotFound(usize),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Executor error: {0}")]
    Executor(#[from] ExecutorError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

/// Last-error channel shared by the service and the projection engine.
///
/// Overwritten by every failing operation; never cleared by a success.
#[derive(Debug, Default)]
pub struct LastError {
    message: Mutex<Option<String>>,
}

impl LastError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, message: impl Into<String>) {
        *self.message.lock() = Some(message.into());
    }

    /// The outstanding error message, or an empty string.
    pub fn message(&self) -> String {
        self.message.lock().clone().unwrap_or_default()
    }

    pub fn is_set(&self) -> bool {
        self.message.lock().is_some()
    }

    pub fn clear(&self) {
        *self.message.lock() = None;
    }
}
