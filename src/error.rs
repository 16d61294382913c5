//! Error types for tomato.
//!
//! `TomatoError` is what commands return. `PersistenceError` is the only
//! failure that can come back from a session store, and it is always caught
//! before it reaches the focus engine.

use thiserror::Error;

use crate::focus::TransitionError;

/// Main error type for tomato operations.
#[derive(Error, Debug)]
pub enum TomatoError {
    /// Configuration could not be read, parsed or validated.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local `SQLite` database failure.
    #[error("Database error: {0}")]
    Database(String),

    /// Terminal setup, drawing or input failure.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failure.
    #[error("Parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Session store failure surfaced by a read command.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// The timer rejected an action.
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// Failure talking to a session store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// The backend could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The backend rejected our credentials.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The backend answered with an unexpected status.
    #[error("backend returned {status}: {message}")]
    Backend {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// Local storage failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// A stored row could not be understood.
    #[error("could not decode session: {0}")]
    Decode(String),
}
