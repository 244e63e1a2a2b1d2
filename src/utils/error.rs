//! Centralized error types for frontdesk
//!
//! Structured errors using `thiserror` for library code; the CLI/main modules
//! use `anyhow` for easy context. Layer-specific errors (`StoreError`,
//! `AgentError`) convert into `FrontdeskError` at the controller boundary.

use std::path::PathBuf;
use thiserror::Error;

use crate::agent::AgentError;
use crate::store::StoreError;

/// Global error type for frontdesk operations
#[derive(Error, Debug)]
pub enum FrontdeskError {
    /// IO errors with path context
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The turn store cannot be read or written
    #[error("Storage unavailable: {message}")]
    Storage { message: String },

    /// A session id is not present in the turn store
    #[error("Session not found: {session_id}")]
    SessionNotFound { session_id: String },

    /// A stored turn record is missing expected fields
    #[error("Malformed stored turn in session {session_id}: {detail}")]
    MalformedTurn { session_id: String, detail: String },

    /// The remote agent call failed; the turn was not recorded
    #[error("Agent call failed: {0}")]
    Agent(#[from] AgentError),

    /// Invalid user input
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl FrontdeskError {
    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a storage-unavailable error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a session-not-found error
    pub fn session_not_found(session_id: impl Into<String>) -> Self {
        Self::SessionNotFound {
            session_id: session_id.into(),
        }
    }

    /// Create a malformed-turn error
    pub fn malformed_turn(session_id: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::MalformedTurn {
            session_id: session_id.into(),
            detail: detail.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Returns true if the caller can degrade to a usable state (fail-open)
    /// instead of aborting.
    ///
    /// Session loads treat every recoverable failure as "empty session with
    /// greeting"; agent failures are surfaced to the user unmasked.
    pub fn is_recoverable(&self) -> bool {
        match self {
            FrontdeskError::SessionNotFound { .. } => true,
            FrontdeskError::Storage { .. } => true,
            FrontdeskError::MalformedTurn { .. } => true,
            FrontdeskError::Io { .. } => true,
            FrontdeskError::InvalidInput { .. } => true,
            // Agent failures are fatal to the current submission, not retried
            FrontdeskError::Agent(_) => false,
            // Config errors are fatal on startup
            FrontdeskError::Config { .. } => false,
        }
    }

    /// Returns the error severity level for logging
    pub fn severity(&self) -> tracing::Level {
        match self {
            FrontdeskError::Config { .. } => tracing::Level::ERROR,
            FrontdeskError::Agent(_) => tracing::Level::ERROR,
            FrontdeskError::Storage { .. } => tracing::Level::WARN,
            FrontdeskError::MalformedTurn { .. } => tracing::Level::WARN,
            FrontdeskError::Io { .. } => tracing::Level::WARN,
            FrontdeskError::SessionNotFound { .. } => tracing::Level::INFO,
            FrontdeskError::InvalidInput { .. } => tracing::Level::INFO,
        }
    }
}

/// Result type alias using FrontdeskError
pub type Result<T> = std::result::Result<T, FrontdeskError>;

impl From<std::io::Error> for FrontdeskError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<StoreError> for FrontdeskError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable { message } => Self::Storage { message },
            StoreError::MalformedTurn { session_id, detail } => {
                Self::MalformedTurn { session_id, detail }
            }
        }
    }
}
