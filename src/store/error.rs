//! Error types for the turn store
//!
//! Two failure families: the backing medium cannot be used at all
//! (`Unavailable`), or an individual stored record cannot be decoded
//! (`MalformedTurn`). Unknown session ids are NOT errors; `read` reports
//! them as `None`.

use thiserror::Error;

/// Errors that can occur when reading or writing the turn store
#[derive(Error, Debug)]
pub enum StoreError {
    /// The database file cannot be opened, read, or written
    #[error("Turn store unavailable: {message}")]
    Unavailable { message: String },

    /// A stored turn row is missing expected fields
    #[error("Malformed turn in session {session_id}: {detail}")]
    MalformedTurn { session_id: String, detail: String },
}

impl StoreError {
    /// Creates an unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a malformed-turn error
    pub fn malformed_turn(session_id: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::MalformedTurn {
            session_id: session_id.into(),
            detail: detail.into(),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::Unavailable {
            message: err.to_string(),
        }
    }
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
