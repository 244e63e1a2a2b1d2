//! Error types for remote agent calls
//!
//! A failed agent call is fatal to the current submission: the turn is not
//! persisted and nothing is retried. The categories below exist for logging
//! and for the shell to phrase the notice, not for retry policy.

use thiserror::Error;

/// Errors that can occur when calling the remote agent
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgentError {
    /// Network-level failures (connection refused, DNS, TLS)
    #[error("Network error: {message}")]
    Network { message: String },

    /// Invalid or missing API credentials
    #[error("Authentication error: {message}")]
    Auth { message: String },

    /// Request took too long
    #[error("Request timeout after {seconds} seconds")]
    Timeout { seconds: u64 },

    /// The service answered with an error
    #[error("Agent service error: {message}")]
    Service {
        message: String,
        code: Option<String>,
    },

    /// The response body could not be decoded
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Missing or invalid agent configuration
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl AgentError {
    /// Creates a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates an authentication error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Creates a timeout error
    pub fn timeout(seconds: u64) -> Self {
        Self::Timeout { seconds }
    }

    /// Creates a service error
    pub fn service(message: impl Into<String>, code: Option<impl Into<String>>) -> Self {
        Self::Service {
            message: message.into(),
            code: code.map(|c| c.into()),
        }
    }

    /// Creates a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Creates a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for AgentError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for AgentError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout { seconds: 30 }
        } else if err.is_decode() {
            Self::Serialization {
                message: err.to_string(),
            }
        } else {
            Self::Network {
                message: err.to_string(),
            }
        }
    }
}

/// Result type for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;
