//! Error types for model-audit
//!
//! Errors raised by collaborators (the log sink and the authentication
//! context) keep their own types and are wrapped unchanged in
//! [`AuditError`], so callers can still tell where a failure came from.

use thiserror::Error;

/// Failure writing to or reading from a log sink
#[derive(Error, Debug)]
pub enum SinkError {
    /// File I/O failure
    #[error("Sink I/O error: {0}")]
    Io(String),

    /// A record could not be serialized or parsed
    #[error("Sink serialization error: {0}")]
    Serialization(String),

    /// The sink cannot accept writes right now
    #[error("Sink unavailable: {0}")]
    Unavailable(String),
}

/// Failure resolving the current user
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authentication context unavailable: {0}")]
    Unavailable(String),
}

/// The main error type for model-audit operations
#[derive(Error, Debug)]
pub enum AuditError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Malformed event documents handed to the CLI
    #[error("Invalid input: {0}")]
    Input(String),

    /// Propagated unchanged from the log sink
    #[error(transparent)]
    Sink(#[from] SinkError),

    /// Propagated unchanged from the authentication context
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl AuditError {
    /// Check if this error came from the log sink
    pub fn is_sink(&self) -> bool {
        matches!(self, Self::Sink(_))
    }

    /// Check if this error came from the authentication context
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}

impl From<std::io::Error> for AuditError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AuditError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for model-audit operations
pub type AuditResult<T> = Result<T, AuditError>;
