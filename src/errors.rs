//! Error types for domain policy operations

use thiserror::Error;

use crate::domain::hostname::HostnameError;

/// Errors that can occur in domain policy operations
#[derive(Debug, Error)]
pub enum DomainPolicyError {
    /// Storage collaborator error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: missing or invalid key '{0}'")]
    Config(String),

    /// Unknown domain mode string
    #[error("Unknown domain mode: {0}")]
    UnknownMode(String),

    /// Invalid hostname
    #[error("Invalid hostname: {0}")]
    Hostname(#[from] HostnameError),

    /// No request host available for hostname resolution
    #[error("No request host available for resolution")]
    NoRequestHost,

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for domain policy operations
pub type PolicyResult<T> = Result<T, DomainPolicyError>;

impl From<serde_json::Error> for DomainPolicyError {
    fn from(err: serde_json::Error) -> Self {
        DomainPolicyError::Serialization(err.to_string())
    }
}
