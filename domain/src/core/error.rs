//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid query identifier: {0}")]
    InvalidQueryId(String),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
}

impl DomainError {
    /// Check if this error was caused by bad caller-supplied options
    pub fn is_configuration(&self) -> bool {
        matches!(self, DomainError::InvalidConfiguration(_))
    }
}
