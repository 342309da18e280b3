//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Service version was empty or contained whitespace
    #[error("Invalid service version: {0:?}")]
    InvalidVersion(String),
}
