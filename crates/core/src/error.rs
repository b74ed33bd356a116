//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic configuration failures. Transport
/// concerns and denial signaling belong to the guard layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A permission string could not be split into resource/action.
    #[error("invalid permission '{0}': expected 'resource:action' or '*'")]
    InvalidPermission(String),
}

impl DomainError {
    pub fn invalid_permission(raw: impl Into<String>) -> Self {
        Self::InvalidPermission(raw.into())
    }
}
