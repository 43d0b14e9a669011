//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic failures raised while constructing or
/// validating domain values. Execution failures belong to the command and
/// processor layers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A monetary amount was zero or negative.
    #[error("invalid amount: {0} (amount must be greater than zero)")]
    InvalidAmount(i64),

    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// Stable discriminant, suitable for log fields and API payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::InvalidAmount(_) => "invalid_amount",
            DomainError::Validation(_) => "validation",
            DomainError::InvalidId(_) => "invalid_id",
        }
    }
}
