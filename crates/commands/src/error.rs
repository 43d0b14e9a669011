//! Command-level error model.

use thiserror::Error;

use cmdcore_core::DomainError;

pub type CommandResult<T> = Result<T, CommandError>;

/// Failures raised while constructing, applying or reverting a command.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Construction-time: amount must be greater than zero.
    #[error("invalid amount: {0} (amount must be greater than zero)")]
    InvalidAmount(i64),

    /// Construction-time: any other malformed field.
    #[error("validation failed: {0}")]
    Validation(String),

    /// `apply` was called on an instance that is already applied.
    #[error("command already applied")]
    AlreadyApplied,

    /// `revert` was called on an instance that is not applied.
    #[error("nothing to undo: command is not applied")]
    NothingToUndo,

    /// The payment backend refused the operation.
    #[error("payment declined: {0}")]
    PaymentDeclined(String),

    /// Any other effect failure (backend unavailable, timeout, ...).
    #[error("effect failed: {0}")]
    EffectFailed(String),
}

impl CommandError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn declined(msg: impl Into<String>) -> Self {
        Self::PaymentDeclined(msg.into())
    }

    pub fn effect(msg: impl Into<String>) -> Self {
        Self::EffectFailed(msg.into())
    }

    /// Stable discriminant, suitable for log fields and API payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            CommandError::InvalidAmount(_) => "invalid_amount",
            CommandError::Validation(_) => "validation",
            CommandError::AlreadyApplied => "already_applied",
            CommandError::NothingToUndo => "nothing_to_undo",
            CommandError::PaymentDeclined(_) => "payment_declined",
            CommandError::EffectFailed(_) => "effect_failed",
        }
    }
}

impl From<DomainError> for CommandError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::InvalidAmount(amount) => CommandError::InvalidAmount(amount),
            DomainError::Validation(msg) => CommandError::Validation(msg),
            DomainError::InvalidId(msg) => CommandError::Validation(msg),
        }
    }
}
