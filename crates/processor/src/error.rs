use thiserror::Error;

use cmdcore_commands::CommandError;
use cmdcore_core::CommandKind;

/// Typed failure of `submit`/`undo`.
///
/// A failed submission leaves history and lifecycle state untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProcessorError {
    /// An authorization link denied; the caller may retry with another principal.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The target's lifecycle state does not allow this kind.
    #[error("{kind} is not allowed while the target is {state}")]
    IllegalForState { state: String, kind: CommandKind },

    /// The command instance was already applied (or is already in history).
    #[error("command already applied")]
    AlreadyApplied,

    /// History is empty.
    #[error("nothing to undo")]
    NothingToUndo,

    /// Failure reported by the command's own apply/revert (e.g. a declined payment).
    #[error(transparent)]
    Command(CommandError),

    #[error("processor state is unavailable (lock poisoned)")]
    LockPoisoned,
}

impl ProcessorError {
    /// Stable discriminant, suitable for log fields and API payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            ProcessorError::Unauthorized(_) => "unauthorized",
            ProcessorError::IllegalForState { .. } => "illegal_for_state",
            ProcessorError::AlreadyApplied => "already_applied",
            ProcessorError::NothingToUndo => "nothing_to_undo",
            ProcessorError::Command(err) => err.kind(),
            ProcessorError::LockPoisoned => "lock_poisoned",
        }
    }

    /// Whether retrying (with a different principal, later state, ...) can succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ProcessorError::Unauthorized(_) | ProcessorError::IllegalForState { .. }
        )
    }
}

impl From<CommandError> for ProcessorError {
    fn from(value: CommandError) -> Self {
        match value {
            CommandError::AlreadyApplied => ProcessorError::AlreadyApplied,
            CommandError::NothingToUndo => ProcessorError::NothingToUndo,
            other => ProcessorError::Command(other),
        }
    }
}
