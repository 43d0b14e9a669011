//! Lifecycle state machines for command targets.

use serde::{Deserialize, Serialize};

use crate::kind::CommandKind;

/// Tracks the lifecycle state of one target entity and answers legality
/// queries for command kinds.
///
/// The machine is a pure data structure: `transition` never refuses. Whoever
/// drives commands must consult `is_legal` *before* applying a command and
/// call `transition` only after the command succeeded.
pub trait LifecycleStateMachine {
    type State: Copy + Eq + core::fmt::Debug + core::fmt::Display;

    fn current_state(&self) -> Self::State;

    /// Pure query; no side effects.
    fn is_legal(&self, kind: CommandKind) -> bool;

    /// Apply the state change associated with `kind`, if any, and return the
    /// (possibly unchanged) state.
    fn transition(&mut self, kind: CommandKind) -> Self::State;
}

/// The only state of an [`OpenLifecycle`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenState {
    Open,
}

impl core::fmt::Display for OpenState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("open")
    }
}

/// Lifecycle for targets with no states of their own (payment accounts).
/// Payment kinds are always legal and nothing transitions; document kinds
/// need a document lifecycle and are refused.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct OpenLifecycle;

impl LifecycleStateMachine for OpenLifecycle {
    type State = OpenState;

    fn current_state(&self) -> Self::State {
        OpenState::Open
    }

    fn is_legal(&self, kind: CommandKind) -> bool {
        kind.is_payment()
    }

    fn transition(&mut self, _kind: CommandKind) -> Self::State {
        OpenState::Open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_lifecycle_allows_payments_and_never_moves() {
        let mut lifecycle = OpenLifecycle;
        for kind in CommandKind::ALL {
            assert_eq!(lifecycle.is_legal(kind), kind.is_payment(), "{kind}");
            assert_eq!(lifecycle.transition(kind), OpenState::Open);
        }
    }

    #[test]
    fn open_lifecycle_refuses_document_kinds() {
        assert!(!OpenLifecycle.is_legal(CommandKind::PublishDocument));
        assert!(!OpenLifecycle.is_legal(CommandKind::RenderDocument));
    }
}
