//! The target's lifecycle state as seen by effects.

use serde::Serialize;

use cmdcore_core::OpenState;

use crate::DocumentState;

/// Lifecycle state of the entity a command is applied to.
///
/// Lifecycle machines keep their own state types; any of them can drive
/// commands as long as its state converts into this closed set.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "target", content = "state", rename_all = "snake_case")]
pub enum TargetState {
    /// A target without lifecycle states (payment account).
    Open,
    Document(DocumentState),
}

impl From<OpenState> for TargetState {
    fn from(_: OpenState) -> Self {
        TargetState::Open
    }
}

impl From<DocumentState> for TargetState {
    fn from(state: DocumentState) -> Self {
        TargetState::Document(state)
    }
}

impl core::fmt::Display for TargetState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TargetState::Open => f.write_str("open"),
            TargetState::Document(state) => write!(f, "{state}"),
        }
    }
}
