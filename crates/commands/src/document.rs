//! Document entity and its Draft → Published lifecycle.

use serde::{Deserialize, Serialize};

use cmdcore_core::{CommandKind, DocumentId, Entity, LifecycleStateMachine};

/// Handle to a document carried inside commands.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentRef {
    pub id: DocumentId,
    pub title: String,
}

impl DocumentRef {
    pub fn new(id: DocumentId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentState {
    Draft,
    Published,
}

impl core::fmt::Display for DocumentState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DocumentState::Draft => f.write_str("draft"),
            DocumentState::Published => f.write_str("published"),
        }
    }
}

/// Draft → Published, one way. Re-publishing is legal and changes nothing.
/// Payment kinds are never legal against a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentLifecycle {
    state: DocumentState,
}

impl DocumentLifecycle {
    pub fn new() -> Self {
        Self {
            state: DocumentState::Draft,
        }
    }

    pub fn in_state(state: DocumentState) -> Self {
        Self { state }
    }
}

impl Default for DocumentLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleStateMachine for DocumentLifecycle {
    type State = DocumentState;

    fn current_state(&self) -> Self::State {
        self.state
    }

    fn is_legal(&self, kind: CommandKind) -> bool {
        kind.is_document()
    }

    fn transition(&mut self, kind: CommandKind) -> Self::State {
        self.state = match (self.state, kind) {
            (DocumentState::Draft, CommandKind::PublishDocument) => DocumentState::Published,
            (state, _) => state,
        };
        self.state
    }
}

/// A titled document that owns its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    id: DocumentId,
    title: String,
    lifecycle: DocumentLifecycle,
}

impl Document {
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(DocumentId::new(), title)
    }

    pub fn with_id(id: DocumentId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            lifecycle: DocumentLifecycle::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn state(&self) -> DocumentState {
        self.lifecycle.current_state()
    }

    pub fn reference(&self) -> DocumentRef {
        DocumentRef::new(self.id, self.title.clone())
    }

    pub fn lifecycle(&self) -> &DocumentLifecycle {
        &self.lifecycle
    }

    pub fn lifecycle_mut(&mut self) -> &mut DocumentLifecycle {
        &mut self.lifecycle
    }
}

impl Entity for Document {
    type Id = DocumentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
