//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Lifecycle-tracked targets (documents, accounts) are entities: the state
/// machine they own changes, their identity does not.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
