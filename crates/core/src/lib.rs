//! `cmdcore-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no IO, no logging backends).

pub mod amount;
pub mod entity;
pub mod error;
pub mod id;
pub mod kind;
pub mod lifecycle;
pub mod registry;

pub use amount::Amount;
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{CommandId, DocumentId};
pub use kind::CommandKind;
pub use lifecycle::{LifecycleStateMachine, OpenLifecycle, OpenState};
pub use registry::Registry;
