//! Reversible commands (payments, documents) and the effects they drive.
//!
//! Commands are plain values until applied. Applying one performs its effect
//! through an [`EffectContext`]; reverting performs the compensating effect.
//! Effects are collaborators so the same command runs against logging,
//! in-memory, or real backends.

pub mod command;
pub mod document;
pub mod effects;
pub mod error;
pub mod factory;
pub mod in_memory;
pub mod target;

pub use command::{ApplyContext, Command, CommandOutput, CommandPayload, PaymentDetails};
pub use document::{Document, DocumentLifecycle, DocumentRef, DocumentState};
pub use effects::{
    DocumentDesk, EffectContext, LoggingDocumentDesk, LoggingPaymentGateway, PaymentGateway,
    PaymentOperation, PaymentReceipt, PaymentRequest,
};
pub use error::{CommandError, CommandResult};
pub use factory::{CommandFactory, KindDescriptor, KindRegistry};
pub use in_memory::{DeskAction, DeskEntry, InMemoryDocumentDesk, InMemoryPaymentGateway};
pub use target::TargetState;
