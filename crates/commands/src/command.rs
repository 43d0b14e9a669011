//! The reversible command.

use std::sync::Arc;

use serde::Serialize;

use cmdcore_auth::{CommandAuthorization, Permission};
use cmdcore_core::{Amount, CommandId, CommandKind};

use crate::{
    CommandError, CommandResult, DocumentRef, DocumentState, EffectContext, KindDescriptor,
    PaymentOperation, PaymentReceipt, PaymentRequest, TargetState,
};

/// Validated payment fields shared by transfers and card charges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentDetails {
    pub amount: Amount,
    pub description: String,
}

impl PaymentDetails {
    pub fn new(amount: i64, description: impl Into<String>) -> CommandResult<Self> {
        let amount = Amount::new(amount)?;
        let description = description.into();
        if description.trim().is_empty() {
            return Err(CommandError::validation("payment description must not be empty"));
        }
        Ok(Self { amount, description })
    }
}

/// Kind-specific immutable payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum CommandPayload {
    BankTransfer(PaymentDetails),
    CreditCardCharge(PaymentDetails),
    PublishDocument(DocumentRef),
    RenderDocument(DocumentRef),
}

impl CommandPayload {
    pub fn kind(&self) -> CommandKind {
        match self {
            CommandPayload::BankTransfer(_) => CommandKind::BankTransfer,
            CommandPayload::CreditCardCharge(_) => CommandKind::CreditCardCharge,
            CommandPayload::PublishDocument(_) => CommandKind::PublishDocument,
            CommandPayload::RenderDocument(_) => CommandKind::RenderDocument,
        }
    }
}

/// What an apply or revert produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "output", rename_all = "snake_case")]
pub enum CommandOutput {
    Payment(PaymentReceipt),
    Published(DocumentRef),
    Retracted(DocumentRef),
    Rendered { text: String },
    Nothing,
}

/// Per-call context for `apply`: effects plus the target's current state.
#[derive(Debug, Clone, Copy)]
pub struct ApplyContext<'a> {
    pub effects: &'a EffectContext,
    pub target: TargetState,
}

impl<'a> ApplyContext<'a> {
    pub fn new(effects: &'a EffectContext, target: impl Into<TargetState>) -> Self {
        Self {
            effects,
            target: target.into(),
        }
    }

    fn document_state(&self, kind: CommandKind) -> CommandResult<DocumentState> {
        match self.target {
            TargetState::Document(state) => Ok(state),
            TargetState::Open => Err(CommandError::validation(format!(
                "{kind} needs a document target, got an open one"
            ))),
        }
    }
}

/// A reversible unit of work.
///
/// `apply` may run at most once between reverts: a second call fails with
/// [`CommandError::AlreadyApplied`]. `revert` only compensates an applied
/// command; otherwise it logs a warning and fails with
/// [`CommandError::NothingToUndo`]. A failed apply or revert leaves the
/// `applied` flag unchanged.
#[derive(Debug, Clone)]
pub struct Command {
    id: CommandId,
    descriptor: Arc<KindDescriptor>,
    payload: CommandPayload,
    applied: bool,
}

impl Command {
    /// Build a command with its own (non-interned) descriptor.
    pub fn new(payload: CommandPayload) -> Self {
        let descriptor = Arc::new(KindDescriptor::of(payload.kind()));
        Self::with_descriptor(payload, descriptor)
    }

    pub(crate) fn with_descriptor(
        payload: CommandPayload,
        descriptor: Arc<KindDescriptor>,
    ) -> Self {
        debug_assert_eq!(payload.kind(), descriptor.kind);
        Self {
            id: CommandId::new(),
            descriptor,
            payload,
            applied: false,
        }
    }

    pub fn bank_transfer(amount: i64, description: impl Into<String>) -> CommandResult<Self> {
        Ok(Self::new(CommandPayload::BankTransfer(PaymentDetails::new(amount, description)?)))
    }

    pub fn credit_card_charge(amount: i64, description: impl Into<String>) -> CommandResult<Self> {
        Ok(Self::new(CommandPayload::CreditCardCharge(PaymentDetails::new(
            amount,
            description,
        )?)))
    }

    pub fn publish_document(document: DocumentRef) -> Self {
        Self::new(CommandPayload::PublishDocument(document))
    }

    pub fn render_document(document: DocumentRef) -> Self {
        Self::new(CommandPayload::RenderDocument(document))
    }

    pub fn id(&self) -> CommandId {
        self.id
    }

    pub fn kind(&self) -> CommandKind {
        self.payload.kind()
    }

    pub fn descriptor(&self) -> &Arc<KindDescriptor> {
        &self.descriptor
    }

    pub fn payload(&self) -> &CommandPayload {
        &self.payload
    }

    pub fn is_applied(&self) -> bool {
        self.applied
    }

    /// Human-readable summary; no side effects.
    pub fn describe(&self) -> String {
        let label = self.descriptor.label;
        match &self.payload {
            CommandPayload::BankTransfer(p) | CommandPayload::CreditCardCharge(p) => {
                format!("{label} of {} for {}", p.amount, p.description)
            }
            CommandPayload::PublishDocument(d) | CommandPayload::RenderDocument(d) => {
                format!("{label} '{}'", d.title)
            }
        }
    }

    pub fn apply(&mut self, ctx: ApplyContext<'_>) -> CommandResult<CommandOutput> {
        if self.applied {
            return Err(CommandError::AlreadyApplied);
        }

        let output = match &self.payload {
            CommandPayload::BankTransfer(p) => pay(ctx.effects, PaymentOperation::Transfer, p)?,
            CommandPayload::CreditCardCharge(p) => pay(ctx.effects, PaymentOperation::Charge, p)?,
            CommandPayload::PublishDocument(d) => {
                let state = ctx.document_state(self.kind())?;
                ctx.effects.documents.publish(d, state)?;
                CommandOutput::Published(d.clone())
            }
            CommandPayload::RenderDocument(d) => {
                let state = ctx.document_state(self.kind())?;
                CommandOutput::Rendered {
                    text: ctx.effects.documents.render(d, state)?,
                }
            }
        };

        self.applied = true;
        Ok(output)
    }

    pub fn revert(&mut self, effects: &EffectContext) -> CommandResult<CommandOutput> {
        if !self.applied {
            tracing::warn!(
                command_id = %self.id,
                kind = %self.kind(),
                "cannot undo: {} was not applied",
                self.describe()
            );
            return Err(CommandError::NothingToUndo);
        }

        let output = match &self.payload {
            CommandPayload::BankTransfer(p) => pay(effects, PaymentOperation::TransferReversal, p)?,
            CommandPayload::CreditCardCharge(p) => pay(effects, PaymentOperation::Refund, p)?,
            CommandPayload::PublishDocument(d) => {
                effects.documents.retract(d)?;
                CommandOutput::Retracted(d.clone())
            }
            // Rendering has no lasting effect to compensate.
            CommandPayload::RenderDocument(_) => CommandOutput::Nothing,
        };

        self.applied = false;
        Ok(output)
    }
}

fn pay(
    effects: &EffectContext,
    operation: PaymentOperation,
    details: &PaymentDetails,
) -> CommandResult<CommandOutput> {
    let request = PaymentRequest {
        operation,
        amount: details.amount,
        description: details.description.clone(),
    };
    effects.payments.process(&request).map(CommandOutput::Payment)
}

impl CommandAuthorization for Command {
    fn required_permissions(&self) -> Vec<Permission> {
        vec![self.descriptor.required_permission.clone()]
    }
}
