//! Shared kind metadata and the factory that stamps it onto commands.

use std::sync::Arc;

use serde::Serialize;

use cmdcore_auth::Permission;
use cmdcore_core::{CommandKind, Registry};

use crate::{Command, CommandPayload, CommandResult, DocumentRef, PaymentDetails};

/// Immutable metadata shared by every command of one kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindDescriptor {
    pub kind: CommandKind,
    pub label: &'static str,
    pub required_permission: Permission,
}

impl KindDescriptor {
    pub fn of(kind: CommandKind) -> Self {
        let label = match kind {
            CommandKind::BankTransfer => "bank transfer",
            CommandKind::CreditCardCharge => "credit card charge",
            CommandKind::PublishDocument => "publish document",
            CommandKind::RenderDocument => "render document",
        };
        Self {
            kind,
            label,
            required_permission: Permission::new(kind.as_str()),
        }
    }
}

pub type KindRegistry = Registry<CommandKind, KindDescriptor>;

/// Builds well-formed commands whose descriptors come from one registry.
#[derive(Debug, Clone, Default)]
pub struct CommandFactory {
    registry: Arc<KindRegistry>,
}

impl CommandFactory {
    pub fn new(registry: Arc<KindRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<KindRegistry> {
        &self.registry
    }

    pub fn descriptor(&self, kind: CommandKind) -> Arc<KindDescriptor> {
        self.registry.get_or_create(kind, || KindDescriptor::of(kind))
    }

    pub fn bank_transfer(
        &self,
        amount: i64,
        description: impl Into<String>,
    ) -> CommandResult<Command> {
        let details = PaymentDetails::new(amount, description)?;
        Ok(self.build(CommandPayload::BankTransfer(details)))
    }

    pub fn credit_card_charge(
        &self,
        amount: i64,
        description: impl Into<String>,
    ) -> CommandResult<Command> {
        let details = PaymentDetails::new(amount, description)?;
        Ok(self.build(CommandPayload::CreditCardCharge(details)))
    }

    pub fn publish_document(&self, document: DocumentRef) -> Command {
        self.build(CommandPayload::PublishDocument(document))
    }

    pub fn render_document(&self, document: DocumentRef) -> Command {
        self.build(CommandPayload::RenderDocument(document))
    }

    fn build(&self, payload: CommandPayload) -> Command {
        let descriptor = self.descriptor(payload.kind());
        Command::with_descriptor(payload, descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CommandError;
    use cmdcore_core::DocumentId;

    #[test]
    fn commands_of_one_kind_share_a_descriptor() {
        let factory = CommandFactory::default();
        let a = factory.bank_transfer(100, "Invoice #123").unwrap();
        let b = factory.bank_transfer(50, "Invoice #124").unwrap();
        assert!(Arc::ptr_eq(a.descriptor(), b.descriptor()));
        assert_eq!(factory.registry().len(), 1);
    }

    #[test]
    fn factories_sharing_a_registry_share_descriptors() {
        let registry = Arc::new(KindRegistry::new());
        let left = CommandFactory::new(registry.clone());
        let right = CommandFactory::new(registry.clone());
        let doc = DocumentRef::new(DocumentId::new(), "Release Notes");
        let a = left.publish_document(doc.clone());
        let b = right.publish_document(doc);
        assert!(Arc::ptr_eq(a.descriptor(), b.descriptor()));
    }

    #[test]
    fn invalid_amount_fails_before_interning() {
        let factory = CommandFactory::default();
        assert_eq!(
            factory.credit_card_charge(-1, "Invoice #456").unwrap_err(),
            CommandError::InvalidAmount(-1)
        );
        assert!(factory.registry().is_empty());
    }

    #[test]
    fn descriptor_permission_is_the_kind_name() {
        let descriptor = KindDescriptor::of(CommandKind::RenderDocument);
        assert_eq!(descriptor.required_permission.as_str(), "documents.render");
        assert_eq!(descriptor.label, "render document");
    }
}
