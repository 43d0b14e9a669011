//! Effect collaborators: what commands actually do to the outside world.
//!
//! Implementations must complete or fail within a bounded time. A
//! network-backed gateway applies its own timeout and reports
//! [`CommandError::EffectFailed`] rather than blocking its caller.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use cmdcore_core::Amount;

use crate::{CommandResult, DocumentRef, DocumentState};

// ─────────────────────────────────────────────────────────────────────────────
// Payments
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentOperation {
    Transfer,
    TransferReversal,
    Charge,
    Refund,
}

impl PaymentOperation {
    /// Whether this operation compensates an earlier one.
    pub fn is_compensation(self) -> bool {
        matches!(self, PaymentOperation::TransferReversal | PaymentOperation::Refund)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentOperation::Transfer => "transfer",
            PaymentOperation::TransferReversal => "transfer_reversal",
            PaymentOperation::Charge => "charge",
            PaymentOperation::Refund => "refund",
        }
    }

    fn verb(self) -> &'static str {
        match self {
            PaymentOperation::Transfer => "Executing bank transfer",
            PaymentOperation::TransferReversal => "Reversing bank transfer",
            PaymentOperation::Charge => "Executing credit card payment",
            PaymentOperation::Refund => "Refunding credit card payment",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentRequest {
    pub operation: PaymentOperation,
    pub amount: Amount,
    pub description: String,
}

impl PaymentRequest {
    /// Human-readable line, e.g. "Executing bank transfer of 100 for Invoice #123".
    pub fn summary(&self) -> String {
        format!("{} of {} for {}", self.operation.verb(), self.amount, self.description)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentReceipt {
    pub reference: String,
    pub operation: PaymentOperation,
    pub amount: Amount,
}

impl PaymentReceipt {
    pub fn issue(request: &PaymentRequest) -> Self {
        Self {
            reference: format!("{}-{}", request.operation.as_str(), Uuid::now_v7()),
            operation: request.operation,
            amount: request.amount,
        }
    }
}

pub trait PaymentGateway: Send + Sync {
    fn process(&self, request: &PaymentRequest) -> CommandResult<PaymentReceipt>;
}

/// Gateway that only logs; every request succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingPaymentGateway;

impl PaymentGateway for LoggingPaymentGateway {
    fn process(&self, request: &PaymentRequest) -> CommandResult<PaymentReceipt> {
        tracing::info!(
            operation = request.operation.as_str(),
            amount = request.amount.value(),
            "{}",
            request.summary()
        );
        Ok(PaymentReceipt::issue(request))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Documents
// ─────────────────────────────────────────────────────────────────────────────

/// Publishing/rendering backend.
///
/// `state` is the document's lifecycle state at the time the command runs,
/// before any transition the command causes.
pub trait DocumentDesk: Send + Sync {
    fn publish(&self, document: &DocumentRef, state: DocumentState) -> CommandResult<()>;

    fn retract(&self, document: &DocumentRef) -> CommandResult<()>;

    fn render(&self, document: &DocumentRef, state: DocumentState) -> CommandResult<String>;
}

pub(crate) fn publish_line(document: &DocumentRef, state: DocumentState) -> String {
    match state {
        DocumentState::Draft => format!("Publishing draft document: {}", document.title),
        DocumentState::Published => format!("Document already published: {}", document.title),
    }
}

pub(crate) fn render_line(document: &DocumentRef, state: DocumentState) -> String {
    format!("Rendering {state} document: {}", document.title)
}

/// Desk that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingDocumentDesk;

impl DocumentDesk for LoggingDocumentDesk {
    fn publish(&self, document: &DocumentRef, state: DocumentState) -> CommandResult<()> {
        tracing::info!(document_id = %document.id, "{}", publish_line(document, state));
        Ok(())
    }

    fn retract(&self, document: &DocumentRef) -> CommandResult<()> {
        tracing::info!(document_id = %document.id, "Retracting document: {}", document.title);
        Ok(())
    }

    fn render(&self, document: &DocumentRef, state: DocumentState) -> CommandResult<String> {
        let line = render_line(document, state);
        tracing::info!(document_id = %document.id, "{}", line);
        Ok(line)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Context
// ─────────────────────────────────────────────────────────────────────────────

/// The collaborators a command needs to apply or revert itself.
#[derive(Clone)]
pub struct EffectContext {
    pub payments: Arc<dyn PaymentGateway>,
    pub documents: Arc<dyn DocumentDesk>,
}

impl EffectContext {
    pub fn new(payments: Arc<dyn PaymentGateway>, documents: Arc<dyn DocumentDesk>) -> Self {
        Self { payments, documents }
    }

    /// Context whose effects only log.
    pub fn logging() -> Self {
        Self::new(Arc::new(LoggingPaymentGateway), Arc::new(LoggingDocumentDesk))
    }
}

impl Default for EffectContext {
    fn default() -> Self {
        Self::logging()
    }
}

impl core::fmt::Debug for EffectContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EffectContext").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdcore_core::DocumentId;

    #[test]
    fn payment_summary_matches_operation() {
        let request = PaymentRequest {
            operation: PaymentOperation::Refund,
            amount: Amount::new(200).unwrap(),
            description: "Invoice #456".to_string(),
        };
        assert_eq!(request.summary(), "Refunding credit card payment of 200 for Invoice #456");
        assert!(request.operation.is_compensation());
    }

    #[test]
    fn receipts_reference_their_operation() {
        let request = PaymentRequest {
            operation: PaymentOperation::Transfer,
            amount: Amount::new(100).unwrap(),
            description: "Invoice #123".to_string(),
        };
        let receipt = LoggingPaymentGateway.process(&request).unwrap();
        assert!(receipt.reference.starts_with("transfer-"));
        assert_eq!(receipt.amount.value(), 100);
    }

    #[test]
    fn publish_line_reflects_state() {
        let doc = DocumentRef::new(DocumentId::new(), "My First Document");
        assert_eq!(
            publish_line(&doc, DocumentState::Draft),
            "Publishing draft document: My First Document"
        );
        assert_eq!(
            publish_line(&doc, DocumentState::Published),
            "Document already published: My First Document"
        );
        assert_eq!(
            LoggingDocumentDesk.render(&doc, DocumentState::Published).unwrap(),
            "Rendering published document: My First Document"
        );
    }
}
