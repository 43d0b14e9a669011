//! In-memory effect backends for tests/dev.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

use cmdcore_core::DocumentId;

use crate::effects::{publish_line, render_line};
use crate::{
    CommandError, CommandResult, DocumentDesk, DocumentRef, DocumentState, PaymentGateway,
    PaymentOperation, PaymentReceipt, PaymentRequest,
};

/// Payment gateway that keeps a ledger of accepted requests.
///
/// - `with_limit(n)`: transfers and charges above `n` are declined
/// - `decline_compensations(true)`: reversals and refunds are declined
#[derive(Debug, Default)]
pub struct InMemoryPaymentGateway {
    ledger: Mutex<Vec<PaymentRequest>>,
    limit: Option<u64>,
    decline_compensations: AtomicBool,
}

impl InMemoryPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: u64) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn decline_compensations(&self, decline: bool) {
        self.decline_compensations.store(decline, Ordering::SeqCst);
    }

    /// Accepted requests, in order.
    pub fn ledger(&self) -> Vec<PaymentRequest> {
        self.ledger
            .lock()
            .map(|ledger| ledger.clone())
            .unwrap_or_default()
    }

    pub fn count(&self, operation: PaymentOperation) -> usize {
        self.ledger()
            .iter()
            .filter(|r| r.operation == operation)
            .count()
    }
}

impl PaymentGateway for InMemoryPaymentGateway {
    fn process(&self, request: &PaymentRequest) -> CommandResult<PaymentReceipt> {
        if request.operation.is_compensation() {
            if self.decline_compensations.load(Ordering::SeqCst) {
                return Err(CommandError::declined(format!(
                    "{} rejected by gateway",
                    request.operation.as_str()
                )));
            }
        } else if let Some(limit) = self.limit {
            if request.amount.value() > limit {
                return Err(CommandError::declined(format!(
                    "amount {} exceeds limit {limit}",
                    request.amount
                )));
            }
        }

        let mut ledger = self
            .ledger
            .lock()
            .map_err(|_| CommandError::effect("payment ledger lock poisoned"))?;
        ledger.push(request.clone());
        tracing::debug!(operation = request.operation.as_str(), "{}", request.summary());
        Ok(PaymentReceipt::issue(request))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeskAction {
    Published,
    Retracted,
    Rendered,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeskEntry {
    pub action: DeskAction,
    pub document_id: DocumentId,
    pub line: String,
}

/// Document desk that records every action.
#[derive(Debug, Default)]
pub struct InMemoryDocumentDesk {
    entries: Mutex<Vec<DeskEntry>>,
}

impl InMemoryDocumentDesk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<DeskEntry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Whether the latest publish/retract for `id` was a publish.
    pub fn is_published(&self, id: DocumentId) -> bool {
        self.entries()
            .iter()
            .rev()
            .filter(|e| e.document_id == id)
            .find_map(|e| match e.action {
                DeskAction::Published => Some(true),
                DeskAction::Retracted => Some(false),
                DeskAction::Rendered => None,
            })
            .unwrap_or(false)
    }

    fn record(
        &self,
        action: DeskAction,
        document: &DocumentRef,
        line: String,
    ) -> CommandResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| CommandError::effect("document desk lock poisoned"))?;
        entries.push(DeskEntry {
            action,
            document_id: document.id,
            line,
        });
        Ok(())
    }
}

impl DocumentDesk for InMemoryDocumentDesk {
    fn publish(&self, document: &DocumentRef, state: DocumentState) -> CommandResult<()> {
        self.record(DeskAction::Published, document, publish_line(document, state))
    }

    fn retract(&self, document: &DocumentRef) -> CommandResult<()> {
        self.record(
            DeskAction::Retracted,
            document,
            format!("Retracting document: {}", document.title),
        )
    }

    fn render(&self, document: &DocumentRef, state: DocumentState) -> CommandResult<String> {
        let line = render_line(document, state);
        self.record(DeskAction::Rendered, document, line.clone())?;
        Ok(line)
    }
}
