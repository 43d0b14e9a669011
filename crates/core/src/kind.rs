//! Closed set of command kinds.

use serde::{Deserialize, Serialize};

/// Tag identifying what a command does.
///
/// Every consumer (authorization links, lifecycle machines, effect dispatch)
/// matches on this exhaustively, so adding a kind is a compile-time event.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    BankTransfer,
    CreditCardCharge,
    PublishDocument,
    RenderDocument,
}

impl CommandKind {
    pub const ALL: [CommandKind; 4] = [
        CommandKind::BankTransfer,
        CommandKind::CreditCardCharge,
        CommandKind::PublishDocument,
        CommandKind::RenderDocument,
    ];

    /// Stable dotted name (e.g. "payments.bank_transfer").
    pub fn as_str(self) -> &'static str {
        match self {
            CommandKind::BankTransfer => "payments.bank_transfer",
            CommandKind::CreditCardCharge => "payments.credit_card_charge",
            CommandKind::PublishDocument => "documents.publish",
            CommandKind::RenderDocument => "documents.render",
        }
    }

    pub fn is_payment(self) -> bool {
        matches!(self, CommandKind::BankTransfer | CommandKind::CreditCardCharge)
    }

    pub fn is_document(self) -> bool {
        matches!(self, CommandKind::PublishDocument | CommandKind::RenderDocument)
    }
}

impl core::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
