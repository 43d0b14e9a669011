use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cmdcore_core::{CommandId, CommandKind};

use crate::Event;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Applied,
    Reverted,
}

/// Fact emitted after a command was applied or reverted by a processor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub event_kind: NotificationKind,
    pub command_id: CommandId,
    pub command_kind: CommandKind,
    pub command_description: String,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    pub fn applied(
        command_id: CommandId,
        command_kind: CommandKind,
        command_description: impl Into<String>,
    ) -> Self {
        Self::now(NotificationKind::Applied, command_id, command_kind, command_description)
    }

    pub fn reverted(
        command_id: CommandId,
        command_kind: CommandKind,
        command_description: impl Into<String>,
    ) -> Self {
        Self::now(NotificationKind::Reverted, command_id, command_kind, command_description)
    }

    fn now(
        event_kind: NotificationKind,
        command_id: CommandId,
        command_kind: CommandKind,
        command_description: impl Into<String>,
    ) -> Self {
        Self {
            event_kind,
            command_id,
            command_kind,
            command_description: command_description.into(),
            timestamp: Utc::now(),
        }
    }
}

impl Event for Notification {
    fn event_type(&self) -> &'static str {
        match self.event_kind {
            NotificationKind::Applied => "command.applied",
            NotificationKind::Reverted => "command.reverted",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn command_id(&self) -> CommandId {
        self.command_id
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_follows_kind() {
        let id = CommandId::new();
        let applied = Notification::applied(id, CommandKind::BankTransfer, "transfer");
        let reverted = Notification::reverted(id, CommandKind::BankTransfer, "transfer");
        assert_eq!(applied.event_type(), "command.applied");
        assert_eq!(reverted.event_type(), "command.reverted");
        assert!(reverted.occurred_at() >= applied.occurred_at());
    }

    #[test]
    fn serializes_with_lowercase_event_kind() {
        let n = Notification::applied(CommandId::new(), CommandKind::PublishDocument, "publish");
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["event_kind"], "applied");
        assert_eq!(json["command_kind"], "publish_document");
        assert_eq!(json["command_description"], "publish");
    }
}
