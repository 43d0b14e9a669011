//! Stack of applied commands.

use std::collections::{HashSet, VecDeque};
use std::num::NonZeroUsize;

use chrono::{DateTime, Utc};
use serde::Serialize;

use cmdcore_commands::Command;
use cmdcore_core::{CommandId, CommandKind};

/// Read-only view of a history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandDescriptor {
    pub id: CommandId,
    pub kind: CommandKind,
    pub description: String,
    pub applied_at: DateTime<Utc>,
}

#[derive(Debug)]
struct Entry {
    command: Command,
    applied_at: DateTime<Utc>,
}

/// Applied commands in application order.
///
/// Only the most recent entry can be taken back out (`pop`). Every entry is
/// an applied command. With a limit, the oldest entries fall off once the
/// limit is exceeded and can no longer be undone.
///
/// Ids of applied commands are tracked separately from the entries: an
/// evicted command stays applied, so its id stays known until a successful
/// revert `forget`s it.
#[derive(Debug, Default)]
pub struct History {
    entries: VecDeque<Entry>,
    applied: HashSet<CommandId>,
    limit: Option<NonZeroUsize>,
}

impl History {
    pub fn new(limit: Option<NonZeroUsize>) -> Self {
        Self {
            entries: VecDeque::new(),
            applied: HashSet::new(),
            limit,
        }
    }

    /// Record an applied command. Returns how many old entries were evicted.
    pub fn push(&mut self, command: Command) -> usize {
        debug_assert!(command.is_applied(), "history only records applied commands");
        self.applied.insert(command.id());
        self.entries.push_back(Entry {
            command,
            applied_at: Utc::now(),
        });

        let mut evicted = 0;
        if let Some(limit) = self.limit {
            while self.entries.len() > limit.get() {
                self.entries.pop_front();
                evicted += 1;
            }
        }
        evicted
    }

    /// Take the most recent entry out. Its id stays applied until
    /// [`History::forget`].
    pub fn pop(&mut self) -> Option<Command> {
        self.entries.pop_back().map(|e| e.command)
    }

    /// Drop `id` from the applied set once its command has been reverted.
    pub fn forget(&mut self, id: CommandId) -> bool {
        self.applied.remove(&id)
    }

    pub fn last(&self) -> Option<CommandDescriptor> {
        self.entries.back().map(describe)
    }

    /// Whether a command with this id was applied and not reverted, evicted
    /// or not.
    pub fn was_applied(&self, id: CommandId) -> bool {
        self.applied.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot, oldest first.
    pub fn descriptors(&self) -> Vec<CommandDescriptor> {
        self.entries.iter().map(describe).collect()
    }
}

fn describe(entry: &Entry) -> CommandDescriptor {
    CommandDescriptor {
        id: entry.command.id(),
        kind: entry.command.kind(),
        description: entry.command.describe(),
        applied_at: entry.applied_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdcore_commands::{ApplyContext, EffectContext, TargetState};

    fn applied_transfer(amount: i64) -> Command {
        let mut cmd = Command::bank_transfer(amount, format!("Invoice #{amount}")).unwrap();
        cmd.apply(ApplyContext::new(&EffectContext::logging(), TargetState::Open))
            .unwrap();
        cmd
    }

    #[test]
    fn pop_returns_most_recent_first() {
        let mut history = History::default();
        let first = applied_transfer(1);
        let second = applied_transfer(2);
        let (first_id, second_id) = (first.id(), second.id());
        history.push(first);
        history.push(second);

        assert_eq!(history.last().map(|d| d.id), Some(second_id));
        assert_eq!(history.pop().map(|c| c.id()), Some(second_id));
        assert_eq!(history.pop().map(|c| c.id()), Some(first_id));
        assert!(history.pop().is_none());
    }

    #[test]
    fn limit_evicts_oldest_entries() {
        let mut history = History::new(NonZeroUsize::new(2));
        let oldest = applied_transfer(1);
        let oldest_id = oldest.id();
        assert_eq!(history.push(oldest), 0);
        assert_eq!(history.push(applied_transfer(2)), 0);
        assert_eq!(history.push(applied_transfer(3)), 1);

        assert_eq!(history.len(), 2);
        assert!(history.descriptors().iter().all(|d| d.id != oldest_id));
        assert!(history.was_applied(oldest_id));
        let descriptions: Vec<_> = history
            .descriptors()
            .into_iter()
            .map(|d| d.description)
            .collect();
        assert_eq!(
            descriptions,
            vec!["bank transfer of 2 for Invoice #2", "bank transfer of 3 for Invoice #3"]
        );
    }

    #[test]
    fn popped_ids_stay_applied_until_forgotten() {
        let mut history = History::default();
        let cmd = applied_transfer(5);
        let id = cmd.id();
        history.push(cmd);

        assert!(history.pop().is_some());
        assert!(history.was_applied(id));
        assert!(history.forget(id));
        assert!(!history.was_applied(id));
    }
}
