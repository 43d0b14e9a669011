//! Command execution pipeline.
//!
//! ```text
//! submit(command, principal, target)
//!   ↓
//! 1. Authorize (chain; first deny aborts with Unauthorized)
//!   ↓
//! 2. Check legality against the target's lifecycle (IllegalForState)
//!   ↓
//! 3. Apply (command's own result), transition the target, record in history
//!   ↓
//! 4. Notify "applied"
//!
//! undo()
//!   ↓
//! 1. Pop the most recent command (NothingToUndo when empty)
//!   ↓
//! 2. Revert
//!   ↓
//! 3. Notify "reverted"
//! ```
//!
//! Steps 1 to 3 of `submit` and steps 1 and 2 of `undo` run as one critical
//! section under the history lock. Concurrent callers on the same processor
//! are serialized; there is no cancellation mid-apply. Notification happens
//! after the lock is released, so listeners may call back into the processor.

use std::sync::{Arc, Mutex, MutexGuard};

use cmdcore_auth::{AuthorizationChain, Decision, Principal};
use cmdcore_commands::{ApplyContext, Command, CommandOutput, EffectContext, TargetState};
use cmdcore_core::LifecycleStateMachine;
use cmdcore_events::{Event, Notification, NotificationBus};

use crate::{CommandDescriptor, History, ProcessorConfig, ProcessorError};

/// Stage of the submission/undo pipeline (reported in logs).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Authorizing,
    CheckingLegality,
    Applying,
    Recorded,
    Reverting,
}

impl core::fmt::Display for Stage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Stage::Idle => "idle",
            Stage::Authorizing => "authorizing",
            Stage::CheckingLegality => "checking_legality",
            Stage::Applying => "applying",
            Stage::Recorded => "recorded",
            Stage::Reverting => "reverting",
        })
    }
}

/// Explicitly constructed, owned processor. No global state: independent
/// processors (one per document, one per account) coexist freely.
///
/// Notifications from concurrent callers are published in the order their
/// callers leave the critical section, which may differ from history order.
pub struct CommandProcessor {
    chain: AuthorizationChain<Command>,
    effects: EffectContext,
    history: Mutex<History>,
    bus: Option<Arc<dyn NotificationBus<Notification>>>,
}

impl CommandProcessor {
    pub fn new(chain: AuthorizationChain<Command>, effects: EffectContext) -> Self {
        Self::with_config(chain, effects, ProcessorConfig::default())
    }

    pub fn with_config(
        chain: AuthorizationChain<Command>,
        effects: EffectContext,
        config: ProcessorConfig,
    ) -> Self {
        Self {
            chain,
            effects,
            history: Mutex::new(History::new(config.history_limit)),
            bus: None,
        }
    }

    /// Attach a notification bus (shared, not owned).
    pub fn with_bus(mut self, bus: Arc<dyn NotificationBus<Notification>>) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn chain(&self) -> &AuthorizationChain<Command> {
        &self.chain
    }

    pub fn effects(&self) -> &EffectContext {
        &self.effects
    }

    /// Authorize, check legality, apply and record atomically, then notify.
    ///
    /// On any failure, history and `target` are left exactly as they were.
    /// The command is consumed either way; clone it first to retry after a
    /// recoverable rejection.
    pub fn submit<L>(
        &self,
        mut command: Command,
        principal: &Principal,
        target: &mut L,
    ) -> Result<CommandOutput, ProcessorError>
    where
        L: LifecycleStateMachine,
        L::State: Into<TargetState>,
    {
        let mut history = self.lock_history()?;
        let command_id = command.id();
        let kind = command.kind();

        tracing::debug!(%command_id, %kind, stage = %Stage::Authorizing);
        if let Decision::Deny(reason) = self.chain.evaluate(principal, &command) {
            tracing::info!(
                %command_id,
                %kind,
                principal_id = %principal.principal_id,
                %reason,
                "submission rejected: unauthorized"
            );
            return Err(ProcessorError::Unauthorized(reason));
        }

        tracing::debug!(%command_id, %kind, stage = %Stage::CheckingLegality);
        let state = target.current_state();
        if !target.is_legal(kind) {
            tracing::info!(%command_id, %kind, %state, "submission rejected: illegal for state");
            return Err(ProcessorError::IllegalForState {
                state: state.to_string(),
                kind,
            });
        }

        tracing::debug!(%command_id, %kind, stage = %Stage::Applying);
        if history.was_applied(command_id) {
            tracing::info!(%command_id, %kind, "submission rejected: already applied");
            return Err(ProcessorError::AlreadyApplied);
        }
        let output = command
            .apply(ApplyContext::new(&self.effects, state))
            .map_err(|err| {
                tracing::warn!(%command_id, %kind, error = %err, "apply failed");
                ProcessorError::from(err)
            })?;

        let new_state = target.transition(kind);
        let description = command.describe();
        let evicted = history.push(command);
        if evicted > 0 {
            tracing::debug!(evicted, "history limit reached; oldest entries dropped");
        }
        drop(history);
        tracing::info!(
            %command_id,
            %kind,
            stage = %Stage::Recorded,
            state = %new_state,
            "applied: {description}"
        );

        self.notify(Notification::applied(command_id, kind, description));
        tracing::debug!(%command_id, stage = %Stage::Idle);
        Ok(output)
    }

    /// Submit queued commands in order against one target.
    ///
    /// Each command goes through [`CommandProcessor::submit`] on its own.
    /// The first failure stops the batch: commands before it stay applied
    /// and undoable, the failing one and the rest are dropped.
    pub fn submit_all<L, I>(
        &self,
        commands: I,
        principal: &Principal,
        target: &mut L,
    ) -> Result<Vec<CommandOutput>, ProcessorError>
    where
        L: LifecycleStateMachine,
        L::State: Into<TargetState>,
        I: IntoIterator<Item = Command>,
    {
        let mut outputs = Vec::new();
        for command in commands {
            let command_id = command.id();
            match self.submit(command, principal, target) {
                Ok(output) => outputs.push(output),
                Err(err) => {
                    tracing::warn!(
                        %command_id,
                        position = outputs.len(),
                        error = %err,
                        "batch stopped"
                    );
                    return Err(err);
                }
            }
        }
        Ok(outputs)
    }

    /// Revert and discard the most recently applied command.
    ///
    /// There is no redo. If the revert itself fails, the command is still
    /// discarded and the failure is returned.
    pub fn undo(&self) -> Result<CommandOutput, ProcessorError> {
        let mut history = self.lock_history()?;
        let Some(mut command) = history.pop() else {
            tracing::info!("undo requested with empty history");
            return Err(ProcessorError::NothingToUndo);
        };
        let command_id = command.id();
        let kind = command.kind();

        tracing::debug!(%command_id, %kind, stage = %Stage::Reverting);
        match command.revert(&self.effects) {
            Ok(output) => {
                history.forget(command_id);
                drop(history);
                let description = command.describe();
                tracing::info!(%command_id, %kind, "reverted: {description}");
                self.notify(Notification::reverted(command_id, kind, description));
                Ok(output)
            }
            Err(err) => {
                // Still applied as far as anyone knows; its id stays guarded.
                drop(history);
                tracing::error!(
                    %command_id,
                    %kind,
                    error = %err,
                    "revert failed; command discarded from history: {}",
                    command.describe()
                );
                Err(err.into())
            }
        }
    }

    /// Snapshot of history, oldest first.
    pub fn history(&self) -> Vec<CommandDescriptor> {
        // Read-only snapshot; a poisoned lock still holds a readable history.
        self.history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .descriptors()
    }

    pub fn history_len(&self) -> usize {
        self.history.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn lock_history(&self) -> Result<MutexGuard<'_, History>, ProcessorError> {
        self.history.lock().map_err(|_| ProcessorError::LockPoisoned)
    }

    fn notify(&self, notification: Notification) {
        let Some(bus) = &self.bus else {
            return;
        };
        let event_type = notification.event_type();
        let version = notification.version();
        let command_id = notification.command_id();
        if let Err(err) = bus.publish(notification) {
            tracing::warn!(
                %command_id,
                event_type,
                version,
                error = %err,
                "failed to publish notification"
            );
        }
    }
}

impl core::fmt::Debug for CommandProcessor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CommandProcessor")
            .field("chain", &self.chain)
            .field("history_len", &self.history_len())
            .field("has_bus", &self.bus.is_some())
            .finish()
    }
}
