//! Walks through the payment, authorization and publishing scenarios.

use std::sync::Arc;

use anyhow::Context;

use cmdcore_auth::{AuthorizationChain, PasswordCheck, Principal, RoleCheck, TwoFactorCheck};
use cmdcore_commands::{CommandFactory, Document, EffectContext, KindRegistry};
use cmdcore_core::OpenLifecycle;
use cmdcore_events::{Event, InMemoryNotificationBus, Notification, NotificationBus};
use cmdcore_processor::{CommandProcessor, ProcessorConfig};

fn main() -> anyhow::Result<()> {
    cmdcore_observability::init();

    let config = ProcessorConfig::from_env().context("loading processor configuration")?;
    let factory = CommandFactory::new(Arc::new(KindRegistry::new()));
    let bus = Arc::new(InMemoryNotificationBus::<Notification>::new());
    let audit = bus.subscribe(Arc::new(|n: &Notification| {
        match serde_json::to_string(n) {
            Ok(line) => tracing::info!(target: "audit", event = n.event_type(), "{line}"),
            Err(err) => tracing::warn!(error = %err, "could not encode notification"),
        }
    }));

    // Payments: queue a transfer and a card charge, run them, undo the charge.
    let payments = open_processor(config).with_bus(bus.clone());
    let principal = Principal::with_role("user");
    let queue = [
        factory.bank_transfer(100, "Invoice #123")?,
        factory.credit_card_charge(200, "Invoice #456")?,
    ];
    payments.submit_all(queue, &principal, &mut OpenLifecycle)?;
    payments.undo()?;
    tracing::info!(history = ?payments.history(), "payment history after undo");

    // Authorization: a principal that only passes the role check.
    let guarded = CommandProcessor::with_config(
        AuthorizationChain::new()
            .with_link(RoleCheck::require("user"))
            .with_link(PasswordCheck::new("correct horse"))
            .with_link(TwoFactorCheck::new("424242")),
        EffectContext::logging(),
        config,
    );
    let command = factory.bank_transfer(100, "Invoice #123")?;
    let evaluation = guarded.chain().explain(&principal, &command);
    tracing::info!(evaluation = %serde_json::to_string(&evaluation)?, "authorization trail");
    if let Err(err) = guarded.submit(command, &principal, &mut OpenLifecycle) {
        tracing::info!(kind = err.kind(), "{err}");
    }

    // Documents: render, publish, render, publish again.
    let documents = open_processor(config).with_bus(bus.clone());
    let mut doc = Document::new("My First Document");
    let queue = [
        factory.render_document(doc.reference()),
        factory.publish_document(doc.reference()),
        factory.render_document(doc.reference()),
        factory.publish_document(doc.reference()),
    ];
    documents.submit_all(queue, &principal, doc.lifecycle_mut())?;
    tracing::info!(state = %doc.state(), "document lifecycle");

    audit.unsubscribe();
    Ok(())
}

fn open_processor(config: ProcessorConfig) -> CommandProcessor {
    CommandProcessor::with_config(AuthorizationChain::new(), EffectContext::logging(), config)
}
