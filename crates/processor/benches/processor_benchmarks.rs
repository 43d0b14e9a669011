use criterion::{Criterion, black_box, criterion_group, criterion_main};

use cmdcore_auth::{AuthorizationChain, PasswordCheck, Principal, RoleCheck};
use cmdcore_commands::{Command, Document, EffectContext};
use cmdcore_core::OpenLifecycle;
use cmdcore_processor::{CommandProcessor, ProcessorConfig};

fn submit_and_undo(c: &mut Criterion) {
    let chain = AuthorizationChain::new()
        .with_link(RoleCheck::require("user"))
        .with_link(PasswordCheck::new("secret"));
    let processor = CommandProcessor::with_config(
        chain,
        EffectContext::logging(),
        ProcessorConfig::default().with_history_limit(1024),
    );
    let principal = Principal::with_role("user").with_password("secret");

    c.bench_function("submit_undo_bank_transfer", |b| {
        b.iter(|| {
            let cmd = Command::bank_transfer(100, "Invoice #123").unwrap();
            processor
                .submit(black_box(cmd), &principal, &mut OpenLifecycle)
                .unwrap();
            processor.undo().unwrap();
        })
    });

    c.bench_function("publish_document_repeatedly", |b| {
        let mut doc = Document::new("Benchmark");
        b.iter(|| {
            let cmd = Command::publish_document(doc.reference());
            processor
                .submit(black_box(cmd), &principal, doc.lifecycle_mut())
                .unwrap();
        })
    });
}

criterion_group!(benches, submit_and_undo);
criterion_main!(benches);
