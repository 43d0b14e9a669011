//! Ordered authorization chain.
//!
//! Links run strictly in insertion order, each receiving the same
//! `(principal, command)` pair. The first [`Decision::Deny`] short-circuits:
//! later links are not evaluated. An empty chain allows everything.

use serde::Serialize;

use crate::{AuthorizationLink, Decision, Principal};

/// Decision of one evaluated link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkOutcome {
    pub link: String,
    pub decision: Decision,
}

/// Full trail of a chain evaluation (for audit and debugging).
///
/// Only links that actually ran appear in `outcomes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainEvaluation {
    pub decision: Decision,
    pub outcomes: Vec<LinkOutcome>,
}

impl ChainEvaluation {
    /// Name of the link that denied, if any.
    pub fn denied_by(&self) -> Option<&str> {
        match self.decision {
            Decision::Allow => None,
            Decision::Deny(_) => self.outcomes.last().map(|o| o.link.as_str()),
        }
    }
}

pub struct AuthorizationChain<C> {
    links: Vec<Box<dyn AuthorizationLink<C>>>,
}

impl<C> AuthorizationChain<C> {
    pub fn new() -> Self {
        Self { links: Vec::new() }
    }

    /// Append a link (builder style).
    pub fn with_link(mut self, link: impl AuthorizationLink<C> + 'static) -> Self {
        self.push(link);
        self
    }

    pub fn push(&mut self, link: impl AuthorizationLink<C> + 'static) {
        self.links.push(Box::new(link));
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Link names, in evaluation order.
    pub fn link_names(&self) -> Vec<&str> {
        self.links.iter().map(|l| l.name()).collect()
    }

    pub fn evaluate(&self, principal: &Principal, command: &C) -> Decision {
        for link in &self.links {
            let decision = link.check(principal, command);
            if let Decision::Deny(reason) = &decision {
                tracing::info!(link = link.name(), reason = %reason, "authorization denied");
                return decision;
            }
        }
        Decision::Allow
    }

    /// Like [`evaluate`](Self::evaluate), but records every link that ran.
    pub fn explain(&self, principal: &Principal, command: &C) -> ChainEvaluation {
        let mut outcomes = Vec::with_capacity(self.links.len());
        for link in &self.links {
            let decision = link.check(principal, command);
            let denied = !decision.is_allow();
            outcomes.push(LinkOutcome {
                link: link.name().to_string(),
                decision: decision.clone(),
            });
            if denied {
                return ChainEvaluation { decision, outcomes };
            }
        }
        ChainEvaluation {
            decision: Decision::Allow,
            outcomes,
        }
    }
}

impl<C> Default for AuthorizationChain<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> core::fmt::Debug for AuthorizationChain<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuthorizationChain")
            .field("links", &self.link_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::NamedLink;

    fn counting(
        name: &'static str,
        decision: Decision,
        calls: Arc<AtomicUsize>,
    ) -> impl AuthorizationLink<()> {
        NamedLink::new(name, move |_: &Principal, _: &()| {
            calls.fetch_add(1, Ordering::SeqCst);
            decision.clone()
        })
    }

    #[test]
    fn empty_chain_allows() {
        let chain = AuthorizationChain::<()>::new();
        assert_eq!(chain.evaluate(&Principal::new(), &()), Decision::Allow);
        assert!(chain.explain(&Principal::new(), &()).outcomes.is_empty());
    }

    #[test]
    fn first_deny_short_circuits() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let third = Arc::new(AtomicUsize::new(0));
        let chain = AuthorizationChain::new()
            .with_link(counting("a", Decision::Allow, first.clone()))
            .with_link(counting("b", Decision::deny("nope"), second.clone()))
            .with_link(counting("c", Decision::Allow, third.clone()));

        assert_eq!(chain.evaluate(&Principal::new(), &()), Decision::deny("nope"));
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 1);
        assert_eq!(third.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn explain_lists_only_links_that_ran() {
        let calls = Arc::new(AtomicUsize::new(0));
        let chain = AuthorizationChain::new()
            .with_link(counting("a", Decision::Allow, calls.clone()))
            .with_link(counting("b", Decision::deny("nope"), calls.clone()))
            .with_link(counting("c", Decision::Allow, calls.clone()));

        let evaluation = chain.explain(&Principal::new(), &());
        let names: Vec<_> = evaluation.outcomes.iter().map(|o| o.link.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(evaluation.denied_by(), Some("b"));
        assert_eq!(chain.link_names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn all_allow_yields_allow() {
        let calls = Arc::new(AtomicUsize::new(0));
        let chain = AuthorizationChain::new()
            .with_link(counting("a", Decision::Allow, calls.clone()))
            .with_link(counting("b", Decision::Allow, calls.clone()));

        let evaluation = chain.explain(&Principal::new(), &());
        assert_eq!(evaluation.decision, Decision::Allow);
        assert_eq!(evaluation.denied_by(), None);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
