use serde::{Deserialize, Serialize};

use crate::Principal;

/// Outcome of a single authorization link (or a whole chain).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "lowercase")]
pub enum Decision {
    Allow,
    Deny(String),
}

impl Decision {
    pub fn deny(reason: impl Into<String>) -> Self {
        Self::Deny(reason.into())
    }

    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Decision::Allow => None,
            Decision::Deny(reason) => Some(reason),
        }
    }
}

/// One check in an authorization chain.
///
/// A link is a pure function of `(principal, command)`. It may log, but
/// logging never changes the decision. A link that cannot decide (malformed
/// principal, missing data) must return [`Decision::Deny`] with a reason.
pub trait AuthorizationLink<C>: Send + Sync {
    /// Name used in logs and evaluation trails.
    fn name(&self) -> &str {
        "custom"
    }

    fn check(&self, principal: &Principal, command: &C) -> Decision;
}

impl<C, F> AuthorizationLink<C> for F
where
    F: Fn(&Principal, &C) -> Decision + Send + Sync,
{
    fn check(&self, principal: &Principal, command: &C) -> Decision {
        self(principal, command)
    }
}

/// Gives any link (typically a closure) an explicit name.
pub struct NamedLink<L> {
    name: String,
    inner: L,
}

impl<L> NamedLink<L> {
    pub fn new(name: impl Into<String>, inner: L) -> Self {
        Self {
            name: name.into(),
            inner,
        }
    }
}

impl<C, L> AuthorizationLink<C> for NamedLink<L>
where
    L: AuthorizationLink<C>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, principal: &Principal, command: &C) -> Decision {
        self.inner.check(principal, command)
    }
}
