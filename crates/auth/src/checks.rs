//! Built-in authorization links.

use crate::{AuthorizationLink, CommandAuthorization, Decision, Principal, Role, Secret, authorize};

// ─────────────────────────────────────────────────────────────────────────────
// Role
// ─────────────────────────────────────────────────────────────────────────────

/// Requires the principal to hold a given role.
#[derive(Debug, Clone)]
pub struct RoleCheck {
    role: Role,
}

impl RoleCheck {
    pub fn require(role: impl Into<Role>) -> Self {
        Self { role: role.into() }
    }
}

impl<C> AuthorizationLink<C> for RoleCheck {
    fn name(&self) -> &str {
        "role_check"
    }

    fn check(&self, principal: &Principal, _command: &C) -> Decision {
        if principal.roles.is_empty() {
            return Decision::deny("principal carries no roles");
        }
        if principal.has_role(self.role.as_str()) {
            Decision::Allow
        } else {
            Decision::deny(format!("{} role required", self.role))
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Credentials
// ─────────────────────────────────────────────────────────────────────────────

type Verifier = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// Requires a password proof accepted by the configured verifier.
pub struct PasswordCheck {
    verify: Verifier,
}

impl PasswordCheck {
    /// Accept exactly `expected`.
    pub fn new(expected: impl Into<String>) -> Self {
        let expected = Secret::new(expected);
        Self::with_verifier(move |candidate| candidate == expected.expose())
    }

    pub fn with_verifier(verify: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self {
            verify: Box::new(verify),
        }
    }
}

impl<C> AuthorizationLink<C> for PasswordCheck {
    fn name(&self) -> &str {
        "password_check"
    }

    fn check(&self, principal: &Principal, _command: &C) -> Decision {
        verify_proof(
            principal.password.as_ref(),
            &self.verify,
            "password required",
            "invalid password",
        )
    }
}

/// Requires a second-factor proof accepted by the configured verifier.
pub struct TwoFactorCheck {
    verify: Verifier,
}

impl TwoFactorCheck {
    /// Accept exactly `expected` (e.g. a fixed code in tests).
    pub fn new(expected: impl Into<String>) -> Self {
        let expected = Secret::new(expected);
        Self::with_verifier(move |candidate| candidate == expected.expose())
    }

    pub fn with_verifier(verify: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self {
            verify: Box::new(verify),
        }
    }
}

impl<C> AuthorizationLink<C> for TwoFactorCheck {
    fn name(&self) -> &str {
        "two_factor_check"
    }

    fn check(&self, principal: &Principal, _command: &C) -> Decision {
        verify_proof(
            principal.second_factor.as_ref(),
            &self.verify,
            "two-factor authentication required",
            "invalid second factor",
        )
    }
}

fn verify_proof(
    proof: Option<&Secret>,
    verify: &Verifier,
    missing: &str,
    invalid: &str,
) -> Decision {
    match proof {
        None => Decision::deny(missing),
        Some(secret) if secret.expose().is_empty() => Decision::deny(missing),
        Some(secret) if verify(secret.expose()) => Decision::Allow,
        Some(_) => Decision::deny(invalid),
    }
}

impl core::fmt::Debug for PasswordCheck {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("PasswordCheck")
    }
}

impl core::fmt::Debug for TwoFactorCheck {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("TwoFactorCheck")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Permissions
// ─────────────────────────────────────────────────────────────────────────────

/// Requires every permission the command declares via [`CommandAuthorization`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissionCheck;

impl<C> AuthorizationLink<C> for PermissionCheck
where
    C: CommandAuthorization,
{
    fn name(&self) -> &str {
        "permission_check"
    }

    fn check(&self, principal: &Principal, command: &C) -> Decision {
        for required in command.required_permissions() {
            if let Err(err) = authorize(principal, &required) {
                return Decision::deny(err.to_string());
            }
        }
        Decision::Allow
    }
}
