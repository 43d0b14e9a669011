//! `cmdcore-auth`: pluggable authorization chain (pure, no IO).
//!
//! A chain is an ordered list of links; each link inspects the acting
//! [`Principal`] and the command and renders a [`Decision`]. The first deny
//! wins and stops evaluation.

pub mod authorize;
pub mod chain;
pub mod checks;
pub mod link;
pub mod permissions;
pub mod principal;
pub mod roles;

pub use authorize::{AuthzError, CommandAuthorization, authorize};
pub use chain::{AuthorizationChain, ChainEvaluation, LinkOutcome};
pub use checks::{PasswordCheck, PermissionCheck, RoleCheck, TwoFactorCheck};
pub use link::{AuthorizationLink, Decision, NamedLink};
pub use permissions::Permission;
pub use principal::{Principal, PrincipalId, Secret};
pub use roles::Role;
