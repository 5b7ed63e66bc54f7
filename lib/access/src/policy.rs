//! Access policy and the per-request gate decision.
//!
//! The policy is built once at startup from configuration and the
//! allowlist, and is shared read-only by every request.

use serde::{Deserialize, Serialize};

use crate::allowlist::EmailAllowlist;
use crate::path::PathPattern;
use crate::session::Session;

/// Path rules as they appear in configuration.
///
/// Each field is a comma-separated list of path patterns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Prefixes that require an authenticated, allowlisted session.
    #[serde(default)]
    pub auth_required: String,
    /// Prefixes exempted from `auth_required`.
    #[serde(default)]
    pub whitelist: String,
}

/// Outcome of evaluating the policy for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Forward the request unchanged.
    Pass,
    /// No session; send the client through login first.
    RequireLogin,
    /// A session exists but its email is not allowlisted.
    Forbidden { email: String },
}

/// Static access rules: protected prefixes, exemptions, and the allowlist.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    auth_required: Vec<PathPattern>,
    whitelist: Vec<PathPattern>,
    allowed_emails: EmailAllowlist,
}

impl AccessPolicy {
    /// Creates a policy from its parts.
    #[must_use]
    pub fn new(
        auth_required: Vec<PathPattern>,
        whitelist: Vec<PathPattern>,
        allowed_emails: EmailAllowlist,
    ) -> Self {
        Self {
            auth_required,
            whitelist,
            allowed_emails,
        }
    }

    /// Creates a policy from configuration and a loaded allowlist.
    #[must_use]
    pub fn from_config(config: &PolicyConfig, allowed_emails: EmailAllowlist) -> Self {
        Self::new(
            PathPattern::parse_list(&config.auth_required),
            PathPattern::parse_list(&config.whitelist),
            allowed_emails,
        )
    }

    /// Returns true if `path` is exempted by a whitelist entry.
    #[must_use]
    pub fn is_whitelisted(&self, path: &str) -> bool {
        self.whitelist.iter().any(|pattern| pattern.matches(path))
    }

    /// Decides whether a request for `path` may pass.
    ///
    /// Rules are evaluated in order. A rule whose prefix matches and that is
    /// not exempted requires a session, then an allowlisted email; the first
    /// failing rule decides. Whitelisted paths always pass.
    #[must_use]
    pub fn evaluate(&self, path: &str, session: Option<&Session>) -> GateDecision {
        for rule in &self.auth_required {
            if !rule.matches(path) || self.is_whitelisted(path) {
                continue;
            }

            let Some(session) = session else {
                return GateDecision::RequireLogin;
            };

            if !self.allowed_emails.contains(session.email()) {
                return GateDecision::Forbidden {
                    email: session.email().to_string(),
                };
            }
        }

        GateDecision::Pass
    }
}
