//! Authentication module for the login-gate server.
//!
//! This module provides:
//! - The identity provider client (token exchange and userinfo)
//! - Cookie helpers for the session and pending-login cookies
//! - Login, callback, and logout handlers
//! - The dispatch middleware that gates every request
//!
//! # Request Flow
//!
//! The middleware intercepts the callback and logout paths, starts a login
//! on the login path, and otherwise evaluates the [`AccessPolicy`] against
//! the session cookie. Requests that pass reach the wrapped upstream
//! unchanged.

pub mod cookies;
pub mod idp;
pub mod middleware;
pub mod routes;

#[cfg(test)]
mod tests;

use axum::http::HeaderMap;
use axum_extra::extract::cookie::{Key, SignedCookieJar};
use login_gate_access::{AccessPolicy, Provider};
use std::sync::Arc;

use crate::config::SessionConfig;

pub use cookies::CookieSettings;
pub use idp::{IdentityProvider, IdpClient, IdpError};
pub use middleware::dispatch;

/// Shared gateway state, read-only after startup.
pub struct GatewayState {
    /// Validated identity provider configuration.
    pub provider: Provider,
    /// Path rules and the email allowlist.
    pub policy: AccessPolicy,
    /// Client for the token and userinfo endpoints.
    pub idp: Arc<dyn IdentityProvider>,
    /// Key that signs the core cookies.
    pub cookie_key: Key,
    /// Attributes for every cookie written.
    pub cookie_settings: CookieSettings,
}

impl GatewayState {
    /// Creates a new gateway state.
    pub fn new(
        provider: Provider,
        policy: AccessPolicy,
        idp: Arc<dyn IdentityProvider>,
        cookie_key: Key,
        session_config: &SessionConfig,
    ) -> Self {
        Self {
            provider,
            policy,
            idp,
            cookie_key,
            cookie_settings: CookieSettings::from_config(session_config),
        }
    }

    /// Returns the request's cookies as a signed jar.
    #[must_use]
    pub fn signed_jar(&self, headers: &HeaderMap) -> SignedCookieJar {
        SignedCookieJar::from_headers(headers, self.cookie_key.clone())
    }
}
