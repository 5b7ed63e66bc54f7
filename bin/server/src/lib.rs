//! login-gate authentication gateway.
//!
//! This crate wires the access policy and the OpenID Connect login flow
//! into an axum middleware that can wrap any upstream router.

pub mod auth;
pub mod config;
pub mod error;

use axum::Router;
use std::sync::Arc;

use crate::auth::GatewayState;

/// Wraps `upstream` with the gateway.
///
/// `upstream` should have a fallback so that the login, callback and
/// logout paths reach the middleware even when no route matches them.
pub fn protect(upstream: Router, state: Arc<GatewayState>) -> Router {
    upstream.layer(axum::middleware::from_fn_with_state(state, auth::dispatch))
}
