//! Dispatch middleware: routes login-flow paths and gates the rest.

use axum::{
    extract::{Query, Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use login_gate_access::{AuthorizationError, CallbackParams, GateDecision};
use std::sync::Arc;

use super::{GatewayState, cookies, routes};
use crate::error::GatewayError;

/// Entry point for every request passing through the gateway.
///
/// The callback and logout paths are intercepted by exact match; every
/// other request goes through the access gate.
pub async fn dispatch(
    State(state): State<Arc<GatewayState>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();

    if path == state.provider.callback_path() {
        let params = Query::<CallbackParams>::try_from_uri(request.uri())
            .map(|Query(params)| params)
            .unwrap_or_default();
        let jar = state.signed_jar(request.headers());
        return routes::callback(&state, params, jar).await;
    }

    if path == state.provider.logout_path() {
        return routes::logout(&state, request, next).await;
    }

    gate(&state, request, next).await
}

/// Applies the access policy to one request.
async fn gate(state: &GatewayState, request: Request, next: Next) -> Response {
    let path = request.uri().path();
    let jar = state.signed_jar(request.headers());

    if path == state.provider.login_path() {
        return routes::login(state, jar);
    }

    let session = cookies::read_session(&jar);
    match state.policy.evaluate(path, session.as_ref()) {
        GateDecision::Pass => {
            tracing::debug!(path, "Request allowed");
            next.run(request).await
        }
        GateDecision::RequireLogin => {
            let target = request
                .uri()
                .path_and_query()
                .map_or(path, |pq| pq.as_str());
            tracing::debug!(path, "No session, redirecting to login");
            let jar = jar.add(cookies::origin_cookie(&state.cookie_settings, target));
            (jar, Redirect::temporary(state.provider.login_path())).into_response()
        }
        GateDecision::Forbidden { email } => {
            GatewayError::from(AuthorizationError::EmailNotAuthorized { email }).into_response()
        }
    }
}
