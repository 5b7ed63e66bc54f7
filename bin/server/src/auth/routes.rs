//! Authentication handlers for login, callback, and logout.
//!
//! These are invoked by the dispatch middleware rather than mounted as
//! routes, so the gateway can sit in front of any upstream router.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::SignedCookieJar;
use login_gate_access::{
    AuthenticationError, CallbackParams, PendingLogin, Session, encode_session,
    identity_token_nonce,
};
use tracing::instrument;

use super::{
    GatewayState,
    cookies::{
        self, NONCE_COOKIE, ORIGIN_COOKIE, SESSION_COOKIE, STATE_COOKIE, VERIFIER_COOKIE,
    },
};
use crate::error::GatewayError;

/// Starts a login by redirecting to the identity provider.
///
/// Fresh state, nonce and PKCE material are stored in signed cookies for
/// the callback to check.
#[instrument(skip_all)]
pub fn login(state: &GatewayState, jar: SignedCookieJar) -> Response {
    let pending = match PendingLogin::generate() {
        Ok(pending) => pending,
        Err(e) => return GatewayError::from(e).into_response(),
    };

    let auth_url = state.provider.authorization_url(&pending);
    let jar = cookies::store_pending(jar, &state.cookie_settings, &pending);

    tracing::debug!("Redirecting to identity provider");
    (jar, Redirect::to(&auth_url)).into_response()
}

/// Completes a login from the identity provider's callback.
///
/// On success the session cookie is set and the client is sent to the
/// recorded origin, or the success URL. Pending-login cookies are expired
/// whether or not the callback succeeds.
#[instrument(skip_all)]
pub async fn callback(
    state: &GatewayState,
    params: CallbackParams,
    jar: SignedCookieJar,
) -> Response {
    let outcome = authenticate(state, &params, &jar).await;
    let jar = cookies::clear_pending(jar);

    let session = match outcome {
        Ok(session) => session,
        Err(e) => return (jar, GatewayError::from(e)).into_response(),
    };

    tracing::info!(
        email = %session.email(),
        subject = %session.subject(),
        "User signed in"
    );

    let target = cookies::read_origin(&jar)
        .unwrap_or_else(|| state.provider.success_path().to_string());
    let jar = jar
        .add(cookies::set_cookie(
            &state.cookie_settings,
            SESSION_COOKIE,
            encode_session(&session),
        ))
        .add(cookies::delete_cookie(ORIGIN_COOKIE));

    (jar, Redirect::to(&target)).into_response()
}

/// Runs the callback checks in order, stopping at the first failure.
async fn authenticate(
    state: &GatewayState,
    params: &CallbackParams,
    jar: &SignedCookieJar,
) -> Result<Session, AuthenticationError> {
    let Some(code) = params.code() else {
        return Err(AuthenticationError::AuthorizationDenied {
            reason: params.denial_reason(),
        });
    };
    let returned_state = params.state().ok_or(AuthenticationError::MissingState)?;
    let expected_state = cookies::read_pending(jar, STATE_COOKIE)
        .map_err(|_| AuthenticationError::MissingStateCookie)?;
    let code_verifier = cookies::read_pending(jar, VERIFIER_COOKIE)
        .map_err(|_| AuthenticationError::MissingVerifierCookie)?;

    if returned_state != expected_state {
        return Err(AuthenticationError::StateMismatch);
    }

    let token = state
        .idp
        .exchange_code(code, &code_verifier)
        .await
        .map_err(|report| AuthenticationError::TokenExchangeFailed {
            details: report.to_string(),
        })?;

    if state.provider.verify_nonce() {
        let expected_nonce = cookies::read_pending(jar, NONCE_COOKIE)
            .map_err(|_| AuthenticationError::NonceMismatch)?;
        if identity_token_nonce(&token.id_token).as_deref() != Some(expected_nonce.as_str()) {
            return Err(AuthenticationError::NonceMismatch);
        }
    }

    let user_info = state
        .idp
        .fetch_user_info(&token.access_token, &token.token_type)
        .await
        .map_err(|report| AuthenticationError::UserInfoFetchFailed {
            details: report.to_string(),
        })?;

    if !user_info.email_verified {
        tracing::warn!(email = %user_info.email, "Identity provider reports email as unverified");
    }

    Ok(Session::from_exchange(&token, &user_info))
}

/// Ends the local session and forwards the request.
///
/// Every core cookie is expired, present or not.
pub async fn logout(state: &GatewayState, request: Request, next: Next) -> Response {
    let jar = state.signed_jar(request.headers());
    if let Some(session) = cookies::read_session(&jar) {
        tracing::info!(email = %session.email(), "User signed out");
    }

    let jar = cookies::clear_pending(jar).add(cookies::delete_cookie(SESSION_COOKIE));
    let response = next.run(request).await;
    (jar, response).into_response()
}
