//! Cookie names and helpers for the login flow.
//!
//! Every cookie travels through a [`SignedCookieJar`]; a cookie whose
//! signature fails is invisible to [`get_cookie`].

use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use login_gate_access::{PendingLogin, Session, decode_session, decode_value, encode_value};
use std::fmt;
use time::Duration as TimeDuration;

use crate::config::SessionConfig;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "login_gate_session";

/// CSRF state cookie name.
pub const STATE_COOKIE: &str = "login_gate_state";

/// PKCE verifier cookie name.
pub const VERIFIER_COOKIE: &str = "login_gate_verifier";

/// Nonce cookie name.
pub const NONCE_COOKIE: &str = "login_gate_nonce";

/// Cookie recording where an unauthenticated request was headed.
pub const ORIGIN_COOKIE: &str = "origin";

/// Returned by [`get_cookie`] when a cookie is absent or its signature fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieNotFound {
    pub name: &'static str,
}

impl fmt::Display for CookieNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cookie '{}' not found", self.name)
    }
}

impl std::error::Error for CookieNotFound {}

/// Attributes shared by every cookie the gateway writes.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    max_age: TimeDuration,
    secure: bool,
    http_only: bool,
}

impl CookieSettings {
    #[must_use]
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            max_age: TimeDuration::hours(config.max_age_hours),
            secure: config.secure_cookies,
            http_only: config.http_only,
        }
    }
}

/// Builds a cookie for `value` with the configured lifetime, path `/`.
#[must_use]
pub fn set_cookie(settings: &CookieSettings, name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(settings.http_only)
        .secure(settings.secure)
        .same_site(SameSite::Lax)
        .max_age(settings.max_age)
        .build()
}

/// Returns the verified value of `name`.
///
/// # Errors
///
/// Returns [`CookieNotFound`] if the cookie is absent or was tampered with.
pub fn get_cookie(jar: &SignedCookieJar, name: &'static str) -> Result<String, CookieNotFound> {
    jar.get(name)
        .map(|cookie| cookie.value().to_string())
        .ok_or(CookieNotFound { name })
}

/// Builds a cookie that expires `name` immediately.
#[must_use]
pub fn delete_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .max_age(TimeDuration::ZERO)
        .build()
}

/// Adds the state, verifier and nonce cookies for a new login attempt.
#[must_use]
pub fn store_pending(
    jar: SignedCookieJar,
    settings: &CookieSettings,
    pending: &PendingLogin,
) -> SignedCookieJar {
    jar.add(set_cookie(settings, STATE_COOKIE, encode_value(&pending.state)))
        .add(set_cookie(
            settings,
            VERIFIER_COOKIE,
            encode_value(&pending.code_verifier),
        ))
        .add(set_cookie(settings, NONCE_COOKIE, encode_value(&pending.nonce)))
}

/// Reads and decodes one pending-login cookie.
///
/// A value that verifies but does not decode is treated as absent.
pub fn read_pending(jar: &SignedCookieJar, name: &'static str) -> Result<String, CookieNotFound> {
    let encoded = get_cookie(jar, name)?;
    decode_value(&encoded).map_err(|_| CookieNotFound { name })
}

/// Expires the state, verifier and nonce cookies.
#[must_use]
pub fn clear_pending(jar: SignedCookieJar) -> SignedCookieJar {
    jar.add(delete_cookie(STATE_COOKIE))
        .add(delete_cookie(VERIFIER_COOKIE))
        .add(delete_cookie(NONCE_COOKIE))
}

/// Decodes the session cookie, if present and intact.
#[must_use]
pub fn read_session(jar: &SignedCookieJar) -> Option<Session> {
    let encoded = get_cookie(jar, SESSION_COOKIE).ok()?;
    match decode_session(&encoded) {
        Ok(session) => Some(session),
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring undecodable session cookie");
            None
        }
    }
}

/// Builds the origin cookie for a request target.
#[must_use]
pub fn origin_cookie(settings: &CookieSettings, target: &str) -> Cookie<'static> {
    set_cookie(settings, ORIGIN_COOKIE, target.to_string())
}

/// Returns the recorded origin if it is a local absolute path.
#[must_use]
pub fn read_origin(jar: &SignedCookieJar) -> Option<String> {
    let origin = get_cookie(jar, ORIGIN_COOKIE).ok()?;
    if is_local_path(&origin) {
        Some(origin)
    } else {
        tracing::debug!("Ignoring non-local origin cookie");
        None
    }
}

/// A local target starts with a single `/` and holds only visible ASCII.
///
/// Browsers strip tabs and newlines from `Location`, and treat `\` as `/`,
/// so any of them could turn the target into a protocol-relative URL.
fn is_local_path(target: &str) -> bool {
    target.starts_with('/')
        && !target.starts_with("//")
        && target.bytes().all(|b| b.is_ascii_graphic() && b != b'\\')
}
