//! Wire types and pending-login material for the authorization code flow.
//!
//! This module provides:
//! - `PendingLogin`: CSRF state, PKCE pair and nonce bound to one login attempt
//! - `CallbackParams`: Query parameters the identity provider returns
//! - `TokenResponse` / `UserInfo`: Identity provider response bodies
//! - `identity_token_nonce`: Reads the nonce claim from an identity token

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use login_gate_core::{CryptoError, generate_pkce_pair, random_token};
use serde::{Deserialize, Serialize};

/// Random bytes behind the state and nonce tokens.
pub const TOKEN_BYTES: usize = 32;

/// Random bytes behind the PKCE verifier.
pub const VERIFIER_BYTES: usize = 32;

/// Ephemeral CSRF/PKCE material for one login attempt.
///
/// Created at login initiation and carried in cookies until the callback
/// consumes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLogin {
    /// CSRF token round-tripped through the identity provider.
    pub state: String,
    /// PKCE secret presented at the token exchange.
    pub code_verifier: String,
    /// Challenge derived from `code_verifier`, sent with the authorization request.
    pub code_challenge: String,
    /// Replay-protection value embedded in the authorization request.
    pub nonce: String,
}

impl PendingLogin {
    /// Generates fresh state, nonce and PKCE material.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::EntropyUnavailable`] if the OS random source fails.
    pub fn generate() -> Result<Self, CryptoError> {
        let state = random_token(TOKEN_BYTES)?;
        let pkce = generate_pkce_pair(VERIFIER_BYTES)?;
        let nonce = random_token(TOKEN_BYTES)?;
        Ok(Self {
            state,
            code_verifier: pkce.verifier,
            code_challenge: pkce.challenge,
            nonce,
        })
    }
}

/// Query parameters of a callback request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CallbackParams {
    /// Authorization code, present on success.
    pub code: Option<String>,
    /// Echoed CSRF state.
    pub state: Option<String>,
    /// Error code, present when the provider refused the request.
    pub error: Option<String>,
    /// Human-readable error detail.
    pub error_description: Option<String>,
}

impl CallbackParams {
    /// Returns the non-empty authorization code, if any.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref().filter(|code| !code.is_empty())
    }

    /// Returns the non-empty state, if any.
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref().filter(|state| !state.is_empty())
    }

    /// Describes why no code was returned, from the provider's error fields.
    #[must_use]
    pub fn denial_reason(&self) -> String {
        match (self.error.as_deref(), self.error_description.as_deref()) {
            (Some(error), Some(description)) => format!("{error}: {description}"),
            (Some(error), None) => error.to_string(),
            (None, Some(description)) => description.to_string(),
            (None, None) => "no authorization code returned".to_string(),
        }
    }
}

/// Response body of the token endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub expires_in: u64,
    pub id_token: String,
}

/// Response body of the userinfo endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub sub: String,
    pub iss: String,
    pub email: String,
    #[serde(default)]
    pub email_verified: bool,
}

/// Reads the `nonce` claim from an identity token's payload.
///
/// The token's signature is not verified; the value is only compared with
/// the nonce this gateway generated. Returns `None` when the token is not a
/// three-part JWT, its payload is not JSON, or it carries no nonce.
#[must_use]
pub fn identity_token_nonce(identity_token: &str) -> Option<String> {
    let parts: Vec<&str> = identity_token.split('.').collect();
    if parts.len() != 3 {
        return None;
    }

    let payload = URL_SAFE_NO_PAD.decode(parts[1].trim_end_matches('=')).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&payload).ok()?;
    claims
        .get("nonce")
        .and_then(|v| v.as_str())
        .map(str::to_string)
}
