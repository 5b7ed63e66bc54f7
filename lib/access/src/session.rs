//! Session records and their cookie encoding.
//!
//! A session is minted once per successful callback and lives entirely in
//! the client's cookie jar; there is no server-side session store. The
//! cookie value is the session's JSON form, base64-encoded. Integrity is
//! provided by the signed cookie jar that carries it, not by this codec.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::auth::{TokenResponse, UserInfo};

/// An authenticated principal.
///
/// Sessions are immutable after creation and always fully populated:
/// [`decode_session`] rejects records with an empty subject, issuer or email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Stable identifier of the user at the identity provider.
    #[serde(rename = "sub")]
    subject: String,
    /// Identifier of the identity provider that issued the identity.
    #[serde(rename = "iss")]
    issuer: String,
    /// Email claim used for allowlist checks.
    email: String,
    /// Identity token from the provider, kept for downstream verification.
    #[serde(rename = "id_token")]
    identity_token: String,
    /// Lifetime hint from the token response.
    #[serde(rename = "expires_in")]
    expires_in_seconds: u64,
}

impl Session {
    /// Creates a session from its parts.
    #[must_use]
    pub fn new(
        subject: String,
        issuer: String,
        email: String,
        identity_token: String,
        expires_in_seconds: u64,
    ) -> Self {
        Self {
            subject,
            issuer,
            email,
            identity_token,
            expires_in_seconds,
        }
    }

    /// Builds the session for a completed token exchange and userinfo fetch.
    #[must_use]
    pub fn from_exchange(token: &TokenResponse, user_info: &UserInfo) -> Self {
        Self::new(
            user_info.sub.clone(),
            user_info.iss.clone(),
            user_info.email.clone(),
            token.id_token.clone(),
            token.expires_in,
        )
    }

    /// Returns the subject identifier.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns the issuer identifier.
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Returns the email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the raw identity token.
    #[must_use]
    pub fn identity_token(&self) -> &str {
        &self.identity_token
    }

    /// Returns the lifetime hint in seconds.
    #[must_use]
    pub fn expires_in_seconds(&self) -> u64 {
        self.expires_in_seconds
    }

    fn is_complete(&self) -> bool {
        !self.subject.is_empty() && !self.issuer.is_empty() && !self.email.is_empty()
    }
}

/// Errors from decoding a cookie value.
///
/// Callers treat any of these as "no session".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The value is not valid base64.
    Base64 { reason: String },
    /// The decoded bytes are not UTF-8.
    Utf8,
    /// The decoded text is not a session record.
    Malformed { reason: String },
    /// The record is missing a required field.
    Incomplete,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base64 { reason } => write!(f, "invalid base64: {reason}"),
            Self::Utf8 => write!(f, "decoded value is not UTF-8"),
            Self::Malformed { reason } => write!(f, "malformed session record: {reason}"),
            Self::Incomplete => write!(f, "session record is missing required fields"),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Base64-encodes a cookie value.
#[must_use]
pub fn encode_value(value: &str) -> String {
    STANDARD.encode(value.as_bytes())
}

/// Reverses [`encode_value`].
///
/// # Errors
///
/// Returns [`DecodeError::Base64`] or [`DecodeError::Utf8`] for malformed input.
pub fn decode_value(encoded: &str) -> Result<String, DecodeError> {
    let bytes = STANDARD.decode(encoded).map_err(|e| DecodeError::Base64 {
        reason: e.to_string(),
    })?;
    String::from_utf8(bytes).map_err(|_| DecodeError::Utf8)
}

/// Serializes a session to its cookie value.
#[must_use]
pub fn encode_session(session: &Session) -> String {
    // Serializing a struct of strings and integers cannot fail.
    let json = serde_json::to_string(session).unwrap_or_default();
    encode_value(&json)
}

/// Parses a cookie value back into a session.
///
/// # Errors
///
/// Returns a [`DecodeError`] for malformed base64, malformed JSON, or a
/// record with empty identity fields.
pub fn decode_session(encoded: &str) -> Result<Session, DecodeError> {
    let json = decode_value(encoded)?;
    let session: Session = serde_json::from_str(&json).map_err(|e| DecodeError::Malformed {
        reason: e.to_string(),
    })?;
    if !session.is_complete() {
        return Err(DecodeError::Incomplete);
    }
    Ok(session)
}
