//! Error types for the access crate.
//!
//! Errors are designed for layered context using rootcause:
//! - `ConfigurationError`: Invalid gateway configuration (fatal at startup)
//! - `AuthenticationError`: Failures while completing a login callback
//! - `AuthorizationError`: Failures of the allowlist check

use std::fmt;

/// Errors from validating gateway configuration.
///
/// Any of these prevents the gateway from serving requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A mandatory setting is missing or empty.
    MissingField { field: &'static str },
    /// A URL setting could not be parsed.
    InvalidUrl { field: &'static str, reason: String },
    /// The cookie signing secret is unusable.
    InvalidCookieSecret { reason: String },
    /// A numeric setting lies outside its accepted range.
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
    /// The configuration sources could not be read or deserialized.
    Load { details: String },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { field } => {
                write!(f, "required setting '{field}' is missing or empty")
            }
            Self::InvalidUrl { field, reason } => {
                write!(f, "setting '{field}' is not a valid URL: {reason}")
            }
            Self::InvalidCookieSecret { reason } => {
                write!(f, "invalid cookie secret: {reason}")
            }
            Self::OutOfRange {
                field,
                value,
                min,
                max,
            } => {
                write!(f, "setting '{field}' is {value}, expected {min}..={max}")
            }
            Self::Load { details } => {
                write!(f, "failed to load configuration: {details}")
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// Errors from completing an authorization-code callback.
///
/// Every variant aborts the callback; no session is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationError {
    /// The identity provider returned an error instead of a code.
    AuthorizationDenied { reason: String },
    /// The callback query carried no `state` parameter.
    MissingState,
    /// The CSRF state cookie is absent or failed verification.
    MissingStateCookie,
    /// The PKCE verifier cookie is absent or failed verification.
    MissingVerifierCookie,
    /// The query `state` does not equal the state cookie.
    StateMismatch,
    /// The identity token's nonce does not match the one sent at login.
    NonceMismatch,
    /// The token endpoint call failed.
    TokenExchangeFailed { details: String },
    /// The userinfo endpoint call failed.
    UserInfoFetchFailed { details: String },
}

impl fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AuthorizationDenied { reason } => {
                write!(f, "identity provider denied authorization: {reason}")
            }
            Self::MissingState => write!(f, "state parameter was not supplied"),
            Self::MissingStateCookie => write!(f, "state cookie not found"),
            Self::MissingVerifierCookie => write!(f, "code verifier cookie not found"),
            Self::StateMismatch => write!(f, "returned state does not match the state cookie"),
            Self::NonceMismatch => {
                write!(f, "identity token nonce does not match the nonce cookie")
            }
            Self::TokenExchangeFailed { details } => {
                write!(f, "token exchange failed: {details}")
            }
            Self::UserInfoFetchFailed { details } => {
                write!(f, "userinfo fetch failed: {details}")
            }
        }
    }
}

impl std::error::Error for AuthenticationError {}

impl AuthenticationError {
    /// Returns true for failures of the CSRF/PKCE integrity checks.
    #[must_use]
    pub fn is_integrity_failure(&self) -> bool {
        matches!(
            self,
            Self::MissingState
                | Self::MissingStateCookie
                | Self::MissingVerifierCookie
                | Self::StateMismatch
                | Self::NonceMismatch
        )
    }
}

/// Errors from the allowlist check on a protected path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationError {
    /// The session's email is not on the allowlist.
    EmailNotAuthorized { email: String },
}

impl fmt::Display for AuthorizationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmailNotAuthorized { email } => {
                write!(f, "email not authorized: {email}")
            }
        }
    }
}

impl std::error::Error for AuthorizationError {}
