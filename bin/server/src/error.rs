//! HTTP mapping for gateway errors.
//!
//! Domain errors from the access and core crates are wrapped in
//! [`GatewayError`] at the handler boundary. Responses carry a short plain
//! text status line; details go to the log only.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use login_gate_access::{AuthenticationError, AuthorizationError};
use login_gate_core::CryptoError;
use std::fmt;

/// An error that terminates a request inside the gateway.
#[derive(Debug)]
pub enum GatewayError {
    /// Login material could not be generated.
    Entropy(CryptoError),
    /// The login callback failed.
    Authentication(AuthenticationError),
    /// The session may not access the requested path.
    Authorization(AuthorizationError),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entropy(e) => write!(f, "login initiation failed: {e}"),
            Self::Authentication(e) => write!(f, "{e}"),
            Self::Authorization(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for GatewayError {}

impl From<CryptoError> for GatewayError {
    fn from(e: CryptoError) -> Self {
        Self::Entropy(e)
    }
}

impl From<AuthenticationError> for GatewayError {
    fn from(e: AuthenticationError) -> Self {
        Self::Authentication(e)
    }
}

impl From<AuthorizationError> for GatewayError {
    fn from(e: AuthorizationError) -> Self {
        Self::Authorization(e)
    }
}

impl GatewayError {
    /// Returns the status code this error is reported with.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Entropy(_) | Self::Authentication(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Authorization(AuthorizationError::EmailNotAuthorized { .. }) => {
                StatusCode::FORBIDDEN
            }
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::Entropy(e) => {
                tracing::error!(error = %e, "Unable to generate login material");
                "Internal server error"
            }
            Self::Authentication(e) if e.is_integrity_failure() => {
                tracing::warn!(error = %e, "Rejected login callback");
                "Authentication failed"
            }
            Self::Authentication(e @ AuthenticationError::AuthorizationDenied { .. }) => {
                tracing::info!(error = %e, "Identity provider denied authorization");
                "Authentication failed"
            }
            Self::Authentication(e) => {
                tracing::error!(error = %e, "Identity provider request failed");
                "Authentication failed"
            }
            Self::Authorization(AuthorizationError::EmailNotAuthorized { email }) => {
                tracing::warn!(email = %email, "Email not on allowlist");
                "Forbidden"
            }
        };

        (self.status(), message).into_response()
    }
}
