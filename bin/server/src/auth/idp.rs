//! Identity provider client for the token and userinfo endpoints.
//!
//! The token exchange is a plain form POST (no client authentication; the
//! PKCE verifier proves possession), and userinfo is a GET with the token
//! type and access token in the `Authorization` header. Neither call is
//! retried.

use async_trait::async_trait;
use login_gate_access::{Endpoints, Provider, TokenResponse, UserInfo};
use login_gate_core::Result;
use reqwest::header::AUTHORIZATION;
use std::fmt;
use tracing::instrument;

/// Errors from calls to the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdpError {
    /// The HTTP client could not be constructed.
    Client { details: String },
    /// The token endpoint call failed or returned an unusable body.
    TokenExchangeFailed { details: String },
    /// The userinfo endpoint call failed or returned an unusable body.
    UserInfoFetchFailed { details: String },
}

impl fmt::Display for IdpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client { details } => write!(f, "failed to create HTTP client: {details}"),
            Self::TokenExchangeFailed { details } => write!(f, "token exchange failed: {details}"),
            Self::UserInfoFetchFailed { details } => write!(f, "userinfo fetch failed: {details}"),
        }
    }
}

impl std::error::Error for IdpError {}

/// The two identity provider calls the callback depends on.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchanges an authorization code and PKCE verifier for tokens.
    async fn exchange_code(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> Result<TokenResponse, IdpError>;

    /// Fetches the user's claims with an access token.
    async fn fetch_user_info(
        &self,
        access_token: &str,
        token_type: &str,
    ) -> Result<UserInfo, IdpError>;
}

/// reqwest-backed identity provider client.
#[derive(Debug, Clone)]
pub struct IdpClient {
    http: reqwest::Client,
    endpoints: Endpoints,
}

impl IdpClient {
    /// Creates a client for the provider's endpoints with its request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`IdpError::Client`] if the HTTP client cannot be built.
    pub fn new(provider: &Provider) -> Result<Self, IdpError> {
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(provider.timeout())
            .build()
            .map_err(|e| IdpError::Client {
                details: e.to_string(),
            })?;

        Ok(Self {
            http,
            endpoints: provider.endpoints().clone(),
        })
    }
}

#[async_trait]
impl IdentityProvider for IdpClient {
    #[instrument(skip_all)]
    async fn exchange_code(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> Result<TokenResponse, IdpError> {
        let failed = |details: String| IdpError::TokenExchangeFailed { details };

        let form = [
            ("grant_type", "authorization_code"),
            ("code_verifier", code_verifier),
            ("code", code),
        ];
        let response = self
            .http
            .post(self.endpoints.token.clone())
            .form(&form)
            .send()
            .await
            .map_err(|e| failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(failed(format!("token endpoint returned {status}: {body}")).into());
        }

        let token = response
            .json::<TokenResponse>()
            .await
            .map_err(|e| failed(format!("invalid token response: {e}")))?;
        tracing::debug!(token_type = %token.token_type, "Exchanged authorization code");
        Ok(token)
    }

    #[instrument(skip_all)]
    async fn fetch_user_info(
        &self,
        access_token: &str,
        token_type: &str,
    ) -> Result<UserInfo, IdpError> {
        let failed = |details: String| IdpError::UserInfoFetchFailed { details };

        let response = self
            .http
            .get(self.endpoints.userinfo.clone())
            .header(AUTHORIZATION, format!("{token_type} {access_token}"))
            .send()
            .await
            .map_err(|e| failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(failed(format!("userinfo endpoint returned {status}: {body}")).into());
        }

        let info = response
            .json::<UserInfo>()
            .await
            .map_err(|e| failed(format!("invalid userinfo response: {e}")))?;
        Ok(info)
    }
}
