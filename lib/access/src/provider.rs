//! Identity provider configuration.
//!
//! `ProviderConfig` is the deserialized form loaded by the server; `Provider`
//! is the validated form the login flow runs against. Validation happens
//! once at startup and the result is never mutated.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::auth::PendingLogin;
use crate::error::ConfigurationError;

/// Configuration for the OpenID Connect identity provider and the
/// gateway's own login endpoints.
///
/// `client_id`, `redirect_url` and `acr_values` are mandatory; the rest
/// have defaults and can be omitted when loading from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// The OAuth2 client ID registered with the provider.
    #[serde(default)]
    pub client_id: String,
    /// Absolute URL the provider redirects back to; its path is the callback path.
    #[serde(default)]
    pub redirect_url: String,
    /// Authentication context class values requested from the provider.
    #[serde(default)]
    pub acr_values: String,
    /// Scopes to request, separated by commas or spaces.
    /// Default: "openid email"
    #[serde(default = "default_scopes")]
    pub scopes: String,
    /// Authorization endpoint.
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    /// Token endpoint.
    #[serde(default = "default_token_url")]
    pub token_url: String,
    /// Userinfo endpoint.
    #[serde(default = "default_userinfo_url")]
    pub userinfo_url: String,
    /// Path that starts a login.
    #[serde(default = "default_login_url")]
    pub login_url: String,
    /// Path that ends the local session.
    #[serde(default = "default_logout_url")]
    pub logout_url: String,
    /// Where to land after login when no origin was recorded.
    #[serde(default = "default_success_url")]
    pub success_url: String,
    /// Whether the identity token's nonce must match the one sent at login.
    #[serde(default = "default_verify_nonce")]
    pub verify_nonce: bool,
    /// Upper bound on each identity provider request.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_scopes() -> String {
    "openid email".to_string()
}

fn default_auth_url() -> String {
    "https://idp.int.identitysandbox.gov/openid_connect/authorize".to_string()
}

fn default_token_url() -> String {
    "https://idp.int.identitysandbox.gov/api/openid_connect/token".to_string()
}

fn default_userinfo_url() -> String {
    "https://idp.int.identitysandbox.gov/api/openid_connect/userinfo".to_string()
}

fn default_login_url() -> String {
    "/login".to_string()
}

fn default_logout_url() -> String {
    "/logout".to_string()
}

fn default_success_url() -> String {
    "/".to_string()
}

fn default_verify_nonce() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    10
}

impl ProviderConfig {
    /// Creates a configuration with the mandatory fields and defaults elsewhere.
    #[must_use]
    pub fn new(client_id: String, redirect_url: String, acr_values: String) -> Self {
        Self {
            client_id,
            redirect_url,
            acr_values,
            scopes: default_scopes(),
            auth_url: default_auth_url(),
            token_url: default_token_url(),
            userinfo_url: default_userinfo_url(),
            login_url: default_login_url(),
            logout_url: default_logout_url(),
            success_url: default_success_url(),
            verify_nonce: default_verify_nonce(),
            timeout_seconds: default_timeout_seconds(),
        }
    }

    /// Returns the scopes, split on commas and whitespace.
    #[must_use]
    pub fn scopes(&self) -> Vec<&str> {
        self.scopes
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl Default for ProviderConfig {
    /// Empty mandatory fields; `Provider::new` rejects this until they are set.
    fn default() -> Self {
        Self::new(String::new(), String::new(), String::new())
    }
}

/// The identity provider's three endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub authorize: Url,
    pub token: Url,
    pub userinfo: Url,
}

/// A validated provider configuration.
#[derive(Debug, Clone)]
pub struct Provider {
    config: ProviderConfig,
    endpoints: Endpoints,
    callback_path: String,
}

impl Provider {
    /// Validates `config` and derives the callback path from its redirect URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingField`] when `client_id`,
    /// `redirect_url` or `acr_values` is empty, and
    /// [`ConfigurationError::InvalidUrl`] when a URL does not parse.
    pub fn new(config: ProviderConfig) -> Result<Self, ConfigurationError> {
        require("provider.redirect_url", &config.redirect_url)?;
        require("provider.client_id", &config.client_id)?;
        require("provider.acr_values", &config.acr_values)?;

        let redirect = parse_url("provider.redirect_url", &config.redirect_url)?;
        let endpoints = Endpoints {
            authorize: parse_url("provider.auth_url", &config.auth_url)?,
            token: parse_url("provider.token_url", &config.token_url)?,
            userinfo: parse_url("provider.userinfo_url", &config.userinfo_url)?,
        };

        Ok(Self {
            callback_path: redirect.path().to_string(),
            config,
            endpoints,
        })
    }

    /// Returns the underlying configuration.
    #[must_use]
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Returns the provider endpoints.
    #[must_use]
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Returns the path component of the redirect URL.
    #[must_use]
    pub fn callback_path(&self) -> &str {
        &self.callback_path
    }

    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.config.login_url
    }

    #[must_use]
    pub fn logout_path(&self) -> &str {
        &self.config.logout_url
    }

    #[must_use]
    pub fn success_path(&self) -> &str {
        &self.config.success_url
    }

    #[must_use]
    pub fn verify_nonce(&self) -> bool {
        self.config.verify_nonce
    }

    /// Returns the per-request timeout for identity provider calls.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_seconds)
    }

    /// Builds the authorization request URL for a pending login.
    #[must_use]
    pub fn authorization_url(&self, pending: &PendingLogin) -> String {
        let scope = self.config.scopes().join(" ");
        let mut url = self.endpoints.authorize.clone();
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.config.client_id)
            .append_pair("scope", &scope)
            .append_pair("redirect_uri", &self.config.redirect_url)
            .append_pair("acr_values", &self.config.acr_values)
            .append_pair("state", &pending.state)
            .append_pair("nonce", &pending.nonce)
            .append_pair("code_challenge", &pending.code_challenge)
            .append_pair("code_challenge_method", "S256");
        url.into()
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ConfigurationError> {
    if value.trim().is_empty() {
        return Err(ConfigurationError::MissingField { field });
    }
    Ok(())
}

fn parse_url(field: &'static str, value: &str) -> Result<Url, ConfigurationError> {
    Url::parse(value).map_err(|e| ConfigurationError::InvalidUrl {
        field,
        reason: e.to_string(),
    })
}
