//! Centralized server configuration.
//!
//! This module provides strongly-typed configuration for the gateway,
//! loaded via the `config` crate from an optional file layered under
//! environment variables (`LOGIN_GATE_PROVIDER__CLIENT_ID=...`).
//!
//! See [`ProviderConfig`] for identity provider settings and
//! [`PolicyConfig`] for path rules.

use axum_extra::extract::cookie::Key;
use login_gate_access::{ConfigurationError, PolicyConfig, ProviderConfig};
use serde::Deserialize;
use std::path::PathBuf;

/// Environment variable prefix for every setting.
const ENV_PREFIX: &str = "LOGIN_GATE";

/// Environment variable naming an explicit configuration file.
const CONFIG_FILE_ENV: &str = "LOGIN_GATE_CONFIG";

/// Base name of the configuration file looked up in the working directory.
const DEFAULT_CONFIG_FILE: &str = "login-gate";

/// Server configuration composed from library configs.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Directory served behind the gateway.
    #[serde(default = "default_site_root")]
    pub site_root: PathBuf,

    /// Newline-delimited file of allowed emails.
    #[serde(default = "default_allowlist_path")]
    pub allowlist_path: PathBuf,

    /// Identity provider configuration.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Protected and exempted path prefixes.
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Cookie configuration.
    #[serde(default)]
    pub session: SessionConfig,
}

fn default_listen_addr() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_site_root() -> PathBuf {
    PathBuf::from("./public")
}

fn default_allowlist_path() -> PathBuf {
    PathBuf::from("./emails.txt")
}

/// Cookie-related configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Secret used to sign cookies; at least 64 bytes.
    /// When unset, a random key is generated and sessions do not survive restarts.
    #[serde(default)]
    pub cookie_secret: Option<String>,

    /// Lifetime of the session and pending-login cookies, in hours.
    #[serde(default = "default_max_age_hours")]
    pub max_age_hours: i64,

    /// Whether to set the Secure flag on cookies (requires HTTPS).
    /// Defaults to true for production safety; set to false for local HTTP development.
    #[serde(default = "default_secure_cookies")]
    pub secure_cookies: bool,

    /// Whether to set the HttpOnly flag on cookies.
    #[serde(default)]
    pub http_only: bool,
}

/// Accepted cookie lifetimes, one hour to one year.
const MAX_AGE_HOURS_RANGE: std::ops::RangeInclusive<i64> = 1..=8760;

fn default_max_age_hours() -> i64 {
    24
}

fn default_secure_cookies() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_secret: None,
            max_age_hours: default_max_age_hours(),
            secure_cookies: default_secure_cookies(),
            http_only: false,
        }
    }
}

impl SessionConfig {
    /// Checks that the cookie lifetime is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::OutOfRange`] if `max_age_hours` is not
    /// between one hour and one year.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if MAX_AGE_HOURS_RANGE.contains(&self.max_age_hours) {
            Ok(())
        } else {
            Err(ConfigurationError::OutOfRange {
                field: "session.max_age_hours",
                value: self.max_age_hours,
                min: *MAX_AGE_HOURS_RANGE.start(),
                max: *MAX_AGE_HOURS_RANGE.end(),
            })
        }
    }

    /// Returns the cookie signing key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidCookieSecret`] if the configured
    /// secret is shorter than 64 bytes.
    pub fn cookie_key(&self) -> Result<Key, ConfigurationError> {
        match self.cookie_secret.as_deref() {
            Some(secret) => Key::try_from(secret.as_bytes()).map_err(|e| {
                ConfigurationError::InvalidCookieSecret {
                    reason: e.to_string(),
                }
            }),
            None => {
                tracing::warn!(
                    "No cookie secret configured; generated a random key, sessions will not survive restarts"
                );
                Ok(Key::generate())
            }
        }
    }
}

impl ServerConfig {
    /// Loads configuration from the optional file and environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or deserialized.
    pub fn from_env() -> login_gate_core::Result<Self, ConfigurationError> {
        let file = std::env::var(CONFIG_FILE_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.into());
        Self::from_builder(
            config::Config::builder()
                .add_source(config::File::with_name(&file).required(false))
                .add_source(
                    config::Environment::with_prefix(ENV_PREFIX)
                        .prefix_separator("_")
                        .separator("__")
                        .try_parsing(true),
                ),
        )
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> login_gate_core::Result<Self, ConfigurationError> {
        let config = builder
            .build()
            .and_then(|c| c.try_deserialize::<Self>())
            .map_err(|e| ConfigurationError::Load {
                details: e.to_string(),
            })?;
        config.session.validate()?;
        Ok(config)
    }
}
