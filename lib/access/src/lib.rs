//! Sessions, identity provider types, and access policy for login-gate.
//!
//! This crate provides the framework-independent half of the gateway:
//! - Session records and their cookie encoding (`Session`, `encode_session`)
//! - Pending-login material and identity provider wire types
//! - Validated identity provider configuration (`Provider`)
//! - Path patterns, the email allowlist, and the access policy
//! - Authentication and authorization error types
//!
//! # Access Control Model
//!
//! Requests under an `auth_required` prefix need a session whose email is
//! on the allowlist. `whitelist` prefixes are exempt even when they also
//! fall under a protected prefix.
//!
//! # Example
//!
//! ```
//! use login_gate_access::{
//!     AccessPolicy, EmailAllowlist, GateDecision, PathPattern, Session,
//! };
//!
//! let policy = AccessPolicy::new(
//!     vec![PathPattern::new("/reports")],
//!     vec![PathPattern::new("/reports/public/*")],
//!     EmailAllowlist::new(["alice@example.com"]),
//! );
//!
//! let session = Session::new(
//!     "user-123".to_string(),
//!     "https://idp.example.com".to_string(),
//!     "alice@example.com".to_string(),
//!     "eyJ...".to_string(),
//!     3600,
//! );
//!
//! assert_eq!(policy.evaluate("/reports/q3", None), GateDecision::RequireLogin);
//! assert_eq!(policy.evaluate("/reports/q3", Some(&session)), GateDecision::Pass);
//! assert_eq!(policy.evaluate("/reports/public/index", None), GateDecision::Pass);
//! ```

pub mod allowlist;
pub mod auth;
pub mod error;
pub mod path;
pub mod policy;
pub mod provider;
pub mod session;

// Re-export main types at crate root
pub use allowlist::{AllowlistError, EmailAllowlist};
pub use auth::{CallbackParams, PendingLogin, TokenResponse, UserInfo, identity_token_nonce};
pub use error::{AuthenticationError, AuthorizationError, ConfigurationError};
pub use path::PathPattern;
pub use policy::{AccessPolicy, GateDecision, PolicyConfig};
pub use provider::{Endpoints, Provider, ProviderConfig};
pub use session::{
    DecodeError, Session, decode_session, decode_value, encode_session, encode_value,
};
