//! Random tokens and PKCE material for the login flow.
//!
//! All randomness comes from the operating system's CSPRNG via `getrandom`.
//! A failing entropy source is reported as [`CryptoError::EntropyUnavailable`];
//! there is no fallback to a weaker generator.

use oauth2::{PkceCodeChallenge, PkceCodeVerifier};
use std::fmt;

/// Shortest verifier (in characters) RFC 7636 allows.
const MIN_VERIFIER_LEN: usize = 43;

/// Longest verifier (in characters) RFC 7636 allows.
const MAX_VERIFIER_LEN: usize = 128;

/// Errors from token and PKCE generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// The operating system's random source failed.
    EntropyUnavailable { details: String },
    /// The requested verifier length falls outside RFC 7636 bounds once hex-encoded.
    InvalidVerifierLength { byte_len: usize },
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EntropyUnavailable { details } => {
                write!(f, "secure random source unavailable: {details}")
            }
            Self::InvalidVerifierLength { byte_len } => {
                write!(
                    f,
                    "a {byte_len}-byte verifier is outside the {MIN_VERIFIER_LEN}..={MAX_VERIFIER_LEN} character range"
                )
            }
        }
    }
}

impl std::error::Error for CryptoError {}

/// Generates `byte_len` random bytes and returns them hex-encoded.
///
/// The returned string is `2 * byte_len` characters long.
///
/// # Errors
///
/// Returns [`CryptoError::EntropyUnavailable`] if the OS random source fails.
pub fn random_token(byte_len: usize) -> Result<String, CryptoError> {
    let mut bytes = vec![0u8; byte_len];
    getrandom::fill(&mut bytes).map_err(|e| CryptoError::EntropyUnavailable {
        details: e.to_string(),
    })?;
    Ok(hex::encode(bytes))
}

/// A PKCE code verifier together with its S256 challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PkcePair {
    /// Hex-encoded random secret, kept by the client until the token exchange.
    pub verifier: String,
    /// Challenge derived from the verifier, sent with the authorization request.
    pub challenge: String,
}

/// Generates a PKCE pair from `verifier_byte_len` random bytes.
///
/// The verifier is the hex string produced by [`random_token`]; the challenge
/// hashes that hex text, not the raw random bytes.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidVerifierLength`] when the hex verifier would
/// not be 43 to 128 characters long, or [`CryptoError::EntropyUnavailable`]
/// if the OS random source fails.
pub fn generate_pkce_pair(verifier_byte_len: usize) -> Result<PkcePair, CryptoError> {
    let hex_len = verifier_byte_len * 2;
    if !(MIN_VERIFIER_LEN..=MAX_VERIFIER_LEN).contains(&hex_len) {
        return Err(CryptoError::InvalidVerifierLength {
            byte_len: verifier_byte_len,
        });
    }

    let verifier = random_token(verifier_byte_len)?;
    let challenge = pkce_challenge(&verifier);
    Ok(PkcePair {
        verifier,
        challenge,
    })
}

/// Computes the S256 challenge for a verifier: `BASE64URL(SHA256(verifier))`.
///
/// # Panics
///
/// Panics if `verifier` is not 43 to 128 characters long.
/// [`generate_pkce_pair`] only produces verifiers inside that range.
#[must_use]
pub fn pkce_challenge(verifier: &str) -> String {
    let verifier = PkceCodeVerifier::new(verifier.to_string());
    PkceCodeChallenge::from_code_verifier_sha256(&verifier)
        .as_str()
        .to_string()
}
