//! Core utilities for the login-gate authentication gateway.
//!
//! This crate provides the error handling foundation shared by the other
//! crates and the cryptographic helpers the login flow is built on:
//! random CSRF/nonce tokens and PKCE verifier/challenge pairs.

pub mod crypto;
pub mod error;

pub use crypto::{CryptoError, PkcePair, generate_pkce_pair, pkce_challenge, random_token};
pub use error::Result;
