//! # Wallet Auth Errors
//!
//! Error types for address decoding, signature verification and sign-in.

use shared_types::Network;
use thiserror::Error;

use crate::ports::outbound::IdentityProviderError;

/// Errors raised by the address codec.
///
/// `Unsupported` and `InvalidChecksum` are kept apart so callers can tell
/// "not an address we know" from "an address we know, mistyped".
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AddressError {
    /// The string does not match any supported address family.
    #[error("Unsupported address: {0}")]
    Unsupported(String),

    /// The address has a recognized shape but its checksum does not match.
    #[error("Invalid address checksum")]
    InvalidChecksum,

    /// The address is well formed but belongs to another network.
    #[error("Address is for {actual}, expected {expected}")]
    WrongNetwork {
        /// Network the caller requires.
        expected: Network,
        /// Network encoded in the address.
        actual: Network,
    },
}

/// Errors raised while verifying a detached signature.
///
/// A cryptographic mismatch is not an error; it is reported as
/// `VerificationResult { verified: false, .. }`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// The claimed address could not be classified.
    #[error(transparent)]
    Address(#[from] AddressError),

    /// The signature blob cannot be parsed for the address family.
    #[error("Invalid signature format: {0}")]
    InvalidFormat(&'static str),
}

/// Errors raised by the sign-in service.
///
/// Rejected credentials are not errors; only failures of collaborators are.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The identity provider failed to issue a session.
    #[error("Identity provider error: {0}")]
    IdentityProvider(#[from] IdentityProviderError),
}
