//! # Wallet Auth Subsystem (OI-01)
//!
//! Proves ownership of a Bitcoin address by checking a detached signature
//! over a fixed challenge, then hands accepted identities to an identity
//! provider.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): address codec, BIP-137 and BIP-322
//!   verification. Pure, synchronous, no I/O
//! - **Ports Layer** (`ports/`): inbound `AddressOwnershipApi`, outbound
//!   `IdentityProvider`
//! - **Service Layer** (`service.rs`): `SessionGate` and `WalletAuthService`
//!
//! ## Module Structure
//!
//! ```text
//! oi-01-wallet-auth/
//! ├── config.rs          # AuthConfig
//! ├── domain/
//! │   ├── address.rs     # classify / decode / encode
//! │   ├── message.rs     # hashing primitives
//! │   ├── transaction.rs # BIP-322 virtual transactions, sighashes
//! │   ├── bip137.rs      # compact signatures
//! │   ├── bip322.rs      # simple (witness) signatures
//! │   ├── verifier.rs    # per-family dispatch
//! │   ├── entities.rs
//! │   └── errors.rs
//! ├── ports/
//! │   ├── inbound.rs
//! │   └── outbound.rs    # IdentityProvider + mock
//! └── service.rs
//! ```
//!
//! ## Security Notes
//!
//! - **Replayable challenge**: the signed message is a fixed public string
//!   with no nonce or timestamp. A captured signature proves ownership
//!   forever; callers needing freshness must add it on top.
//! - **Fail closed**: the message is bound byte-for-byte; any difference,
//!   including whitespace, fails verification.

#![warn(missing_docs)]

pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use config::AuthConfig;
pub use domain::address::{classify, decode, decode_for_network, encode, AddressType, DecodedAddress};
pub use domain::entities::{
    AddressClaim, AuthDecision, AuthRequest, AuthenticatedIdentity, RejectionReason,
    SessionToken, SignInOutcome, VerificationResult,
};
pub use domain::errors::{AddressError, AuthError, SignatureError};
pub use domain::verifier::{verify, SignatureEnvelope};
pub use ports::inbound::AddressOwnershipApi;
pub use ports::outbound::{
    identity_subject, IdentityProvider, IdentityProviderError, MockIdentityProvider,
};
pub use service::{SessionGate, WalletAuthService};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
