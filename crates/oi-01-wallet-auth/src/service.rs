//! # Wallet Auth Service
//!
//! Application service layer.
//!
//! ## Architecture
//!
//! - `SessionGate` implements the inbound port (`AddressOwnershipApi`) and
//!   turns codec and verifier results into an accept/reject decision.
//! - `WalletAuthService` composes the gate with the outbound
//!   `IdentityProvider`, which only ever sees accepted identities.
//!
//! Neither holds session state; every call carries its own claim.

use shared_types::Network;
use tracing::{debug, info};

use crate::config::AuthConfig;
use crate::domain::address::{self, AddressType};
use crate::domain::entities::{
    AddressClaim, AuthDecision, AuthRequest, AuthenticatedIdentity, RejectionReason,
    SignInOutcome, VerificationResult,
};
use crate::domain::errors::{AddressError, AuthError, SignatureError};
use crate::domain::verifier::{self, SignatureEnvelope};
use crate::ports::inbound::AddressOwnershipApi;
use crate::ports::outbound::IdentityProvider;

// =============================================================================
// SESSION GATE
// =============================================================================

/// Accept/reject decisions for address-ownership claims.
#[derive(Clone, Debug, Default)]
pub struct SessionGate {
    config: AuthConfig,
}

impl SessionGate {
    /// Create a gate that requires addresses for `expected_network`
    /// (any network when `None`).
    pub fn new(expected_network: Option<Network>) -> Self {
        Self {
            config: AuthConfig {
                expected_network,
                ..AuthConfig::default()
            },
        }
    }

    /// Create a gate from a full configuration.
    pub fn with_config(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Decide a sign-in request over the fixed challenge message.
    pub fn authenticate_request(&self, request: &AuthRequest) -> AuthDecision {
        self.authenticate(&AddressClaim::sign_in(
            request.address.as_str(),
            request.signature.as_str(),
        ))
    }

    fn decode(&self, address: &str) -> Result<address::DecodedAddress, AddressError> {
        match self.config.expected_network {
            Some(network) => address::decode_for_network(address, network),
            None => address::decode(address),
        }
    }

    fn rejects_legacy_envelope(&self, address_type: AddressType, signature: &str) -> bool {
        !self.config.accept_legacy_segwit_signatures
            && address_type != AddressType::P2pkh
            && matches!(
                SignatureEnvelope::parse(signature),
                Ok(SignatureEnvelope::Compact(_))
            )
    }
}

fn reject(address: &str, reason: RejectionReason, detail: impl Into<String>) -> AuthDecision {
    let detail = detail.into();
    info!(
        "[oi-01] Sign-in rejected for {:?}: {:?} ({})",
        address, reason, detail
    );
    AuthDecision::Rejected { reason, detail }
}

impl AddressOwnershipApi for SessionGate {
    fn classify(&self, address: &str) -> Result<AddressType, AddressError> {
        address::classify(address)
    }

    fn verify(&self, claim: &AddressClaim) -> Result<VerificationResult, SignatureError> {
        verifier::verify(claim)
    }

    fn authenticate(&self, claim: &AddressClaim) -> AuthDecision {
        let address = claim.address.trim();
        if address.is_empty() {
            return reject(address, RejectionReason::UnsupportedAddress, "address is required");
        }
        if claim.signature.trim().is_empty() {
            return reject(
                address,
                RejectionReason::MalformedSignature,
                "signature is required",
            );
        }

        let decoded = match self.decode(address) {
            Ok(decoded) => decoded,
            Err(e) => return reject(address, RejectionReason::UnsupportedAddress, e.to_string()),
        };
        debug!(
            "[oi-01] Verifying {} signature for {}",
            decoded.address_type, address
        );

        if self.rejects_legacy_envelope(decoded.address_type, &claim.signature) {
            return reject(
                address,
                RejectionReason::MalformedSignature,
                "segwit addresses require a BIP-322 signature",
            );
        }

        match verifier::verify_decoded(&decoded, &claim.message, &claim.signature) {
            Ok(VerificationResult { verified: true, address_type }) => {
                let identity = AuthenticatedIdentity {
                    address: address.to_string(),
                    address_type,
                    network: self.config.expected_network.unwrap_or(decoded.network),
                };
                info!(
                    "[oi-01] Sign-in accepted for {} ({})",
                    identity.address, identity.address_type
                );
                AuthDecision::Accepted(identity)
            }
            Ok(_) => reject(
                address,
                RejectionReason::SignatureMismatch,
                "signature does not match address",
            ),
            Err(SignatureError::Address(e)) => {
                reject(address, RejectionReason::UnsupportedAddress, e.to_string())
            }
            Err(e @ SignatureError::InvalidFormat(_)) => {
                reject(address, RejectionReason::MalformedSignature, e.to_string())
            }
        }
    }
}

// =============================================================================
// SIGN-IN SERVICE
// =============================================================================

/// Sign-in: session gate plus identity provider.
pub struct WalletAuthService<P: IdentityProvider> {
    gate: SessionGate,
    provider: P,
}

impl<P: IdentityProvider> WalletAuthService<P> {
    /// Create a new sign-in service.
    ///
    /// # Arguments
    /// * `config` - Session gate configuration
    /// * `provider` - Issuer of sessions for accepted identities
    pub fn new(config: AuthConfig, provider: P) -> Self {
        Self {
            gate: SessionGate::with_config(config),
            provider,
        }
    }

    /// The underlying gate.
    pub fn gate(&self) -> &SessionGate {
        &self.gate
    }

    /// The identity provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Authenticate `request` and, if accepted, issue a session.
    ///
    /// Rejections are `Ok(SignInOutcome::Rejected)`; only a failing
    /// identity provider is an error.
    pub async fn sign_in(&self, request: &AuthRequest) -> Result<SignInOutcome, AuthError> {
        match self.gate.authenticate_request(request) {
            AuthDecision::Accepted(identity) => {
                let token = self.provider.issue_session(&identity).await?;
                debug!("[oi-01] Session issued for {}", identity.address);
                Ok(SignInOutcome::Issued { identity, token })
            }
            AuthDecision::Rejected { reason, detail } => {
                Ok(SignInOutcome::Rejected { reason, detail })
            }
        }
    }
}
