//! # Domain Entities
//!
//! Values passed through the sign-in flow. All are immutable and built per
//! request.

use serde::{Deserialize, Serialize};
use shared_types::{Network, SIGN_IN_MESSAGE};

use super::address::AddressType;

/// A claim that the holder of `address` signed `message`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddressClaim {
    /// Claimed address.
    pub address: String,
    /// Exact message bytes the signature must commit to.
    pub message: String,
    /// Base64 signature blob (BIP-137 compact or BIP-322 witness).
    pub signature: String,
}

impl AddressClaim {
    /// Claim over the fixed sign-in challenge.
    pub fn sign_in(address: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            message: SIGN_IN_MESSAGE.to_string(),
            signature: signature.into(),
        }
    }

    /// Claim over an arbitrary message.
    pub fn with_message(
        address: impl Into<String>,
        message: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            message: message.into(),
            signature: signature.into(),
        }
    }
}

/// Outcome of a signature check that got past envelope parsing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    /// Whether the signature was produced by the address holder.
    pub verified: bool,
    /// Family of the claimed address.
    pub address_type: AddressType,
}

/// Sign-in request as received from the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest {
    /// Claimed address.
    pub address: String,
    /// Base64 signature over the sign-in challenge.
    pub signature: String,
}

/// Why a sign-in was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RejectionReason {
    /// Address missing, unknown, mistyped or on another network.
    UnsupportedAddress,
    /// Signature missing or not parseable for the address family.
    MalformedSignature,
    /// Signature parsed but was not produced by the address holder.
    SignatureMismatch,
}

/// An address whose ownership has been proven.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedIdentity {
    /// Proven address as supplied by the caller.
    pub address: String,
    /// Address family.
    pub address_type: AddressType,
    /// Network the address encodes.
    pub network: Network,
}

/// Accept/reject decision of the session gate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "camelCase")]
pub enum AuthDecision {
    /// Ownership proven.
    Accepted(AuthenticatedIdentity),
    /// Ownership not proven.
    Rejected {
        /// Reason code.
        reason: RejectionReason,
        /// Human-readable detail for logs.
        detail: String,
    },
}

impl AuthDecision {
    /// Whether the decision is `Accepted`.
    pub fn is_accepted(&self) -> bool {
        matches!(self, AuthDecision::Accepted(_))
    }

    /// Rejection reason, if rejected.
    pub fn rejection_reason(&self) -> Option<RejectionReason> {
        match self {
            AuthDecision::Accepted(_) => None,
            AuthDecision::Rejected { reason, .. } => Some(*reason),
        }
    }
}

/// Opaque session token issued by the identity provider.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken(pub String);

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken(..)")
    }
}

/// Result of a full sign-in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignInOutcome {
    /// Ownership proven and a session issued.
    Issued {
        /// Proven identity.
        identity: AuthenticatedIdentity,
        /// Issued session.
        token: SessionToken,
    },
    /// Ownership not proven; nothing was issued.
    Rejected {
        /// Reason code.
        reason: RejectionReason,
        /// Human-readable detail.
        detail: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_claim_uses_fixed_message() {
        let claim = AddressClaim::sign_in("bc1q...", "sig");
        assert_eq!(claim.message, SIGN_IN_MESSAGE);
    }

    #[test]
    fn test_auth_request_json() {
        let request: AuthRequest =
            serde_json::from_str(r#"{"address":"tb1qabc","signature":"AAAA"}"#).unwrap();
        assert_eq!(request.address, "tb1qabc");
    }

    #[test]
    fn test_decision_json_shape() {
        let decision = AuthDecision::Rejected {
            reason: RejectionReason::SignatureMismatch,
            detail: "nope".into(),
        };
        let json = serde_json::to_value(&decision).unwrap();
        assert_eq!(json["decision"], "rejected");
        assert_eq!(json["reason"], "signatureMismatch");
        assert_eq!(decision.rejection_reason(), Some(RejectionReason::SignatureMismatch));
    }

    #[test]
    fn test_session_token_debug_is_redacted() {
        let token = SessionToken("secret".into());
        assert_eq!(format!("{token:?}"), "SessionToken(..)");
    }
}
