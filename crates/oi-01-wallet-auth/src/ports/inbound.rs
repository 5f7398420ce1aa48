//! # Inbound Ports (Driving Ports / API)
//!
//! Traits that define the public API of this subsystem.

use crate::domain::address::AddressType;
use crate::domain::entities::{AddressClaim, AuthDecision, VerificationResult};
use crate::domain::errors::{AddressError, SignatureError};

/// Address-ownership API.
///
/// All operations are synchronous and side-effect free. Implementations
/// must be thread-safe (`Send + Sync`).
pub trait AddressOwnershipApi: Send + Sync {
    /// Classify an address into its family.
    fn classify(&self, address: &str) -> Result<AddressType, AddressError>;

    /// Verify a detached signature.
    ///
    /// # Errors
    /// * `SignatureError::Address` - the address is not supported
    /// * `SignatureError::InvalidFormat` - the blob cannot be parsed for the
    ///   address family
    ///
    /// A signature that parses but does not match is `Ok` with
    /// `verified == false`.
    fn verify(&self, claim: &AddressClaim) -> Result<VerificationResult, SignatureError>;

    /// Turn a claim into an accept/reject decision. Never fails.
    fn authenticate(&self, claim: &AddressClaim) -> AuthDecision;
}
