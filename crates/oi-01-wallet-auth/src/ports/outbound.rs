//! # Outbound Ports (Driven Ports / SPI)
//!
//! Dependencies this subsystem needs: an identity provider that turns a
//! proven address into a session.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use parking_lot::Mutex;
use thiserror::Error;

use crate::domain::entities::{AuthenticatedIdentity, SessionToken};

/// Error from identity provider operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityProviderError {
    /// The provider could not be reached.
    #[error("Identity provider unavailable: {0}")]
    Unavailable(String),

    /// The provider refused to issue a session.
    #[error("Identity provider rejected the request ({status}): {message}")]
    Rejected {
        /// Upstream status code.
        status: u16,
        /// Upstream message.
        message: String,
    },

    /// The provider answered with something unreadable.
    #[error("Invalid identity provider response: {0}")]
    InvalidResponse(String),
}

/// Session issuer for proven addresses.
///
/// Only ever called with an `Accepted` identity.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Issue a session for `identity`.
    async fn issue_session(
        &self,
        identity: &AuthenticatedIdentity,
    ) -> Result<SessionToken, IdentityProviderError>;
}

/// Subject handed to the identity provider for `address`: the standard
/// base64 encoding of the address string.
pub fn identity_subject(address: &str) -> String {
    STANDARD.encode(address.as_bytes())
}

/// Mock identity provider for testing.
///
/// Issues `session-<subject>` tokens and records every identity it saw.
#[derive(Debug, Default)]
pub struct MockIdentityProvider {
    /// Should fail?
    pub should_fail: bool,
    issued: Mutex<Vec<AuthenticatedIdentity>>,
}

impl MockIdentityProvider {
    /// A provider that always fails.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Default::default()
        }
    }

    /// Identities a session was issued for, in order.
    pub fn issued(&self) -> Vec<AuthenticatedIdentity> {
        self.issued.lock().clone()
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn issue_session(
        &self,
        identity: &AuthenticatedIdentity,
    ) -> Result<SessionToken, IdentityProviderError> {
        if self.should_fail {
            return Err(IdentityProviderError::Unavailable("Mock failure".to_string()));
        }
        self.issued.lock().push(identity.clone());
        Ok(SessionToken(format!(
            "session-{}",
            identity_subject(&identity.address)
        )))
    }
}
