//! # Wallet Auth Configuration
//!
//! Configuration for the session gate.

use serde::{Deserialize, Serialize};
use shared_types::Network;

/// Session gate configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Network sign-in addresses must belong to. `None` accepts any.
    pub expected_network: Option<Network>,

    /// Accept BIP-137 compact signatures for segwit addresses.
    /// P2PKH addresses always use them.
    pub accept_legacy_segwit_signatures: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            expected_network: Some(Network::default()),
            accept_legacy_segwit_signatures: true,
        }
    }
}

impl AuthConfig {
    /// Create a config for testing (any network).
    pub fn for_testing() -> Self {
        Self {
            expected_network: None,
            accept_legacy_segwit_signatures: true,
        }
    }
}
