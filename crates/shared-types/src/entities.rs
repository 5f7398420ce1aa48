//! # Core Entities
//!
//! Wallet identity values and the fixed sign-in challenge.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ParseWalletProviderError;
use crate::network::Network;

/// The challenge every wallet signs to prove address ownership.
///
/// Fixed and public: a captured signature over it can be replayed, so
/// anything needing freshness must be layered on top.
pub const SIGN_IN_MESSAGE: &str = "Sign into NextJS Ordinals Application";

/// Browser wallets the sign-in flow accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WalletProvider {
    /// Unisat.
    Unisat,
    /// Xverse.
    Xverse,
    /// Magic Eden.
    MagicEden,
    /// Leather.
    Leather,
}

impl WalletProvider {
    /// Wire name of the provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            WalletProvider::Unisat => "unisat",
            WalletProvider::Xverse => "xverse",
            WalletProvider::MagicEden => "magic-eden",
            WalletProvider::Leather => "leather",
        }
    }
}

impl fmt::Display for WalletProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WalletProvider {
    type Err = ParseWalletProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unisat" => Ok(WalletProvider::Unisat),
            "xverse" => Ok(WalletProvider::Xverse),
            "magic-eden" | "magiceden" | "magic_eden" => Ok(WalletProvider::MagicEden),
            "leather" => Ok(WalletProvider::Leather),
            other => Err(ParseWalletProviderError(other.to_string())),
        }
    }
}

/// A wallet the user connected, as reported by the browser extension.
///
/// Ordinals wallets expose two accounts: the ordinals (taproot) account
/// receives inscriptions, the payment account funds them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedWallet {
    /// Address that receives inscriptions and signs the challenge.
    pub ordinals_address: String,
    /// Hex public key of the ordinals account.
    pub ordinals_public_key: String,
    /// Address that pays for inscriptions.
    pub payment_address: String,
    /// Hex public key of the payment account.
    pub payment_public_key: String,
    /// Extension that produced the addresses.
    pub wallet: WalletProvider,
    /// Network the wallet is connected to.
    #[serde(default)]
    pub network: Network,
}

impl ConnectedWallet {
    /// Address inscriptions should be delivered to.
    pub fn receive_address(&self) -> &str {
        &self.ordinals_address
    }
}
