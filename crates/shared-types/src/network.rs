//! # Bitcoin Networks
//!
//! Per-network encoding parameters used to classify and render addresses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ParseNetworkError;

/// A Bitcoin network an address can belong to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Bitcoin mainnet.
    Mainnet,
    /// Testnet3.
    Testnet,
    /// Default signet. Shares testnet's address encodings.
    #[default]
    Signet,
    /// Local regression-test network.
    Regtest,
}

impl Network {
    /// All known networks, in HRP-matching order.
    pub const ALL: [Network; 4] = [
        Network::Mainnet,
        Network::Testnet,
        Network::Signet,
        Network::Regtest,
    ];

    /// Bech32 human-readable part for segwit addresses.
    pub fn bech32_hrp(&self) -> &'static str {
        match self {
            Network::Mainnet => "bc",
            Network::Testnet | Network::Signet => "tb",
            Network::Regtest => "bcrt",
        }
    }

    /// Base58check version byte for pay-to-pubkey-hash addresses.
    pub fn p2pkh_version(&self) -> u8 {
        match self {
            Network::Mainnet => 0x00,
            _ => 0x6f,
        }
    }

    /// Base58check version byte for pay-to-script-hash addresses.
    pub fn p2sh_version(&self) -> u8 {
        match self {
            Network::Mainnet => 0x05,
            _ => 0xc4,
        }
    }

    /// Path prefix used by mempool-style REST APIs (`/signet/api/...`).
    ///
    /// Regtest has no public instance and maps to the root.
    pub fn rest_path_prefix(&self) -> &'static str {
        match self {
            Network::Mainnet | Network::Regtest => "",
            Network::Testnet => "/testnet",
            Network::Signet => "/signet",
        }
    }

    /// Whether two networks share address encodings.
    ///
    /// Testnet and signet addresses are indistinguishable on the wire.
    pub fn shares_encoding_with(&self, other: Network) -> bool {
        self.bech32_hrp() == other.bech32_hrp()
    }

    /// Networks whose bech32 HRP equals `hrp` (case-insensitive).
    pub fn from_bech32_hrp(hrp: &str) -> Option<Network> {
        Network::ALL
            .into_iter()
            .find(|n| n.bech32_hrp().eq_ignore_ascii_case(hrp))
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Signet => "signet",
            Network::Regtest => "regtest",
        };
        f.write_str(name)
    }
}

impl FromStr for Network {
    type Err = ParseNetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" | "bitcoin" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "signet" => Ok(Network::Signet),
            "regtest" => Ok(Network::Regtest),
            other => Err(ParseNetworkError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hrp_per_network() {
        assert_eq!(Network::Mainnet.bech32_hrp(), "bc");
        assert_eq!(Network::Signet.bech32_hrp(), "tb");
        assert_eq!(Network::Regtest.bech32_hrp(), "bcrt");
    }

    #[test]
    fn test_version_bytes() {
        assert_eq!(Network::Mainnet.p2pkh_version(), 0x00);
        assert_eq!(Network::Mainnet.p2sh_version(), 0x05);
        assert_eq!(Network::Testnet.p2pkh_version(), 0x6f);
        assert_eq!(Network::Signet.p2sh_version(), 0xc4);
    }

    #[test]
    fn test_from_hrp_is_case_insensitive() {
        assert_eq!(Network::from_bech32_hrp("BC"), Some(Network::Mainnet));
        assert_eq!(Network::from_bech32_hrp("bcrt"), Some(Network::Regtest));
        assert_eq!(Network::from_bech32_hrp("ltc"), None);
    }

    #[test]
    fn test_signet_shares_testnet_encoding() {
        assert!(Network::Signet.shares_encoding_with(Network::Testnet));
        assert!(!Network::Signet.shares_encoding_with(Network::Mainnet));
    }

    #[test]
    fn test_parse_round_trip() {
        for network in Network::ALL {
            assert_eq!(network.to_string().parse::<Network>().unwrap(), network);
        }
        assert!("litecoin".parse::<Network>().is_err());
    }

    #[test]
    fn test_default_is_signet() {
        assert_eq!(Network::default(), Network::Signet);
    }
}
