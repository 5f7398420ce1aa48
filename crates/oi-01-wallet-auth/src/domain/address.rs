//! # Address Codec
//!
//! Classifies, decodes and encodes the address families the sign-in flow
//! accepts. Pure functions, no I/O.
//!
//! | Family | Encoding | Marker |
//! |--------|----------|--------|
//! | P2PKH | base58check | version `0x00` / `0x6f` |
//! | P2SH-P2WPKH | base58check | version `0x05` / `0xc4` |
//! | P2WPKH | bech32 | witness v0, 20-byte program |
//! | P2TR | bech32m | witness v1, 32-byte program |
//!
//! Anything else (P2WSH, future witness versions, other coins) is
//! `AddressError::Unsupported`. A recognized shape whose checksum fails is
//! `AddressError::InvalidChecksum`.

use std::fmt;

use bech32::{FromBase32, ToBase32, Variant};
use serde::{Deserialize, Serialize};
use shared_types::Network;

use super::errors::AddressError;
use super::message::sha256d;

/// Length of a base58check address payload: version + hash + checksum.
const BASE58_ADDRESS_LEN: usize = 25;

/// Supported address families.
///
/// Each variant selects exactly one verification strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AddressType {
    /// Legacy pay-to-pubkey-hash.
    P2pkh,
    /// Pay-to-script-hash wrapping a P2WPKH redeem script.
    P2shP2wpkh,
    /// Native segwit v0 pay-to-witness-pubkey-hash.
    P2wpkh,
    /// Segwit v1 taproot output.
    P2tr,
}

impl AddressType {
    /// Short display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressType::P2pkh => "p2pkh",
            AddressType::P2shP2wpkh => "p2sh-p2wpkh",
            AddressType::P2wpkh => "p2wpkh",
            AddressType::P2tr => "p2tr",
        }
    }

    /// Length of the hash or key the address commits to.
    pub fn payload_len(&self) -> usize {
        match self {
            AddressType::P2tr => 32,
            _ => 20,
        }
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedAddress {
    /// Address family.
    pub address_type: AddressType,
    /// Network the encoding belongs to. Testnet stands in for signet,
    /// which shares its encodings.
    pub network: Network,
    /// Pubkey hash, script hash or x-only output key.
    pub payload: Vec<u8>,
}

impl DecodedAddress {
    /// Output script paying to this address.
    pub fn script_pubkey(&self) -> Vec<u8> {
        let mut script = Vec::with_capacity(34);
        match self.address_type {
            AddressType::P2pkh => {
                script.extend_from_slice(&[0x76, 0xa9, 0x14]);
                script.extend_from_slice(&self.payload);
                script.extend_from_slice(&[0x88, 0xac]);
            }
            AddressType::P2shP2wpkh => {
                script.extend_from_slice(&[0xa9, 0x14]);
                script.extend_from_slice(&self.payload);
                script.push(0x87);
            }
            AddressType::P2wpkh => {
                script.extend_from_slice(&[0x00, 0x14]);
                script.extend_from_slice(&self.payload);
            }
            AddressType::P2tr => {
                script.extend_from_slice(&[0x51, 0x20]);
                script.extend_from_slice(&self.payload);
            }
        }
        script
    }

    /// Whether this address is valid on `network`.
    ///
    /// Base58 encodings are shared by every non-mainnet network; bech32
    /// encodings are shared by testnet and signet only.
    pub fn is_for(&self, network: Network) -> bool {
        match self.address_type {
            AddressType::P2pkh | AddressType::P2shP2wpkh => {
                self.network.p2pkh_version() == network.p2pkh_version()
            }
            AddressType::P2wpkh | AddressType::P2tr => self.network.shares_encoding_with(network),
        }
    }

    /// Canonical string form.
    pub fn to_address_string(&self) -> Result<String, AddressError> {
        encode(self.address_type, self.network, &self.payload)
    }
}

/// Classify an address without keeping its payload.
pub fn classify(address: &str) -> Result<AddressType, AddressError> {
    decode(address).map(|decoded| decoded.address_type)
}

/// Decode an address of any supported family and network.
pub fn decode(address: &str) -> Result<DecodedAddress, AddressError> {
    let address = address.trim();
    if address.is_empty() {
        return Err(AddressError::Unsupported("empty address".into()));
    }

    match bech32_network(address) {
        Some(network) => decode_segwit(address, network),
        None => decode_base58(address),
    }
}

/// Decode an address and require it to belong to `expected`.
///
/// Networks sharing an encoding are interchangeable (see `DecodedAddress::is_for`).
pub fn decode_for_network(
    address: &str,
    expected: Network,
) -> Result<DecodedAddress, AddressError> {
    let decoded = decode(address)?;
    if !decoded.is_for(expected) {
        return Err(AddressError::WrongNetwork {
            expected,
            actual: decoded.network,
        });
    }
    Ok(decoded)
}

/// Render an address from its parts.
pub fn encode(
    address_type: AddressType,
    network: Network,
    payload: &[u8],
) -> Result<String, AddressError> {
    if payload.len() != address_type.payload_len() {
        return Err(AddressError::Unsupported(format!(
            "{} payload must be {} bytes, got {}",
            address_type,
            address_type.payload_len(),
            payload.len()
        )));
    }

    let (witness_version, variant) = match address_type {
        AddressType::P2pkh => return Ok(encode_base58(network.p2pkh_version(), payload)),
        AddressType::P2shP2wpkh => return Ok(encode_base58(network.p2sh_version(), payload)),
        AddressType::P2wpkh => (0u8, Variant::Bech32),
        AddressType::P2tr => (1u8, Variant::Bech32m),
    };

    let mut data = vec![bech32::u5::try_from_u8(witness_version)
        .map_err(|e| AddressError::Unsupported(e.to_string()))?];
    data.extend(payload.to_base32());
    bech32::encode(network.bech32_hrp(), data, variant)
        .map_err(|e| AddressError::Unsupported(e.to_string()))
}

// =============================================================================
// BECH32 / BECH32M
// =============================================================================

/// Network whose HRP prefixes the address, if it looks like bech32.
fn bech32_network(address: &str) -> Option<Network> {
    let separator = address.rfind('1')?;
    Network::from_bech32_hrp(&address[..separator])
}

fn decode_segwit(address: &str, network: Network) -> Result<DecodedAddress, AddressError> {
    let has_lower = address.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = address.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        return Err(AddressError::Unsupported("mixed-case bech32".into()));
    }

    let (_, data, variant) = bech32::decode(address).map_err(|e| match e {
        bech32::Error::InvalidChecksum => AddressError::InvalidChecksum,
        other => AddressError::Unsupported(other.to_string()),
    })?;

    let (version, program) = data
        .split_first()
        .ok_or_else(|| AddressError::Unsupported("missing witness version".into()))?;
    let program = Vec::<u8>::from_base32(program)
        .map_err(|e| AddressError::Unsupported(e.to_string()))?;

    let address_type = match (version.to_u8(), program.len()) {
        (0, 20) => AddressType::P2wpkh,
        (1, 32) => AddressType::P2tr,
        (0, 32) => return Err(AddressError::Unsupported("p2wsh is not supported".into())),
        (v, len) => {
            return Err(AddressError::Unsupported(format!(
                "witness v{v} with {len}-byte program"
            )))
        }
    };

    // BIP-350: v0 must use bech32, v1+ must use bech32m.
    let expected_variant = match address_type {
        AddressType::P2wpkh => Variant::Bech32,
        _ => Variant::Bech32m,
    };
    if variant != expected_variant {
        return Err(AddressError::InvalidChecksum);
    }

    Ok(DecodedAddress {
        address_type,
        network,
        payload: program,
    })
}

// =============================================================================
// BASE58CHECK
// =============================================================================

fn decode_base58(address: &str) -> Result<DecodedAddress, AddressError> {
    let raw = bs58::decode(address)
        .into_vec()
        .map_err(|e| AddressError::Unsupported(e.to_string()))?;
    if raw.len() != BASE58_ADDRESS_LEN {
        return Err(AddressError::Unsupported(format!(
            "base58 payload of {} bytes",
            raw.len()
        )));
    }

    let (address_type, network) = match raw[0] {
        0x00 => (AddressType::P2pkh, Network::Mainnet),
        0x6f => (AddressType::P2pkh, Network::Testnet),
        0x05 => (AddressType::P2shP2wpkh, Network::Mainnet),
        0xc4 => (AddressType::P2shP2wpkh, Network::Testnet),
        version => {
            return Err(AddressError::Unsupported(format!(
                "base58 version byte 0x{version:02x}"
            )))
        }
    };

    let (body, checksum) = raw.split_at(BASE58_ADDRESS_LEN - 4);
    if sha256d(body)[..4] != *checksum {
        return Err(AddressError::InvalidChecksum);
    }

    Ok(DecodedAddress {
        address_type,
        network,
        payload: body[1..].to_vec(),
    })
}

fn encode_base58(version: u8, payload: &[u8]) -> String {
    let mut body = Vec::with_capacity(1 + payload.len());
    body.push(version);
    body.extend_from_slice(payload);
    bs58::encode(body).with_check().into_string()
}
