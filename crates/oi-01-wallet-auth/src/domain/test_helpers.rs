//! # Test Helpers
//!
//! Key generation and signing for every supported address family, so
//! tests can produce signatures the way browser wallets do.
//!
//! Available in unit tests and, for other crates, with the `test-utils`
//! feature.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use k256::schnorr;
use shared_types::Network;

use super::address::{decode, encode, AddressType};
use super::message::{hash160, signed_message_digest};
use super::transaction::{serialize_witness, VirtualTransactions, SIGHASH_ALL, SIGHASH_DEFAULT};

/// Header range a BIP-137 signature is emitted with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LegacyHeader {
    /// 27-30.
    Uncompressed,
    /// 31-34.
    Compressed,
    /// 35-38.
    NestedSegwit,
    /// 39-42.
    NativeSegwit,
}

impl LegacyHeader {
    fn base(self) -> u8 {
        match self {
            LegacyHeader::Uncompressed => 27,
            LegacyHeader::Compressed => 31,
            LegacyHeader::NestedSegwit => 35,
            LegacyHeader::NativeSegwit => 39,
        }
    }
}

/// Generate a new ECDSA keypair.
pub fn generate_keypair() -> (SigningKey, VerifyingKey) {
    let signing_key = SigningKey::random(&mut rand::thread_rng());
    let verifying_key = *signing_key.verifying_key();
    (signing_key, verifying_key)
}

/// Generate a new BIP-340 signing key.
pub fn generate_schnorr_key() -> schnorr::SigningKey {
    schnorr::SigningKey::random(&mut rand::thread_rng())
}

/// P2PKH address of `key`.
pub fn p2pkh_address(key: &VerifyingKey, compressed: bool, network: Network) -> String {
    let hash = hash160(key.to_encoded_point(compressed).as_bytes());
    encode(AddressType::P2pkh, network, &hash).expect("20-byte payload")
}

/// P2WPKH address of `key`.
pub fn p2wpkh_address(key: &VerifyingKey, network: Network) -> String {
    let hash = hash160(key.to_encoded_point(true).as_bytes());
    encode(AddressType::P2wpkh, network, &hash).expect("20-byte payload")
}

/// P2SH-P2WPKH address of `key`.
pub fn p2sh_p2wpkh_address(key: &VerifyingKey, network: Network) -> String {
    let mut redeem_script = vec![0x00, 0x14];
    redeem_script.extend_from_slice(&hash160(key.to_encoded_point(true).as_bytes()));
    encode(AddressType::P2shP2wpkh, network, &hash160(&redeem_script)).expect("20-byte payload")
}

/// P2TR address with `key` as the output key (no tweak).
pub fn p2tr_address(key: &schnorr::VerifyingKey, network: Network) -> String {
    encode(AddressType::P2tr, network, &key.to_bytes()).expect("32-byte payload")
}

/// BIP-137 compact signature over `message`, base64 encoded.
pub fn sign_compact(key: &SigningKey, message: &str, header: LegacyHeader) -> String {
    let digest = signed_message_digest(message);
    let (signature, recovery_id) = key
        .sign_prehash_recoverable(&digest)
        .expect("signing failed");

    let mut bytes = Vec::with_capacity(65);
    bytes.push(header.base() + recovery_id.to_byte());
    bytes.extend_from_slice(&signature.to_bytes());
    STANDARD.encode(bytes)
}

/// BIP-322 simple signature for a P2WPKH or P2SH-P2WPKH `address`.
pub fn sign_bip322_segwit(key: &SigningKey, address: &str, message: &str) -> String {
    let decoded = decode(address).expect("valid address");
    let public_key = key.verifying_key().to_encoded_point(true);
    let pubkey_hash = hash160(public_key.as_bytes());

    let digest = VirtualTransactions::new(&decoded.script_pubkey(), message)
        .segwit_v0_sighash(&pubkey_hash);
    let signature: Signature = key.sign_prehash(&digest).expect("signing failed");

    let mut item = signature.to_der().as_bytes().to_vec();
    item.push(SIGHASH_ALL);
    STANDARD.encode(serialize_witness(&[item, public_key.as_bytes().to_vec()]))
}

/// BIP-322 simple signature for a key-path P2TR `address`.
///
/// `explicit_all` appends `SIGHASH_ALL` (65-byte signature) instead of
/// using `SIGHASH_DEFAULT`.
pub fn sign_bip322_taproot(
    key: &schnorr::SigningKey,
    address: &str,
    message: &str,
    explicit_all: bool,
) -> String {
    let decoded = decode(address).expect("valid address");
    let hash_type = if explicit_all { SIGHASH_ALL } else { SIGHASH_DEFAULT };

    let digest =
        VirtualTransactions::new(&decoded.script_pubkey(), message).taproot_sighash(hash_type);
    let signature: schnorr::Signature = key.sign_prehash(&digest).expect("signing failed");

    let mut item = signature.to_bytes().to_vec();
    if explicit_all {
        item.push(SIGHASH_ALL);
    }
    STANDARD.encode(serialize_witness(&[item]))
}
