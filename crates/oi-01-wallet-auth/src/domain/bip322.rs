//! # BIP-322 Simple Signatures
//!
//! A simple BIP-322 signature is the consensus-serialized witness stack
//! that would spend `to_spend:0` from `to_sign`. Supported spends:
//!
//! - P2WPKH and P2SH-P2WPKH: `[DER sig || sighash, 33-byte pubkey]`
//! - P2TR key path: `[64-byte schnorr sig]` or `[65-byte sig || 0x01]`
//!
//! Envelope problems (item count, item sizes, a family without a simple
//! form) are `SignatureError::InvalidFormat`. Everything after that is a
//! plain `false`.

use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::{ecdsa, schnorr};

use super::address::{AddressType, DecodedAddress};
use super::errors::SignatureError;
use super::message::hash160;
use super::transaction::{VirtualTransactions, SIGHASH_ALL};

/// Compressed SEC1 public key length.
const COMPRESSED_KEY_LEN: usize = 33;

/// Bounds on a DER signature plus its sighash byte.
const MIN_ECDSA_ITEM_LEN: usize = 9;
const MAX_ECDSA_ITEM_LEN: usize = 73;

/// Verify a parsed witness stack for `address` over `message`.
pub fn verify(
    address: &DecodedAddress,
    witness: &[Vec<u8>],
    message: &str,
) -> Result<bool, SignatureError> {
    match address.address_type {
        AddressType::P2wpkh | AddressType::P2shP2wpkh => verify_segwit_v0(address, witness, message),
        AddressType::P2tr => verify_taproot(address, witness, message),
        AddressType::P2pkh => Err(SignatureError::InvalidFormat(
            "p2pkh addresses have no BIP-322 simple signature",
        )),
    }
}

fn verify_segwit_v0(
    address: &DecodedAddress,
    witness: &[Vec<u8>],
    message: &str,
) -> Result<bool, SignatureError> {
    let [signature, public_key] = witness else {
        return Err(SignatureError::InvalidFormat(
            "segwit v0 witness must hold a signature and a public key",
        ));
    };
    if !(MIN_ECDSA_ITEM_LEN..=MAX_ECDSA_ITEM_LEN).contains(&signature.len()) {
        return Err(SignatureError::InvalidFormat("ecdsa witness item length"));
    }
    if public_key.len() != COMPRESSED_KEY_LEN {
        return Err(SignatureError::InvalidFormat("witness public key length"));
    }

    let Some((&sighash_type, der)) = signature.split_last() else {
        return Ok(false);
    };
    if sighash_type != SIGHASH_ALL {
        return Ok(false);
    }

    let pubkey_hash = hash160(public_key);
    let committed = match address.address_type {
        AddressType::P2wpkh => pubkey_hash.to_vec(),
        _ => {
            let mut redeem_script = Vec::with_capacity(22);
            redeem_script.extend_from_slice(&[0x00, 0x14]);
            redeem_script.extend_from_slice(&pubkey_hash);
            hash160(&redeem_script).to_vec()
        }
    };
    if committed != address.payload {
        return Ok(false);
    }

    let (Ok(signature), Ok(key)) = (
        ecdsa::Signature::from_der(der),
        ecdsa::VerifyingKey::from_sec1_bytes(public_key),
    ) else {
        return Ok(false);
    };

    let digest = VirtualTransactions::new(&address.script_pubkey(), message)
        .segwit_v0_sighash(&pubkey_hash);
    Ok(key.verify_prehash(&digest, &signature).is_ok())
}

fn verify_taproot(
    address: &DecodedAddress,
    witness: &[Vec<u8>],
    message: &str,
) -> Result<bool, SignatureError> {
    let [signature] = witness else {
        return Err(SignatureError::InvalidFormat(
            "taproot key-path witness must hold one signature",
        ));
    };

    let (sig_bytes, hash_type) = match signature.len() {
        64 => (&signature[..], 0x00),
        65 => (&signature[..64], signature[64]),
        _ => return Err(SignatureError::InvalidFormat("schnorr signature length")),
    };
    // A 65-byte signature must carry an explicit hash type other than DEFAULT.
    if signature.len() == 65 && hash_type != SIGHASH_ALL {
        return Ok(false);
    }

    let (Ok(signature), Ok(key)) = (
        schnorr::Signature::try_from(sig_bytes),
        schnorr::VerifyingKey::from_bytes(&address.payload),
    ) else {
        return Ok(false);
    };

    let digest =
        VirtualTransactions::new(&address.script_pubkey(), message).taproot_sighash(hash_type);
    Ok(key.verify_prehash(&digest, &signature).is_ok())
}
