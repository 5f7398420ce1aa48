//! # Message Hashing
//!
//! Hash primitives shared by the codec and both signature schemes.
//!
//! - `signed_message_digest`: the legacy "Bitcoin Signed Message" digest
//!   consumed by BIP-137 compact signatures.
//! - `bip322_message_hash`: the BIP-340 tagged hash BIP-322 commits to in
//!   its virtual `to_spend` transaction.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Prefix of the legacy signed-message envelope (length byte included).
const SIGNED_MESSAGE_PREFIX: &[u8] = b"\x18Bitcoin Signed Message:\n";

/// Tag of the BIP-322 message hash.
const BIP322_TAG: &[u8] = b"BIP0322-signed-message";

/// Single SHA-256.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Double SHA-256, as used for txids and base58check.
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// RIPEMD-160 of SHA-256, the pubkey/script hash inside addresses.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(sha256(data)).into()
}

/// BIP-340 tagged hash: `SHA256(SHA256(tag) || SHA256(tag) || data)`.
pub fn tagged_hash(tag: &[u8], data: &[u8]) -> [u8; 32] {
    let tag_hash = sha256(tag);
    let mut hasher = Sha256::new();
    hasher.update(tag_hash);
    hasher.update(tag_hash);
    hasher.update(data);
    hasher.finalize().into()
}

/// Append a Bitcoin CompactSize integer.
pub fn write_compact_size(buf: &mut Vec<u8>, n: u64) {
    match n {
        0..=0xfc => buf.push(n as u8),
        0xfd..=0xffff => {
            buf.push(0xfd);
            buf.extend_from_slice(&(n as u16).to_le_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            buf.push(0xfe);
            buf.extend_from_slice(&(n as u32).to_le_bytes());
        }
        _ => {
            buf.push(0xff);
            buf.extend_from_slice(&n.to_le_bytes());
        }
    }
}

/// Digest signed by BIP-137 compact signatures.
pub fn signed_message_digest(message: &str) -> [u8; 32] {
    let bytes = message.as_bytes();
    let mut buf = Vec::with_capacity(SIGNED_MESSAGE_PREFIX.len() + 9 + bytes.len());
    buf.extend_from_slice(SIGNED_MESSAGE_PREFIX);
    write_compact_size(&mut buf, bytes.len() as u64);
    buf.extend_from_slice(bytes);
    sha256d(&buf)
}

/// Message hash committed to by BIP-322's `to_spend` transaction.
pub fn bip322_message_hash(message: &str) -> [u8; 32] {
    tagged_hash(BIP322_TAG, message.as_bytes())
}
