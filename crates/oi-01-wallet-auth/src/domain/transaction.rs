//! # BIP-322 Virtual Transactions
//!
//! BIP-322 proves address ownership by signing a transaction that can
//! never be mined: `to_sign` spends output 0 of `to_spend`, which commits
//! to the message hash in its scriptSig. Only the pieces the simple
//! (witness-only) proof needs are modelled here:
//!
//! - the `to_spend` txid,
//! - the BIP-143 sighash for segwit v0 key-hash spends,
//! - the BIP-341 key-path sighash for taproot spends,
//! - witness stack (de)serialization.
//!
//! Both transactions are fixed apart from the message hash and the
//! address's output script: version 0, locktime 0, sequence 0, a single
//! zero-value output, and `OP_RETURN` as the `to_sign` output script.

use super::message::{bip322_message_hash, sha256, sha256d, tagged_hash, write_compact_size};

/// `OP_RETURN`, the only output script of `to_sign`.
const OP_RETURN: u8 = 0x6a;

/// `SIGHASH_ALL`.
pub const SIGHASH_ALL: u8 = 0x01;

/// BIP-341 `SIGHASH_DEFAULT` (64-byte schnorr signatures).
pub const SIGHASH_DEFAULT: u8 = 0x00;

/// Upper bound on the number of witness items accepted when parsing.
const MAX_WITNESS_ITEMS: u64 = 16;

/// The `to_spend` / `to_sign` pair for one message and address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VirtualTransactions {
    to_spend_txid: [u8; 32],
    script_pubkey: Vec<u8>,
}

impl VirtualTransactions {
    /// Build the pair for `message` signed by the owner of `script_pubkey`.
    pub fn new(script_pubkey: &[u8], message: &str) -> Self {
        let message_hash = bip322_message_hash(message);

        let mut tx = Vec::with_capacity(128);
        tx.extend_from_slice(&0u32.to_le_bytes()); // version
        write_compact_size(&mut tx, 1);
        tx.extend_from_slice(&[0u8; 32]); // prevout txid
        tx.extend_from_slice(&u32::MAX.to_le_bytes()); // prevout index
        write_compact_size(&mut tx, 34);
        tx.extend_from_slice(&[0x00, 0x20]); // OP_0 PUSH32
        tx.extend_from_slice(&message_hash);
        tx.extend_from_slice(&0u32.to_le_bytes()); // sequence
        write_compact_size(&mut tx, 1);
        tx.extend_from_slice(&0u64.to_le_bytes()); // value
        write_compact_size(&mut tx, script_pubkey.len() as u64);
        tx.extend_from_slice(script_pubkey);
        tx.extend_from_slice(&0u32.to_le_bytes()); // locktime

        Self {
            to_spend_txid: sha256d(&tx),
            script_pubkey: script_pubkey.to_vec(),
        }
    }

    /// Txid of `to_spend` in internal byte order.
    pub fn to_spend_txid(&self) -> [u8; 32] {
        self.to_spend_txid
    }

    /// Serialized outpoint `to_spend:0` spent by `to_sign`.
    fn outpoint(&self) -> [u8; 36] {
        let mut outpoint = [0u8; 36];
        outpoint[..32].copy_from_slice(&self.to_spend_txid);
        outpoint
    }

    /// Serialized outputs of `to_sign`.
    fn outputs() -> Vec<u8> {
        let mut outputs = Vec::with_capacity(10);
        outputs.extend_from_slice(&0u64.to_le_bytes());
        write_compact_size(&mut outputs, 1);
        outputs.push(OP_RETURN);
        outputs
    }

    /// BIP-143 `SIGHASH_ALL` digest for a P2WPKH (or nested P2WPKH) spend
    /// by the key hashing to `pubkey_hash`.
    pub fn segwit_v0_sighash(&self, pubkey_hash: &[u8; 20]) -> [u8; 32] {
        let mut preimage = Vec::with_capacity(182);
        preimage.extend_from_slice(&0u32.to_le_bytes()); // version
        preimage.extend_from_slice(&sha256d(&self.outpoint()));
        preimage.extend_from_slice(&sha256d(&0u32.to_le_bytes()));
        preimage.extend_from_slice(&self.outpoint());
        // scriptCode: OP_DUP OP_HASH160 <pkh> OP_EQUALVERIFY OP_CHECKSIG
        preimage.extend_from_slice(&[0x19, 0x76, 0xa9, 0x14]);
        preimage.extend_from_slice(pubkey_hash);
        preimage.extend_from_slice(&[0x88, 0xac]);
        preimage.extend_from_slice(&0u64.to_le_bytes()); // amount
        preimage.extend_from_slice(&0u32.to_le_bytes()); // sequence
        preimage.extend_from_slice(&sha256d(&Self::outputs()));
        preimage.extend_from_slice(&0u32.to_le_bytes()); // locktime
        preimage.extend_from_slice(&u32::from(SIGHASH_ALL).to_le_bytes());
        sha256d(&preimage)
    }

    /// BIP-341 key-path digest for `hash_type` (`SIGHASH_DEFAULT` or
    /// `SIGHASH_ALL`; both commit to every input and output).
    pub fn taproot_sighash(&self, hash_type: u8) -> [u8; 32] {
        let mut spk = Vec::with_capacity(self.script_pubkey.len() + 1);
        write_compact_size(&mut spk, self.script_pubkey.len() as u64);
        spk.extend_from_slice(&self.script_pubkey);

        let mut msg = Vec::with_capacity(175);
        msg.push(0x00); // epoch
        msg.push(hash_type);
        msg.extend_from_slice(&0u32.to_le_bytes()); // version
        msg.extend_from_slice(&0u32.to_le_bytes()); // locktime
        msg.extend_from_slice(&sha256(&self.outpoint()));
        msg.extend_from_slice(&sha256(&0u64.to_le_bytes()));
        msg.extend_from_slice(&sha256(&spk));
        msg.extend_from_slice(&sha256(&0u32.to_le_bytes()));
        msg.extend_from_slice(&sha256(&Self::outputs()));
        msg.push(0x00); // spend type: key path, no annex
        msg.extend_from_slice(&0u32.to_le_bytes()); // input index
        tagged_hash(b"TapSighash", &msg)
    }
}

// =============================================================================
// WITNESS STACK ENCODING
// =============================================================================

/// Serialize a witness stack (item count, then length-prefixed items).
pub fn serialize_witness(items: &[Vec<u8>]) -> Vec<u8> {
    let mut buf = Vec::new();
    write_compact_size(&mut buf, items.len() as u64);
    for item in items {
        write_compact_size(&mut buf, item.len() as u64);
        buf.extend_from_slice(item);
    }
    buf
}

/// Parse a serialized witness stack. `None` unless the input is exactly
/// one well-formed stack.
pub fn parse_witness(bytes: &[u8]) -> Option<Vec<Vec<u8>>> {
    let mut cursor = Cursor { bytes, pos: 0 };
    let count = cursor.compact_size()?;
    if count > MAX_WITNESS_ITEMS {
        return None;
    }

    let mut items = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let len = usize::try_from(cursor.compact_size()?).ok()?;
        items.push(cursor.take(len)?.to_vec());
    }

    (cursor.pos == bytes.len()).then_some(items)
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(n)?;
        let slice = self.bytes.get(self.pos..end)?;
        self.pos = end;
        Some(slice)
    }

    fn compact_size(&mut self) -> Option<u64> {
        let first = *self.take(1)?.first()?;
        let value = match first {
            0xfd => u64::from(u16::from_le_bytes(self.take(2)?.try_into().ok()?)),
            0xfe => u64::from(u32::from_le_bytes(self.take(4)?.try_into().ok()?)),
            0xff => u64::from_le_bytes(self.take(8)?.try_into().ok()?),
            n => u64::from(n),
        };
        Some(value)
    }
}
