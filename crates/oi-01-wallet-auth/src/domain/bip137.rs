//! # BIP-137 Compact Signatures
//!
//! Legacy "signmessage" signatures: 65 bytes, a header byte followed by
//! `r || s`. The header encodes the recovery id and the key encoding:
//!
//! | Header | Key |
//! |--------|-----|
//! | 27-30 | uncompressed, P2PKH |
//! | 31-34 | compressed, P2PKH |
//! | 35-38 | compressed, P2SH-P2WPKH |
//! | 39-42 | compressed, P2WPKH |
//!
//! Wallets are inconsistent about which header range they emit for segwit
//! addresses, so only the recovery id and compression flag are read from
//! it; the address family comes from the codec.

use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};

use super::address::{AddressType, DecodedAddress};
use super::message::{hash160, signed_message_digest};

/// Length of a compact signature.
pub const COMPACT_SIGNATURE_LEN: usize = 65;

/// Valid header byte range.
pub const HEADER_RANGE: std::ops::RangeInclusive<u8> = 27..=42;

/// A compact signature whose envelope (length, header range) is valid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompactSignature {
    header: u8,
    rs: [u8; 64],
}

impl CompactSignature {
    /// Parse the envelope. Returns `None` on a bad length or header.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != COMPACT_SIGNATURE_LEN || !HEADER_RANGE.contains(&bytes[0]) {
            return None;
        }
        let mut rs = [0u8; 64];
        rs.copy_from_slice(&bytes[1..]);
        Some(Self {
            header: bytes[0],
            rs,
        })
    }

    /// Recovery id encoded in the header (0-3).
    pub fn recovery_id(&self) -> u8 {
        (self.header - 27) & 3
    }

    /// Whether the signer's key is serialized compressed.
    pub fn is_compressed(&self) -> bool {
        self.header >= 31
    }

    /// Recover the signing key for `message`.
    ///
    /// High-S signatures are normalized first; flipping `s` negates `R`,
    /// so the recovery id's y-parity bit flips with it.
    pub fn recover(&self, message: &str) -> Option<VerifyingKey> {
        let digest = signed_message_digest(message);
        let mut signature = Signature::from_slice(&self.rs).ok()?;
        let mut recovery_id = RecoveryId::try_from(self.recovery_id()).ok()?;

        if let Some(normalized) = signature.normalize_s() {
            signature = normalized;
            recovery_id = RecoveryId::new(!recovery_id.is_y_odd(), recovery_id.is_x_reduced());
        }

        VerifyingKey::recover_from_prehash(&digest, &signature, recovery_id).ok()
    }
}

/// Verify a compact signature against a decoded P2PKH, P2SH-P2WPKH or
/// P2WPKH address. Taproot addresses never verify.
pub fn verify(address: &DecodedAddress, signature: &CompactSignature, message: &str) -> bool {
    let Some(key) = signature.recover(message) else {
        return false;
    };

    let compressed = signature.is_compressed();
    let key_bytes = key.to_encoded_point(compressed);
    let key_hash = hash160(key_bytes.as_bytes());

    match address.address_type {
        AddressType::P2pkh => key_hash[..] == address.payload[..],
        AddressType::P2wpkh => compressed && key_hash[..] == address.payload[..],
        AddressType::P2shP2wpkh => {
            let mut redeem_script = Vec::with_capacity(22);
            redeem_script.extend_from_slice(&[0x00, 0x14]);
            redeem_script.extend_from_slice(&key_hash);
            compressed && hash160(&redeem_script)[..] == address.payload[..]
        }
        AddressType::P2tr => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::address::decode;
    use crate::domain::test_helpers::*;
    use shared_types::{Network, SIGN_IN_MESSAGE};

    fn envelope(signature_b64: &str) -> CompactSignature {
        use base64::Engine;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(signature_b64)
            .unwrap();
        CompactSignature::from_bytes(&bytes).unwrap()
    }

    // RFC 6979 signatures over "Hello World" from the BIP-322 test key
    // L3VFeEujGtevx9w18HD1fhRbCH67Az2dpCymeRE1SoPK6XQtaN2k, as produced
    // by `signmessage`.
    const KNOWN_P2PKH: &str = "14vV3aCHBeStb5bkenkNHbe2YAFinYdXgc";
    const KNOWN_P2PKH_SIGNATURE: &str =
        "IOW2xi+ebJLeBtr674l4QH76dqDoVjLV80R9EFKFQX5rBrlCXPIZaYs8Yuayg0ZqjyiCbLy9pzZIS7JWT65/nsU=";
    const KNOWN_P2WPKH: &str = "bc1q9vza2e8x573nczrlzms0wvx3gsqjx7vavgkx0l";
    const KNOWN_P2WPKH_SIGNATURE: &str =
        "KOW2xi+ebJLeBtr674l4QH76dqDoVjLV80R9EFKFQX5rBrlCXPIZaYs8Yuayg0ZqjyiCbLy9pzZIS7JWT65/nsU=";

    #[test]
    fn test_known_signatures_verify() {
        let p2pkh = decode(KNOWN_P2PKH).unwrap();
        let signature = envelope(KNOWN_P2PKH_SIGNATURE);
        assert!(signature.is_compressed());
        assert!(verify(&p2pkh, &signature, "Hello World"));
        assert!(!verify(&p2pkh, &signature, "Hello World "));

        let p2wpkh = decode(KNOWN_P2WPKH).unwrap();
        assert!(verify(&p2wpkh, &envelope(KNOWN_P2WPKH_SIGNATURE), "Hello World"));

        // Same key, so the two addresses share a key hash.
        assert_eq!(p2pkh.payload, p2wpkh.payload);
    }

    #[test]
    fn test_envelope_rejects_bad_length_and_header() {
        assert!(CompactSignature::from_bytes(&[27u8; 64]).is_none());
        let mut bytes = [0u8; 65];
        bytes[0] = 26;
        assert!(CompactSignature::from_bytes(&bytes).is_none());
        bytes[0] = 43;
        assert!(CompactSignature::from_bytes(&bytes).is_none());
        bytes[0] = 42;
        assert!(CompactSignature::from_bytes(&bytes).is_some());
    }

    #[test]
    fn test_header_decoding() {
        let mut bytes = [1u8; 65];
        bytes[0] = 28;
        let sig = CompactSignature::from_bytes(&bytes).unwrap();
        assert_eq!(sig.recovery_id(), 1);
        assert!(!sig.is_compressed());

        bytes[0] = 40;
        let sig = CompactSignature::from_bytes(&bytes).unwrap();
        assert_eq!(sig.recovery_id(), 1);
        assert!(sig.is_compressed());
    }

    #[test]
    fn test_verify_each_family() {
        let (signing_key, verifying_key) = generate_keypair();
        let cases = [
            (p2pkh_address(&verifying_key, false, Network::Mainnet), LegacyHeader::Uncompressed),
            (p2pkh_address(&verifying_key, true, Network::Mainnet), LegacyHeader::Compressed),
            (p2sh_p2wpkh_address(&verifying_key, Network::Mainnet), LegacyHeader::NestedSegwit),
            (p2wpkh_address(&verifying_key, Network::Signet), LegacyHeader::NativeSegwit),
        ];

        for (address, header) in cases {
            let decoded = decode(&address).unwrap();
            let signature = envelope(&sign_compact(&signing_key, SIGN_IN_MESSAGE, header));
            assert!(verify(&decoded, &signature, SIGN_IN_MESSAGE), "{address}");
            assert!(!verify(&decoded, &signature, "Sign into NextJS Ordinals Application."));
        }
    }

    #[test]
    fn test_compression_flag_must_match_address() {
        let (signing_key, verifying_key) = generate_keypair();
        let address = p2pkh_address(&verifying_key, true, Network::Mainnet);
        let decoded = decode(&address).unwrap();
        let signature = envelope(&sign_compact(
            &signing_key,
            SIGN_IN_MESSAGE,
            LegacyHeader::Uncompressed,
        ));
        assert!(!verify(&decoded, &signature, SIGN_IN_MESSAGE));
    }

    #[test]
    fn test_high_s_signature_is_normalized() {
        let (signing_key, verifying_key) = generate_keypair();
        let address = p2wpkh_address(&verifying_key, Network::Mainnet);
        let decoded = decode(&address).unwrap();

        let low = envelope(&sign_compact(
            &signing_key,
            SIGN_IN_MESSAGE,
            LegacyHeader::NativeSegwit,
        ));
        let high = envelope(&to_high_s(&low));
        assert!(verify(&decoded, &high, SIGN_IN_MESSAGE));
    }

    #[test]
    fn test_other_key_does_not_verify() {
        let (signing_key, _) = generate_keypair();
        let (_, other_key) = generate_keypair();
        let decoded = decode(&p2wpkh_address(&other_key, Network::Mainnet)).unwrap();
        let signature = envelope(&sign_compact(
            &signing_key,
            SIGN_IN_MESSAGE,
            LegacyHeader::NativeSegwit,
        ));
        assert!(!verify(&decoded, &signature, SIGN_IN_MESSAGE));
    }

    /// Re-encode a compact signature with `s' = n - s` and the header's
    /// y-parity flipped, producing the malleated twin.
    fn to_high_s(sig: &CompactSignature) -> String {
        use base64::Engine;
        let signature = Signature::from_slice(&sig.rs).unwrap();
        let s: k256::Scalar = *signature.s().as_ref();
        let mut rs = sig.rs;
        rs[32..].copy_from_slice(&(-s).to_bytes());
        let high = Signature::from_slice(&rs).unwrap();
        assert!(high.normalize_s().is_some());

        let recovery_id = sig.recovery_id();
        let mut bytes = vec![sig.header - recovery_id + (recovery_id ^ 1)];
        bytes.extend_from_slice(&rs);
        base64::engine::general_purpose::STANDARD.encode(bytes)
    }
}
