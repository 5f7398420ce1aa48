//! # Signature Verifier
//!
//! Dispatches a claim to the verification strategy of its address family.
//!
//! | Family | BIP-137 compact | BIP-322 simple |
//! |--------|-----------------|----------------|
//! | P2PKH | yes | no |
//! | P2SH-P2WPKH | yes | yes |
//! | P2WPKH | yes | yes |
//! | P2TR | no | yes |
//!
//! A blob of exactly 65 bytes is read as a compact signature; anything
//! else must be a serialized witness stack.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::address::{self, AddressType, DecodedAddress};
use super::bip137::{self, CompactSignature, COMPACT_SIGNATURE_LEN};
use super::bip322;
use super::entities::{AddressClaim, VerificationResult};
use super::errors::SignatureError;
use super::transaction::parse_witness;

/// Parsed signature envelope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignatureEnvelope {
    /// BIP-137 compact signature.
    Compact(CompactSignature),
    /// BIP-322 simple signature (witness stack).
    Witness(Vec<Vec<u8>>),
}

impl SignatureEnvelope {
    /// Decode a base64 signature blob.
    pub fn parse(signature: &str) -> Result<Self, SignatureError> {
        let bytes = STANDARD
            .decode(signature.trim())
            .map_err(|_| SignatureError::InvalidFormat("signature is not base64"))?;

        if bytes.len() == COMPACT_SIGNATURE_LEN {
            return CompactSignature::from_bytes(&bytes)
                .map(SignatureEnvelope::Compact)
                .ok_or(SignatureError::InvalidFormat("compact signature header out of range"));
        }

        parse_witness(&bytes)
            .map(SignatureEnvelope::Witness)
            .ok_or(SignatureError::InvalidFormat("signature is not a witness stack"))
    }
}

/// Verify a claim against its address.
pub fn verify(claim: &AddressClaim) -> Result<VerificationResult, SignatureError> {
    let decoded = address::decode(&claim.address)?;
    verify_decoded(&decoded, &claim.message, &claim.signature)
}

/// Verify a signature against an already decoded address.
pub fn verify_decoded(
    address: &DecodedAddress,
    message: &str,
    signature: &str,
) -> Result<VerificationResult, SignatureError> {
    let envelope = SignatureEnvelope::parse(signature)?;

    let verified = match (address.address_type, envelope) {
        (AddressType::P2tr, SignatureEnvelope::Compact(_)) => {
            return Err(SignatureError::InvalidFormat(
                "taproot addresses require a BIP-322 signature",
            ))
        }
        (_, SignatureEnvelope::Compact(compact)) => bip137::verify(address, &compact, message),
        (_, SignatureEnvelope::Witness(stack)) => bip322::verify(address, &stack, message)?,
    };

    Ok(VerificationResult {
        verified,
        address_type: address.address_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_helpers::*;
    use proptest::prelude::*;
    use shared_types::{Network, SIGN_IN_MESSAGE};

    /// One correctly signed claim per supported family and envelope.
    fn signed_claims() -> Vec<(AddressClaim, AddressType)> {
        let (key, vk) = generate_keypair();
        let schnorr_key = generate_schnorr_key();

        let p2pkh = p2pkh_address(&vk, true, Network::Mainnet);
        let nested = p2sh_p2wpkh_address(&vk, Network::Signet);
        let native = p2wpkh_address(&vk, Network::Signet);
        let taproot = p2tr_address(schnorr_key.verifying_key(), Network::Signet);

        vec![
            (
                AddressClaim::sign_in(
                    &p2pkh,
                    sign_compact(&key, SIGN_IN_MESSAGE, LegacyHeader::Compressed),
                ),
                AddressType::P2pkh,
            ),
            (
                AddressClaim::sign_in(
                    &nested,
                    sign_compact(&key, SIGN_IN_MESSAGE, LegacyHeader::NestedSegwit),
                ),
                AddressType::P2shP2wpkh,
            ),
            (
                AddressClaim::sign_in(&nested, sign_bip322_segwit(&key, &nested, SIGN_IN_MESSAGE)),
                AddressType::P2shP2wpkh,
            ),
            (
                AddressClaim::sign_in(
                    &native,
                    sign_compact(&key, SIGN_IN_MESSAGE, LegacyHeader::NativeSegwit),
                ),
                AddressType::P2wpkh,
            ),
            (
                AddressClaim::sign_in(&native, sign_bip322_segwit(&key, &native, SIGN_IN_MESSAGE)),
                AddressType::P2wpkh,
            ),
            (
                AddressClaim::sign_in(
                    &taproot,
                    sign_bip322_taproot(&schnorr_key, &taproot, SIGN_IN_MESSAGE, false),
                ),
                AddressType::P2tr,
            ),
        ]
    }

    #[test]
    fn test_valid_signatures_verify_for_every_family() {
        for (claim, address_type) in signed_claims() {
            let result = verify(&claim).unwrap();
            assert!(result.verified, "{}", claim.address);
            assert_eq!(result.address_type, address_type);
        }
    }

    #[test]
    fn test_message_must_match_exactly() {
        for (mut claim, _) in signed_claims() {
            claim.message.push(' ');
            assert!(!verify(&claim).unwrap().verified, "{}", claim.address);
        }
    }

    #[test]
    fn test_malformed_signatures_are_errors() {
        let (_, vk) = generate_keypair();
        let address = p2wpkh_address(&vk, Network::Mainnet);

        for bad in ["not base64!!", "", "AAAA"] {
            let claim = AddressClaim::sign_in(&address, bad);
            assert!(matches!(
                verify(&claim),
                Err(SignatureError::InvalidFormat(_))
            ));
        }

        let mut header_out_of_range = vec![0u8; 65];
        header_out_of_range[0] = 43;
        let claim = AddressClaim::sign_in(&address, STANDARD.encode(header_out_of_range));
        assert!(matches!(
            verify(&claim),
            Err(SignatureError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_compact_signature_on_taproot_is_malformed() {
        let (key, _) = generate_keypair();
        let schnorr_key = generate_schnorr_key();
        let taproot = p2tr_address(schnorr_key.verifying_key(), Network::Signet);
        let claim = AddressClaim::sign_in(
            &taproot,
            sign_compact(&key, SIGN_IN_MESSAGE, LegacyHeader::Compressed),
        );
        assert!(matches!(
            verify(&claim),
            Err(SignatureError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_unsupported_address_propagates() {
        let claim = AddressClaim::sign_in("ltc1qxyz", "AAAA");
        assert!(matches!(verify(&claim), Err(SignatureError::Address(_))));
    }

    #[test]
    fn test_compact_header_flips_only_change_recovery_inputs() {
        for (claim, _) in signed_claims() {
            let bytes = STANDARD.decode(&claim.signature).unwrap();
            let Some(original) = CompactSignature::from_bytes(&bytes) else {
                continue;
            };

            for bit in 0..8 {
                let mut mutated = bytes.clone();
                mutated[0] ^= 1 << bit;
                let result = verify(&AddressClaim::sign_in(
                    &claim.address,
                    STANDARD.encode(&mutated),
                ));

                match CompactSignature::from_bytes(&mutated) {
                    None => assert!(
                        matches!(result, Err(SignatureError::InvalidFormat(_))),
                        "header {}: {:?}",
                        mutated[0],
                        result
                    ),
                    // The header's family range is a hint; a flip that keeps
                    // the recovery id and key encoding recovers the same key.
                    Some(flipped) => {
                        let same_key = flipped.recovery_id() == original.recovery_id()
                            && flipped.is_compressed() == original.is_compressed();
                        assert!(
                            matches!(result, Ok(VerificationResult { verified, .. }) if verified == same_key),
                            "header {} -> {}: {:?}",
                            bytes[0],
                            mutated[0],
                            result
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_witness_length_flips_never_verify() {
        for (claim, _) in signed_claims() {
            let bytes = STANDARD.decode(&claim.signature).unwrap();
            let SignatureEnvelope::Witness(stack) = SignatureEnvelope::parse(&claim.signature).unwrap()
            else {
                continue;
            };

            // item count, first item length, second item length
            let mut positions = vec![0, 1];
            if stack.len() == 2 {
                positions.push(2 + stack[0].len());
            }

            for at in positions {
                for bit in 0..8 {
                    let mut mutated = bytes.clone();
                    mutated[at] ^= 1 << bit;
                    let result = verify(&AddressClaim::sign_in(
                        &claim.address,
                        STANDARD.encode(&mutated),
                    ));
                    assert!(
                        matches!(
                            result,
                            Err(SignatureError::InvalidFormat(_))
                                | Ok(VerificationResult { verified: false, .. })
                        ),
                        "{} byte {} bit {}: {:?}",
                        claim.address,
                        at,
                        bit,
                        result
                    );
                }
            }
        }
    }

    /// Byte ranges holding the signature proper (not headers, lengths,
    /// sighash bytes or public keys).
    fn signature_span(claim: &AddressClaim) -> std::ops::Range<usize> {
        let bytes = STANDARD.decode(&claim.signature).unwrap();
        match SignatureEnvelope::parse(&claim.signature).unwrap() {
            SignatureEnvelope::Compact(_) => 1..65,
            SignatureEnvelope::Witness(stack) => {
                // count byte, length byte, then the first item
                let len = stack[0].len();
                let sig_len = if stack.len() == 2 { len - 1 } else { len.min(64) };
                assert!(bytes.len() >= 2 + sig_len);
                2..2 + sig_len
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_single_bit_flip_never_verifies(pick in any::<prop::sample::Index>(), bit in 0u8..8) {
            for (claim, _) in signed_claims() {
                let span = signature_span(&claim);
                let mut bytes = STANDARD.decode(&claim.signature).unwrap();
                let at = span.start + pick.index(span.len());
                bytes[at] ^= 1 << bit;

                let mutated = AddressClaim::sign_in(&claim.address, STANDARD.encode(&bytes));
                let result = verify(&mutated);
                prop_assert!(
                    matches!(result, Ok(VerificationResult { verified: false, .. })),
                    "{} byte {}: {:?}", claim.address, at, result
                );
            }
        }
    }
}
