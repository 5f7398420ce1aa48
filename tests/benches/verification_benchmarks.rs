//! # Signature Verification Benchmarks
//!
//! | Path | Work per call |
//! |------|---------------|
//! | BIP-137 compact | key recovery + hash160 |
//! | BIP-322 P2WPKH | virtual txs + BIP-143 sighash + ECDSA verify |
//! | BIP-322 P2TR | virtual txs + BIP-341 sighash + Schnorr verify |
//! | classify | address decoding only |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use oi_01_wallet_auth::domain::test_helpers::{
    generate_keypair, generate_schnorr_key, p2pkh_address, p2tr_address, p2wpkh_address,
    sign_bip322_segwit, sign_bip322_taproot, sign_compact, LegacyHeader,
};
use oi_01_wallet_auth::{classify, verify, AddressClaim};
use shared_types::{Network, SIGN_IN_MESSAGE};

fn bench_signature_verification(c: &mut Criterion) {
    let mut group = c.benchmark_group("oi-01-signature-verification");
    group.measurement_time(Duration::from_secs(10));

    let (key, verifying_key) = generate_keypair();

    let legacy = p2pkh_address(&verifying_key, true, Network::Mainnet);
    let legacy_claim = AddressClaim::sign_in(
        legacy,
        sign_compact(&key, SIGN_IN_MESSAGE, LegacyHeader::Compressed),
    );
    group.bench_function("bip137_p2pkh", |b| {
        b.iter(|| black_box(verify(&legacy_claim).is_ok()))
    });

    let segwit = p2wpkh_address(&verifying_key, Network::Signet);
    let segwit_claim = AddressClaim::sign_in(
        segwit.clone(),
        sign_bip322_segwit(&key, &segwit, SIGN_IN_MESSAGE),
    );
    group.bench_function("bip322_p2wpkh", |b| {
        b.iter(|| black_box(verify(&segwit_claim).is_ok()))
    });

    let schnorr_key = generate_schnorr_key();
    let taproot = p2tr_address(schnorr_key.verifying_key(), Network::Signet);
    let taproot_claim = AddressClaim::sign_in(
        taproot.clone(),
        sign_bip322_taproot(&schnorr_key, &taproot, SIGN_IN_MESSAGE, false),
    );
    group.bench_function("bip322_p2tr", |b| {
        b.iter(|| black_box(verify(&taproot_claim).is_ok()))
    });

    for size in [10usize, 100] {
        let claims: Vec<AddressClaim> = (0..size)
            .map(|_| {
                let (key, verifying_key) = generate_keypair();
                let address = p2wpkh_address(&verifying_key, Network::Signet);
                let signature = sign_bip322_segwit(&key, &address, SIGN_IN_MESSAGE);
                AddressClaim::sign_in(address, signature)
            })
            .collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(
            BenchmarkId::new("bip322_p2wpkh_batch", size),
            &claims,
            |b, claims| {
                b.iter(|| {
                    for claim in claims {
                        black_box(verify(claim).is_ok());
                    }
                })
            },
        );
    }

    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("oi-01-address-codec");
    let (_, verifying_key) = generate_keypair();
    let schnorr_key = generate_schnorr_key();

    let addresses = [
        ("p2pkh", p2pkh_address(&verifying_key, true, Network::Mainnet)),
        ("p2wpkh", p2wpkh_address(&verifying_key, Network::Mainnet)),
        ("p2tr", p2tr_address(schnorr_key.verifying_key(), Network::Mainnet)),
    ];
    for (name, address) in &addresses {
        group.bench_with_input(BenchmarkId::new("classify", name), address, |b, a| {
            b.iter(|| black_box(classify(a).is_ok()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_signature_verification, bench_classify);
criterion_main!(benches);
