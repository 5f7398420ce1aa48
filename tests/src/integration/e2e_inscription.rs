//! # End-to-End Inscription Flow
//!
//! ```text
//! [Wallet] ──sign(M)──→ [Session Gate (oi-01)] ──Accepted──→ identity
//!                                                               │
//!                                                               ↓
//!                             [Order Service (oi-02)] ──submit(file, fee)──→ remote
//!                                      │
//!                                      ↓
//!                              [Poll Scheduler]
//!                     Created → AwaitingPayment(charge) → Completed
//!                     fast (5 s) ─┘   slow (20 s) ─┘
//! ```
//!
//! ## Test Categories
//!
//! 1. **Happy Path**: wallet sign-in, order, payment phase, settlement
//! 2. **Rejection**: a bad signature never reaches the order flow
//! 3. **Cancellation**: stopping a tracked order mid-flight

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use oi_01_wallet_auth::domain::test_helpers::{
        generate_keypair, generate_schnorr_key, p2tr_address, p2wpkh_address,
        sign_bip322_segwit, sign_bip322_taproot,
    };
    use oi_01_wallet_auth::{
        AuthDecision, AuthRequest, MockIdentityProvider, RejectionReason, SessionGate,
        SignInOutcome, WalletAuthService,
    };
    use oi_01_wallet_auth::{AuthConfig, AddressOwnershipApi};
    use oi_02_inscription_orders::{
        cancel_pair, CancelSignal, FileStatus, InscriptionFile, InscriptionOrdersApi,
        OrderService, OrderState, OrdersConfig, PollOutcome, RemoteOrderSnapshot,
        ScriptedInscriptionService, StaticFeeSource,
    };
    use shared_types::{ConnectedWallet, Network, WalletProvider, SIGN_IN_MESSAGE};
    use tokio::time::Instant;

    const ORDER_ID: &str = "order-e2e";
    const INSCRIPTION_ID: &str =
        "6fb976ab49dcec017f1e201e84395983204ae1a7c2abf7ced0a85d692e442799i0";

    fn charged(state: OrderState) -> RemoteOrderSnapshot {
        RemoteOrderSnapshot::new(ORDER_ID, state).with_charge("tb1qchargeaddress", 15_500)
    }

    fn completed() -> RemoteOrderSnapshot {
        RemoteOrderSnapshot::new(ORDER_ID, OrderState::Completed).with_file(FileStatus {
            name: "hello.txt".into(),
            remote_status: "ok".into(),
            inscription_id: Some(INSCRIPTION_ID.into()),
            settlement_tx_id: None,
        })
    }

    fn created() -> RemoteOrderSnapshot {
        RemoteOrderSnapshot::new(ORDER_ID, OrderState::Created)
    }

    /// Still pending on the first poll, then waiting for payment.
    fn remote() -> ScriptedInscriptionService {
        ScriptedInscriptionService::new(created())
            .then_return(created())
            .then_return(charged(OrderState::AwaitingPayment))
            .then_return(charged(OrderState::AwaitingPayment))
            .then_return(completed())
    }

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_sign_in_then_inscribe_until_completed() {
        // Connected wallet: taproot ordinals account, segwit payment account
        let ordinals_key = generate_schnorr_key();
        let (_, payment_key) = generate_keypair();
        let wallet = ConnectedWallet {
            ordinals_address: p2tr_address(ordinals_key.verifying_key(), Network::Signet),
            ordinals_public_key: hex(&ordinals_key.verifying_key().to_bytes()),
            payment_address: p2wpkh_address(&payment_key, Network::Signet),
            payment_public_key: hex(payment_key.to_encoded_point(true).as_bytes()),
            wallet: WalletProvider::Xverse,
            network: Network::Signet,
        };

        // Sign-in with the ordinals address
        let signature = sign_bip322_taproot(
            &ordinals_key,
            &wallet.ordinals_address,
            SIGN_IN_MESSAGE,
            false,
        );
        let gate = SessionGate::new(Some(wallet.network));
        let decision = gate.authenticate_request(&AuthRequest {
            address: wallet.ordinals_address.clone(),
            signature,
        });
        let identity = match decision {
            AuthDecision::Accepted(identity) => identity,
            other => panic!("expected acceptance, got {other:?}"),
        };
        assert_eq!(identity.address, wallet.receive_address());

        // Order placed for the proven wallet
        let service = OrderService::new(remote(), StaticFeeSource::uniform(10), OrdersConfig::default());
        let file = InscriptionFile::from_bytes("hello.txt", "text/plain", b"hello ordinals");
        let order = service.submit_for(&wallet, vec![file]).await.unwrap();
        assert_eq!(order.state(), OrderState::Created);

        let sent = service.client().submissions();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].fee_rate.get(), 10);
        assert_eq!(sent[0].receive_address, identity.address);

        // Tracking
        let start = Instant::now();
        let watch = service.track(order, CancelSignal::never());
        let mut updates = watch.subscribe();
        let observer = tokio::spawn(async move {
            let mut seen = Vec::new();
            while updates.changed().await.is_ok() {
                if let Some(order) = updates.borrow_and_update().clone() {
                    seen.push((order.state(), start.elapsed()));
                }
            }
            seen
        });

        let outcome = watch.finished().await.unwrap();
        let seen = observer.await.unwrap();

        // First fetch is immediate and the order is still pending; once the
        // charge address appears the slow interval applies.
        assert_eq!(
            seen,
            vec![
                (OrderState::Created, Duration::from_secs(0)),
                (OrderState::AwaitingPayment, Duration::from_secs(5)),
                (OrderState::AwaitingPayment, Duration::from_secs(25)),
                (OrderState::Completed, Duration::from_secs(45)),
            ]
        );

        let settled = match outcome {
            PollOutcome::Settled(order) => order,
            other => panic!("expected settlement, got {other:?}"),
        };
        assert_eq!(settled.state(), OrderState::Completed);
        assert_eq!(settled.inscription_ids(), vec![INSCRIPTION_ID]);

        // Polling has stopped.
        let fetches = service.client().fetch_count();
        assert_eq!(fetches, 4);
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(service.client().fetch_count(), fetches);
    }

    #[tokio::test]
    async fn test_taproot_sign_in_issues_session() {
        let key = generate_schnorr_key();
        let address = p2tr_address(key.verifying_key(), Network::Signet);
        let signature = sign_bip322_taproot(&key, &address, SIGN_IN_MESSAGE, false);

        let service = WalletAuthService::new(AuthConfig::default(), MockIdentityProvider::default());
        let outcome = service
            .sign_in(&AuthRequest {
                address: address.clone(),
                signature,
            })
            .await
            .unwrap();

        assert!(matches!(outcome, SignInOutcome::Issued { ref identity, .. } if identity.address == address));
        assert_eq!(service.provider().issued().len(), 1);
    }

    #[tokio::test]
    async fn test_signature_from_another_key_is_rejected() {
        let (_, verifying_key) = generate_keypair();
        let (other_key, _) = generate_keypair();
        let address = p2wpkh_address(&verifying_key, Network::Signet);
        let signature = sign_bip322_segwit(&other_key, &address, SIGN_IN_MESSAGE);

        let service = WalletAuthService::new(AuthConfig::default(), MockIdentityProvider::default());
        let outcome = service
            .sign_in(&AuthRequest { address, signature })
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            SignInOutcome::Rejected {
                reason: RejectionReason::SignatureMismatch,
                ..
            }
        ));
        assert!(service.provider().issued().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_tracking_in_payment_phase() {
        let remote = ScriptedInscriptionService::new(created())
            .then_return(charged(OrderState::AwaitingPayment))
            .then_return(completed());
        let service = OrderService::new(remote, StaticFeeSource::uniform(10), OrdersConfig::default());
        let file = InscriptionFile::from_bytes("hello.txt", "text/plain", b"hello");
        let order = service.submit(vec![file], "tb1qreceiver").await.unwrap();

        let (handle, signal) = cancel_pair();
        let watch = service.track(order, signal);
        let mut updates = watch.subscribe();
        updates.changed().await.unwrap();
        handle.cancel();

        match watch.finished().await.unwrap() {
            PollOutcome::Cancelled { last: Some(order) } => {
                assert_eq!(order.state(), OrderState::AwaitingPayment);
                assert_eq!(order.charge_address(), Some("tb1qchargeaddress"));
            }
            other => panic!("expected cancellation, got {other:?}"),
        }
        assert_eq!(service.client().fetch_count(), 1);
    }

    #[test]
    fn test_classification_is_available_without_network_pin() {
        let gate = SessionGate::new(None);
        let (_, verifying_key) = generate_keypair();
        let mainnet = p2wpkh_address(&verifying_key, Network::Mainnet);
        assert!(gate.classify(&mainnet).is_ok());
    }
}
