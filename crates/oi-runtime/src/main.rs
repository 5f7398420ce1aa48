//! # Inscriber
//!
//! Command line front end for address sign-in and inscription orders.
//!
//! ```text
//! inscriber classify <address>
//! inscriber verify --address <a> --signature <base64> [--message <m>]
//! inscriber sign-in --address <a> --signature <base64>
//! inscriber fees
//! inscriber inscribe --file <path> (--address <receive> | --wallet <json>) [--mime <type>]
//! inscriber track <order-id>
//! ```
//!
//! Configuration comes from `OI_*` environment variables. Ctrl-C stops
//! order tracking.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use oi_01_wallet_auth::{
    AddressClaim, AddressOwnershipApi, AuthDecision, AuthRequest, SignInOutcome,
};
use oi_02_inscription_orders::{
    cancel_pair, mime_type_for, CancelHandle, FeeRateSource, InscriptionFile, InscriptionOrder,
    InscriptionOrdersApi, OrderId, OrderState, OrderWatch, PollOutcome,
};
use oi_runtime::{init_logging, wiring, RuntimeConfig};
use shared_types::ConnectedWallet;

/// Ordinals inscriber: prove address ownership and inscribe files.
#[derive(Parser, Debug)]
#[command(name = "inscriber", version)]
#[command(about = "Address sign-in and inscription order tracking")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the family and network of an address.
    Classify {
        /// Bitcoin address.
        address: String,
    },

    /// Check a signature without issuing a session.
    Verify {
        /// Address that signed.
        #[arg(long)]
        address: String,
        /// Base64 signature (BIP-137 or BIP-322 simple).
        #[arg(long)]
        signature: String,
        /// Signed message; defaults to the sign-in challenge.
        #[arg(long)]
        message: Option<String>,
    },

    /// Verify the sign-in challenge and obtain a session token.
    SignIn {
        /// Address that signed.
        #[arg(long)]
        address: String,
        /// Base64 signature over the sign-in challenge.
        #[arg(long)]
        signature: String,
    },

    /// Show the fee rate new orders would use.
    Fees,

    /// Place an order for a file and track it until it settles.
    Inscribe {
        /// File to inscribe.
        #[arg(long)]
        file: PathBuf,
        /// Address that receives the inscription.
        #[arg(long, required_unless_present = "wallet", conflicts_with = "wallet")]
        address: Option<String>,
        /// Connected wallet (JSON); the inscription goes to its ordinals
        /// address.
        #[arg(long)]
        wallet: Option<PathBuf>,
        /// MIME type; guessed from the extension when omitted.
        #[arg(long)]
        mime: Option<String>,
    },

    /// Track an existing order until it settles.
    Track {
        /// Order id returned by the inscription service.
        order_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = RuntimeConfig::from_env().context("Invalid configuration")?;
    init_logging(&config.logging).context("Failed to initialize logging")?;

    match args.command {
        Command::Classify { address } => classify(&config, &address),
        Command::Verify {
            address,
            signature,
            message,
        } => verify(&config, address, signature, message),
        Command::SignIn { address, signature } => sign_in(&config, address, signature).await,
        Command::Fees => fees(&config).await,
        Command::Inscribe {
            file,
            address,
            wallet,
            mime,
        } => {
            let receiver = match (address, wallet) {
                (Some(address), _) => Receiver::Address(address),
                (None, Some(path)) => Receiver::Wallet(load_wallet(&config, &path).await?),
                (None, None) => bail!("either --address or --wallet is required"),
            };
            inscribe(&config, file, receiver, mime).await
        }
        Command::Track { order_id } => track(&config, OrderId::new(order_id)).await,
    }
}

fn classify(config: &RuntimeConfig, address: &str) -> Result<()> {
    let decoded = oi_01_wallet_auth::decode(address).context("Unrecognized address")?;
    let gate = wiring::session_gate(config);
    let accepted = gate
        .config()
        .expected_network
        .map_or(true, |network| decoded.is_for(network));
    println!(
        "{} ({}){}",
        decoded.address_type.as_str(),
        decoded.network,
        if accepted { "" } else { " - not accepted on this network" }
    );
    Ok(())
}

fn verify(
    config: &RuntimeConfig,
    address: String,
    signature: String,
    message: Option<String>,
) -> Result<()> {
    let gate = wiring::session_gate(config);
    let claim = match message {
        Some(message) => AddressClaim::with_message(address, message, signature),
        None => AddressClaim::sign_in(address, signature),
    };
    let decision = gate.authenticate(&claim);
    println!("{}", serde_json::to_string_pretty(&decision)?);
    if let AuthDecision::Rejected { .. } = decision {
        bail!("signature not accepted");
    }
    Ok(())
}

async fn sign_in(config: &RuntimeConfig, address: String, signature: String) -> Result<()> {
    let service = wiring::auth_service(config)?;
    let outcome = service
        .sign_in(&AuthRequest { address, signature })
        .await
        .context("Sign-in failed")?;

    match outcome {
        SignInOutcome::Issued { identity, token } => {
            info!("[oi-01] Session issued for {}", identity.address);
            println!("{}", token.0);
            Ok(())
        }
        SignInOutcome::Rejected { reason, detail } => {
            bail!("sign-in rejected ({reason:?}): {detail}")
        }
    }
}

async fn fees(config: &RuntimeConfig) -> Result<()> {
    let service = wiring::order_service(config)?;
    let rate = service.current_fee_rate().await;
    match wiring::fee_client(config)?.recommended_fees().await {
        Ok(estimates) => println!("{}", serde_json::to_string_pretty(&estimates)?),
        Err(e) => println!("estimates unavailable: {e}"),
    }
    println!("order fee rate: {rate} sat/vB");
    Ok(())
}

/// Where an inscription is delivered.
enum Receiver {
    Address(String),
    Wallet(ConnectedWallet),
}

async fn load_wallet(config: &RuntimeConfig, path: &Path) -> Result<ConnectedWallet> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let wallet: ConnectedWallet = serde_json::from_slice(&bytes)
        .with_context(|| format!("{} is not a connected wallet", path.display()))?;
    if wallet.network != config.network {
        bail!(
            "wallet is connected to {} but the inscriber is configured for {}",
            wallet.network,
            config.network
        );
    }
    info!(
        "[oi-02] Using {} wallet, ordinals address {}",
        wallet.wallet,
        wallet.receive_address()
    );
    Ok(wallet)
}

async fn inscribe(
    config: &RuntimeConfig,
    path: PathBuf,
    receiver: Receiver,
    mime: Option<String>,
) -> Result<()> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .context("File name is not valid UTF-8")?
        .to_string();
    let mime_type = match mime {
        Some(mime) => mime,
        None => mime_type_for(&name)
            .with_context(|| format!("Cannot guess the MIME type of {name}; pass --mime"))?
            .to_string(),
    };
    let bytes = tokio::fs::read(&path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let service = wiring::order_service(config)?;
    let files = vec![InscriptionFile::from_bytes(name, mime_type, &bytes)];
    let order = match &receiver {
        Receiver::Address(address) => service.submit(files, address).await,
        Receiver::Wallet(wallet) => service.submit_for(wallet, files).await,
    }
    .context("Failed to place order")?;
    println!("order {} placed", order.id());
    print_progress(&order);

    let (handle, signal) = cancel_pair();
    let watch = service.track(order, signal);
    follow(watch, handle).await
}

async fn track(config: &RuntimeConfig, id: OrderId) -> Result<()> {
    let service = wiring::order_service(config)?;
    let (handle, signal) = cancel_pair();
    let watch = service.track_id(id, signal);
    follow(watch, handle).await
}

async fn follow(watch: OrderWatch, handle: CancelHandle) -> Result<()> {
    let mut updates = watch.subscribe();
    let printer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let latest = updates.borrow_and_update().clone();
            if let Some(order) = latest {
                print_progress(&order);
            }
        }
    });
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("[oi-02] Shutdown signal received");
            handle.cancel();
        }
    });

    let outcome = watch.finished().await;
    interrupt.abort();
    let _ = printer.await;

    match outcome.context("Order tracking stopped")? {
        PollOutcome::Settled(order) if order.state() == OrderState::Failed => {
            bail!("order {} failed", order.id())
        }
        PollOutcome::Settled(order) => {
            for id in order.inscription_ids() {
                println!("inscription {id}");
            }
            Ok(())
        }
        PollOutcome::Cancelled { last } => {
            let state = last
                .as_ref()
                .map(|o| o.state().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            println!("tracking cancelled; last known state: {state}");
            Ok(())
        }
    }
}

fn print_progress(order: &InscriptionOrder) {
    match order.charge() {
        Some(charge) if order.state() == OrderState::AwaitingPayment => println!(
            "[{}] {} - pay {} sats to {}",
            order.id(),
            order.state(),
            charge.amount_sats,
            charge.address
        ),
        _ => println!("[{}] {}", order.id(), order.state()),
    }
}
