//! # Service Wiring
//!
//! Builds the subsystem services from a `RuntimeConfig` with their HTTP
//! adapters plugged in.

use anyhow::{Context, Result};
use oi_01_wallet_auth::{SessionGate, WalletAuthService};
use oi_02_inscription_orders::OrderService;
use tracing::debug;

use crate::adapters::{HttpIdentityProvider, MempoolFeeClient, OrdinalsBotClient};
use crate::config::RuntimeConfig;

/// Order service backed by the HTTP adapters.
pub type HttpOrderService = OrderService<OrdinalsBotClient, MempoolFeeClient>;

/// Sign-in service backed by the HTTP identity provider.
pub type HttpAuthService = WalletAuthService<HttpIdentityProvider>;

/// Session gate for the configured network.
pub fn session_gate(config: &RuntimeConfig) -> SessionGate {
    SessionGate::with_config(config.auth.clone())
}

/// Fee estimate client for the configured network.
pub fn fee_client(config: &RuntimeConfig) -> Result<MempoolFeeClient> {
    MempoolFeeClient::new(&config.fee_api_url, config.network)
        .context("Failed to create fee estimate client")
}

/// Order service for the configured inscription and fee endpoints.
pub fn order_service(config: &RuntimeConfig) -> Result<HttpOrderService> {
    let client = OrdinalsBotClient::new(&config.inscription)
        .context("Failed to create inscription service client")?;
    let fees = fee_client(config)?;
    debug!(
        "[oi-02] Inscription service at {}, fees from {}",
        config.inscription.base_url,
        fees.url()
    );
    Ok(OrderService::new(client, fees, config.orders.clone()))
}

/// Sign-in service. Fails when no identity provider is configured.
pub fn auth_service(config: &RuntimeConfig) -> Result<HttpAuthService> {
    let identity = config.require_identity()?.clone();
    let provider =
        HttpIdentityProvider::new(identity).context("Failed to create identity provider client")?;
    Ok(WalletAuthService::new(config.auth.clone(), provider))
}
