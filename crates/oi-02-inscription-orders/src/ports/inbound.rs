//! # Inbound Ports (Driving Ports / API)
//!
//! Public API of the inscription-order subsystem.

use async_trait::async_trait;
use shared_types::ConnectedWallet;

use crate::domain::{FeeRate, InscriptionFile, InscriptionOrder, OrderId, SubmissionError};
use crate::domain::RemoteError;

/// Inscription order API.
#[async_trait]
pub trait InscriptionOrdersApi: Send + Sync {
    /// Fee rate to submit with: the source's fastest estimate, clamped,
    /// or the configured default when the source fails.
    async fn current_fee_rate(&self) -> FeeRate;

    /// Validate and place an order delivering `files` to `receive_address`.
    async fn submit(
        &self,
        files: Vec<InscriptionFile>,
        receive_address: &str,
    ) -> Result<InscriptionOrder, SubmissionError>;

    /// Place an order delivering `files` to the connected wallet's
    /// ordinals address.
    async fn submit_for(
        &self,
        wallet: &ConnectedWallet,
        files: Vec<InscriptionFile>,
    ) -> Result<InscriptionOrder, SubmissionError> {
        self.submit(files, wallet.receive_address()).await
    }

    /// Fetch the current state of an order once, without tracking it.
    async fn lookup(&self, id: &OrderId) -> Result<InscriptionOrder, RemoteError>;
}
