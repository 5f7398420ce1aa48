//! # Order Service
//!
//! Implements `InscriptionOrdersApi` on top of the outbound ports and hands
//! submitted orders to the poll scheduler.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::application::scheduler::{CancelSignal, OrderWatch, PollScheduler};
use crate::config::OrdersConfig;
use crate::domain::{
    apply, FeeRate, InscriptionFile, InscriptionOrder, OrderId, OrderSubmission, RemoteError,
    SubmissionError,
};
use crate::ports::inbound::InscriptionOrdersApi;
use crate::ports::outbound::{FeeRateSource, InscriptionServiceClient};

/// Inscription order service.
pub struct OrderService<C, F> {
    client: Arc<C>,
    fees: F,
    config: OrdersConfig,
    scheduler: PollScheduler,
}

impl<C, F> OrderService<C, F>
where
    C: InscriptionServiceClient + 'static,
    F: FeeRateSource,
{
    /// Create a service.
    pub fn new(client: C, fees: F, config: OrdersConfig) -> Self {
        let scheduler = PollScheduler::new(config.interval_policy());
        Self {
            client: Arc::new(client),
            fees,
            config,
            scheduler,
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &OrdersConfig {
        &self.config
    }

    /// Inscription service client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Poll `order` in the background until it settles or `cancel` fires.
    ///
    /// Must be called from within a tokio runtime.
    pub fn track(&self, order: InscriptionOrder, cancel: CancelSignal) -> OrderWatch {
        let id = order.id().clone();
        self.spawn_watch(id, Some(order), cancel)
    }

    /// Poll an order known only by id.
    pub fn track_id(&self, id: OrderId, cancel: CancelSignal) -> OrderWatch {
        self.spawn_watch(id, None, cancel)
    }

    fn spawn_watch(
        &self,
        id: OrderId,
        initial: Option<InscriptionOrder>,
        cancel: CancelSignal,
    ) -> OrderWatch {
        info!("[oi-02] Tracking order {}", id);
        let client = Arc::clone(&self.client);
        let fetch_id = id.clone();
        let fetch = move || {
            let client = Arc::clone(&client);
            let id = fetch_id.clone();
            async move { client.fetch_order(&id).await }
        };
        OrderWatch::spawn(self.scheduler, id, initial, fetch, cancel)
    }
}

#[async_trait]
impl<C, F> InscriptionOrdersApi for OrderService<C, F>
where
    C: InscriptionServiceClient + 'static,
    F: FeeRateSource,
{
    async fn current_fee_rate(&self) -> FeeRate {
        match self.fees.recommended_fees().await {
            Ok(fees) => {
                let rate = FeeRate::clamped(fees.fastest);
                debug!("[oi-02] Fastest fee {} clamped to {}", fees.fastest, rate);
                rate
            }
            Err(e) => {
                warn!(
                    "[oi-02] Fee source unavailable ({}); using default {}",
                    e, self.config.default_fee_rate
                );
                self.config.default_fee_rate
            }
        }
    }

    async fn submit(
        &self,
        files: Vec<InscriptionFile>,
        receive_address: &str,
    ) -> Result<InscriptionOrder, SubmissionError> {
        let fee_rate = self.current_fee_rate().await;
        let submission = OrderSubmission::new(
            files,
            receive_address,
            fee_rate,
            self.config.low_postage,
            self.config.max_file_size,
        )?;

        let snapshot = self.client.create_order(&submission).await?;
        let order = apply(None, snapshot)?;
        info!(
            "[oi-02] Order {} placed: {} file(s) at {}",
            order.id(),
            submission.files.len(),
            fee_rate
        );
        Ok(order)
    }

    async fn lookup(&self, id: &OrderId) -> Result<InscriptionOrder, RemoteError> {
        let snapshot = self.client.fetch_order(id).await?;
        if snapshot.id != *id {
            return Err(RemoteError::Decode(format!(
                "asked for order {} but received {}",
                id, snapshot.id
            )));
        }
        Ok(InscriptionOrder::from_snapshot(snapshot))
    }
}
