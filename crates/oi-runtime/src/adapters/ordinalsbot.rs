//! # Inscription Service Adapter
//!
//! `InscriptionServiceClient` over the OrdinalsBot-style direct order API.
//!
//! - `POST {base}/order` places an order
//! - `GET {base}/order?id={id}` fetches its current state
//!
//! Wire states are mapped onto `OrderState` here; the domain never sees
//! the service's vocabulary.

use std::time::Duration;

use async_trait::async_trait;
use oi_02_inscription_orders::{
    FeeRate, FileStatus, InscriptionServiceClient, OrderId, OrderState, OrderSubmission,
    RemoteError, RemoteOrderSnapshot,
};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::truncate_body;
use crate::config::InscriptionApiConfig;

/// Per-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Map a wire status string onto the lifecycle.
pub fn map_wire_state(raw: &str) -> Result<OrderState, RemoteError> {
    let state = match raw.trim().to_ascii_lowercase().as_str() {
        "pending" | "created" => OrderState::Created,
        "waiting-payment" | "waiting-confirmation" | "waiting-parent" => {
            OrderState::AwaitingPayment
        }
        "prep" | "queued" => OrderState::Queued,
        "processing" | "inscribing" => OrderState::Processing,
        "completed" => OrderState::Completed,
        "error" | "cancelled" | "expired" | "refunded" | "waiting-refund" => OrderState::Failed,
        _ => return Err(RemoteError::UnknownState(raw.to_string())),
    };
    Ok(state)
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateOrderRequest<'a> {
    files: Vec<FileRequest<'a>>,
    fee: u64,
    low_postage: bool,
    receive_address: &'a str,
}

#[derive(Serialize)]
struct FileRequest<'a> {
    #[serde(rename = "dataURL")]
    data_url: &'a str,
    name: &'a str,
    size: u64,
    #[serde(rename = "type")]
    mime_type: &'a str,
}

impl<'a> CreateOrderRequest<'a> {
    fn from_submission(submission: &'a OrderSubmission) -> Self {
        Self {
            files: submission
                .files
                .iter()
                .map(|f| FileRequest {
                    data_url: &f.data_url,
                    name: &f.name,
                    size: f.size,
                    mime_type: &f.mime_type,
                })
                .collect(),
            fee: submission.fee_rate.get(),
            low_postage: submission.low_postage,
            receive_address: &submission.receive_address,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderResponse {
    id: String,
    state: String,
    #[serde(default)]
    charge: Option<ChargeResponse>,
    #[serde(default)]
    files: Vec<FileResponse>,
    #[serde(default)]
    receive_address: Option<String>,
    #[serde(default)]
    fee: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ChargeResponse {
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    amount: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileResponse {
    #[serde(default)]
    name: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    inscription_id: Option<String>,
    #[serde(default)]
    tx: Option<FileTxResponse>,
}

#[derive(Debug, Deserialize)]
struct FileTxResponse {
    #[serde(default)]
    reveal: Option<String>,
    #[serde(default)]
    inscription: Option<String>,
}

impl OrderResponse {
    fn into_snapshot(self) -> Result<RemoteOrderSnapshot, RemoteError> {
        let mut snapshot = RemoteOrderSnapshot::new(self.id, map_wire_state(&self.state)?);

        if let Some(charge) = self.charge {
            if let Some(address) = charge.address.filter(|a| !a.is_empty()) {
                snapshot = snapshot.with_charge(address, charge.amount.unwrap_or(0));
            }
        }

        for file in self.files {
            let (reveal, tx_inscription) = match file.tx {
                Some(tx) => (tx.reveal, tx.inscription),
                None => (None, None),
            };
            snapshot = snapshot.with_file(FileStatus {
                name: file.name,
                remote_status: file.status.unwrap_or_else(|| "pending".to_string()),
                inscription_id: file.inscription_id.or(tx_inscription),
                settlement_tx_id: reveal,
            });
        }

        snapshot.receive_address = self.receive_address;
        snapshot.fee_rate = self.fee.map(FeeRate::clamped);
        Ok(snapshot)
    }
}

// =============================================================================
// CLIENT
// =============================================================================

/// HTTP client for the inscription service.
pub struct OrdinalsBotClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OrdinalsBotClient {
    /// Create a client for `config`.
    pub fn new(config: &InscriptionApiConfig) -> Result<Self, RemoteError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn order_url(&self) -> String {
        format!("{}/order", self.base_url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<RemoteOrderSnapshot, RemoteError> {
        let request = match &self.api_key {
            Some(key) => request.header("x-api-key", key),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body: truncate_body(body),
            });
        }

        let order: OrderResponse =
            serde_json::from_str(&body).map_err(|e| RemoteError::Decode(e.to_string()))?;
        order.into_snapshot()
    }
}

#[async_trait]
impl InscriptionServiceClient for OrdinalsBotClient {
    async fn create_order(
        &self,
        submission: &OrderSubmission,
    ) -> Result<RemoteOrderSnapshot, RemoteError> {
        debug!("[oi-02] POST {}", self.order_url());
        let body = CreateOrderRequest::from_submission(submission);
        self.send(self.http.post(self.order_url()).json(&body)).await
    }

    async fn fetch_order(&self, id: &OrderId) -> Result<RemoteOrderSnapshot, RemoteError> {
        debug!("[oi-02] GET {} id={}", self.order_url(), id);
        self.send(self.http.get(self.order_url()).query(&[("id", id.as_str())]))
            .await
    }
}
