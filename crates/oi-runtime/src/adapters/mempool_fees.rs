//! `FeeRateSource` over a mempool.space-compatible REST API.

use async_trait::async_trait;
use oi_02_inscription_orders::{FeeRateSource, RecommendedFees, RemoteError};
use reqwest::Client;
use serde::Deserialize;
use shared_types::Network;

use super::ordinalsbot::REQUEST_TIMEOUT;
use super::truncate_body;

/// Wire shape of `/api/v1/fees/recommended`. Some instances report
/// fractional rates; they are rounded up.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecommendedFeesResponse {
    fastest_fee: f64,
    half_hour_fee: f64,
    hour_fee: f64,
    economy_fee: f64,
    minimum_fee: f64,
}

impl From<RecommendedFeesResponse> for RecommendedFees {
    fn from(r: RecommendedFeesResponse) -> Self {
        let up = |v: f64| v.ceil() as i64;
        Self {
            fastest: up(r.fastest_fee),
            half_hour: up(r.half_hour_fee),
            hour: up(r.hour_fee),
            economy: up(r.economy_fee),
            minimum: up(r.minimum_fee),
        }
    }
}

/// Fee estimates from mempool.space.
pub struct MempoolFeeClient {
    http: Client,
    url: String,
}

impl MempoolFeeClient {
    /// Create a client for `base_url` on `network`.
    pub fn new(base_url: &str, network: Network) -> Result<Self, RemoteError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RemoteError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            url: format!(
                "{}{}/api/v1/fees/recommended",
                base_url.trim_end_matches('/'),
                network.rest_path_prefix()
            ),
        })
    }

    /// Endpoint queried.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl FeeRateSource for MempoolFeeClient {
    async fn recommended_fees(&self) -> Result<RecommendedFees, RemoteError> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body: truncate_body(body),
            });
        }
        let fees: RecommendedFeesResponse = response
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))?;
        Ok(fees.into())
    }
}
