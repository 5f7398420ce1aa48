//! # Domain Value Objects
//!
//! Immutable value types for inscription orders.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lowest fee rate sent to the inscription service (sat/vB).
pub const MIN_FEE_RATE: u64 = 1;

/// Highest fee rate sent to the inscription service (sat/vB).
pub const MAX_FEE_RATE: u64 = 100_000;

/// Opaque order identifier assigned by the inscription service.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    /// Create an order id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle state of an inscription order.
///
/// ```text
/// Created -> AwaitingPayment -> Queued -> Processing -> Completed
///    \______________\______________\__________\______> Failed
/// ```
///
/// `Completed` and `Failed` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderState {
    /// Accepted by the service, no payment details yet.
    Created,
    /// Waiting for the user's payment to arrive or confirm.
    AwaitingPayment,
    /// Paid and waiting for an inscription slot.
    Queued,
    /// Inscription transactions are being built or broadcast.
    Processing,
    /// Every file is inscribed.
    Completed,
    /// Cancelled, expired, refunded or errored.
    Failed,
}

impl OrderState {
    /// Whether no further remote queries are needed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderState::Completed | OrderState::Failed)
    }

    /// Position along the happy path. `Failed` sits outside it.
    pub fn progress(&self) -> Option<u8> {
        match self {
            OrderState::Created => Some(0),
            OrderState::AwaitingPayment => Some(1),
            OrderState::Queued => Some(2),
            OrderState::Processing => Some(3),
            OrderState::Completed => Some(4),
            OrderState::Failed => None,
        }
    }
}

impl fmt::Display for OrderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderState::Created => "created",
            OrderState::AwaitingPayment => "awaiting-payment",
            OrderState::Queued => "queued",
            OrderState::Processing => "processing",
            OrderState::Completed => "completed",
            OrderState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Fee rate in sat/vB, always within `[MIN_FEE_RATE, MAX_FEE_RATE]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeRate(u64);

impl FeeRate {
    /// Clamp an upstream figure into the accepted range. Out-of-range
    /// values are clamped, never rejected.
    pub fn clamped(raw: i64) -> Self {
        let clamped = raw.clamp(MIN_FEE_RATE as i64, MAX_FEE_RATE as i64);
        Self(clamped as u64)
    }

    /// Rate in sat/vB.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl Default for FeeRate {
    fn default() -> Self {
        Self(MIN_FEE_RATE)
    }
}

impl fmt::Display for FeeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} sat/vB", self.0)
    }
}

/// Fee-rate estimates from an external rate source (sat/vB, unclamped).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedFees {
    /// Next-block estimate.
    pub fastest: i64,
    /// Within ~30 minutes.
    pub half_hour: i64,
    /// Within ~1 hour.
    pub hour: i64,
    /// Low-priority estimate.
    pub economy: i64,
    /// Mempool minimum.
    pub minimum: i64,
}

/// Payment the inscription service expects before it proceeds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Charge {
    /// Deposit address.
    pub address: String,
    /// Amount due in satoshis.
    pub amount_sats: u64,
}

/// Remote status of one file within an order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStatus {
    /// File name as submitted.
    pub name: String,
    /// Status string reported by the service, kept verbatim.
    pub remote_status: String,
    /// Inscription id once inscribed.
    pub inscription_id: Option<String>,
    /// Reveal/settlement transaction id once broadcast.
    pub settlement_tx_id: Option<String>,
}
