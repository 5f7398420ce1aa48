//! # Poll Interval Policy
//!
//! Before the service has assigned a charge address the user is waiting
//! to pay, so the order is polled quickly. Once a charge address exists,
//! progress depends on block confirmations and the order is polled slowly.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::entities::InscriptionOrder;

/// Default fast-phase interval.
pub const DEFAULT_FAST_INTERVAL: Duration = Duration::from_secs(5);

/// Default slow-phase interval.
pub const DEFAULT_SLOW_INTERVAL: Duration = Duration::from_secs(20);

/// Two-phase polling interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalPolicy {
    /// Interval while no charge address is known.
    pub fast: Duration,
    /// Interval once a charge address is known.
    pub slow: Duration,
}

impl Default for IntervalPolicy {
    fn default() -> Self {
        Self {
            fast: DEFAULT_FAST_INTERVAL,
            slow: DEFAULT_SLOW_INTERVAL,
        }
    }
}

impl IntervalPolicy {
    /// Create a policy.
    pub fn new(fast: Duration, slow: Duration) -> Self {
        Self { fast, slow }
    }

    /// Delay before the next fetch given the latest known order.
    pub fn interval_for(&self, order: Option<&InscriptionOrder>) -> Duration {
        match order.and_then(InscriptionOrder::charge_address) {
            Some(_) => self.slow,
            None => self.fast,
        }
    }
}
