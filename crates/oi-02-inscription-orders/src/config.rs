//! # Inscription Orders Configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::{FeeRate, IntervalPolicy, MAX_FILE_SIZE};

/// Order subsystem configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrdersConfig {
    /// Poll interval before a charge address is known (seconds).
    pub fast_poll_secs: u64,

    /// Poll interval once a charge address is known (seconds).
    pub slow_poll_secs: u64,

    /// Fee rate used when the fee source is unavailable.
    pub default_fee_rate: FeeRate,

    /// Request low-postage outputs.
    pub low_postage: bool,

    /// Largest accepted file in bytes.
    pub max_file_size: u64,
}

impl Default for OrdersConfig {
    fn default() -> Self {
        Self {
            fast_poll_secs: 5,
            slow_poll_secs: 20,
            default_fee_rate: FeeRate::default(),
            low_postage: true,
            max_file_size: MAX_FILE_SIZE,
        }
    }
}

impl OrdersConfig {
    /// Create a config for testing (1 s / 2 s polling).
    pub fn for_testing() -> Self {
        Self {
            fast_poll_secs: 1,
            slow_poll_secs: 2,
            ..Default::default()
        }
    }

    /// Interval policy for the poll scheduler.
    pub fn interval_policy(&self) -> IntervalPolicy {
        IntervalPolicy::new(
            Duration::from_secs(self.fast_poll_secs),
            Duration::from_secs(self.slow_poll_secs),
        )
    }
}
