//! # Error Types
//!
//! Parse errors for the shared value types.

use thiserror::Error;

/// Unknown network name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown network: {0}")]
pub struct ParseNetworkError(pub String);

/// Unknown wallet provider name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unsupported wallet provider: {0}")]
pub struct ParseWalletProviderError(pub String);
