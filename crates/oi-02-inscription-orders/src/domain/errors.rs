//! # Domain Errors
//!
//! Error types for inscription orders.

use thiserror::Error;

use super::value_objects::{OrderId, OrderState};

/// Protocol-consistency errors between local and remote order state.
///
/// Surfaced to the caller, never absorbed: the caller decides whether to
/// re-fetch or abort.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrderError {
    /// The snapshot would move the order backwards in a way that cannot be
    /// a real transition (back to `Created`, or out of a terminal state).
    #[error("Stale snapshot: cannot move from {current} to {incoming}")]
    StaleSnapshot {
        /// State held locally.
        current: OrderState,
        /// State in the snapshot.
        incoming: OrderState,
    },

    /// The snapshot describes a different order.
    #[error("Order id mismatch: expected {expected}, got {actual}")]
    OrderIdMismatch {
        /// Order being tracked.
        expected: OrderId,
        /// Order in the snapshot.
        actual: OrderId,
    },

    /// The background poll task ended abnormally.
    #[error("Poll task stopped: {0}")]
    PollerStopped(String),
}

/// Failures talking to a remote collaborator (inscription service or fee
/// source). Transient from the order lifecycle's point of view.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    /// Connection, DNS, TLS or timeout failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status.
    #[error("Remote returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, cut to a bounded length by the adapter.
        body: String,
    },

    /// Response could not be decoded.
    #[error("Invalid response: {0}")]
    Decode(String),

    /// Remote reported an order state this client does not know.
    #[error("Unknown remote order state: {0}")]
    UnknownState(String),
}

/// Errors submitting a new order.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmissionError {
    /// No files were supplied.
    #[error("At least one file is required")]
    NoFiles,

    /// A file's MIME type is not accepted.
    #[error("File {name} has unsupported type {mime_type}")]
    UnsupportedMimeType {
        /// File name.
        name: String,
        /// Offending MIME type.
        mime_type: String,
    },

    /// A file exceeds the size limit.
    #[error("File {name} is {size} bytes, limit is {max}")]
    FileTooLarge {
        /// File name.
        name: String,
        /// File size in bytes.
        size: u64,
        /// Limit in bytes.
        max: u64,
    },

    /// No receive address was supplied.
    #[error("A receive address is required")]
    MissingReceiveAddress,

    /// The inscription service rejected or failed the request.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// The service answered with an inconsistent order.
    #[error(transparent)]
    Order(#[from] OrderError),
}
