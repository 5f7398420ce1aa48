//! # Application Layer
//!
//! The poll scheduler and the service that places and tracks orders.

pub mod scheduler;
pub mod service;

pub use scheduler::{cancel_pair, CancelHandle, CancelSignal, OrderWatch, PollOutcome, PollScheduler};
pub use service::OrderService;
