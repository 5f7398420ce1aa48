//! # Inscription Orders Subsystem (OI-02)
//!
//! Places inscription orders with a remote service and follows each one
//! to completion.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): order state machine, interval policy,
//!   submission validation. Pure, no I/O
//! - **Ports Layer** (`ports/`): inbound `InscriptionOrdersApi`, outbound
//!   `InscriptionServiceClient` and `FeeRateSource`
//! - **Application Layer** (`application/`): `PollScheduler`, `OrderService`
//!
//! ## Module Structure
//!
//! ```text
//! oi-02-inscription-orders/
//! ├── config.rs             # OrdersConfig
//! ├── domain/
//! │   ├── entities.rs       # RemoteOrderSnapshot, InscriptionOrder
//! │   ├── value_objects.rs  # OrderId, OrderState, FeeRate
//! │   ├── state_machine.rs  # apply()
//! │   ├── interval.rs       # IntervalPolicy
//! │   ├── submission.rs     # OrderSubmission
//! │   └── errors.rs
//! ├── ports/
//! │   ├── inbound.rs
//! │   └── outbound.rs       # ports + scripted doubles
//! └── application/
//!     ├── scheduler.rs      # poll loop, cancellation, OrderWatch
//!     └── service.rs
//! ```
//!
//! ## Polling
//!
//! | Phase | Condition | Interval |
//! |-------|-----------|----------|
//! | Fast | no charge address yet | 5 s |
//! | Slow | charge address known | 20 s |
//!
//! Polling stops at `Completed` or `Failed`, or when the caller cancels.

#![warn(missing_docs)]

pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-export public API
pub use application::{
    cancel_pair, CancelHandle, CancelSignal, OrderService, OrderWatch, PollOutcome, PollScheduler,
};
pub use config::OrdersConfig;
pub use domain::{
    apply, mime_type_for, Charge, FeeRate, FileStatus, InscriptionFile, InscriptionOrder,
    IntervalPolicy, OrderError, OrderId, OrderState, OrderSubmission, RecommendedFees,
    RemoteError, RemoteOrderSnapshot, SubmissionError, ALLOWED_MIME_TYPES, MAX_FEE_RATE,
    MAX_FILE_SIZE, MIN_FEE_RATE,
};
pub use ports::{
    FeeRateSource, InscriptionOrdersApi, InscriptionServiceClient, ScriptedInscriptionService,
    StaticFeeSource,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
