//! # Ports Layer
//!
//! - **Inbound (Driving)**: `InscriptionOrdersApi`
//! - **Outbound (Driven)**: the remote inscription service and fee-rate source

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
