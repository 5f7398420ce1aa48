//! # Shared Types Crate
//!
//! Types shared by the wallet-auth (oi-01) and inscription-order (oi-02)
//! subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: network parameters (HRPs, version bytes)
//!   are defined once here and consumed by the address codec and the
//!   fee-rate adapter.
//! - **No Live Identity**: nothing here holds "the current wallet"; a
//!   `ConnectedWallet` is a plain value passed explicitly into calls.

pub mod entities;
pub mod errors;
pub mod network;

pub use entities::*;
pub use errors::*;
pub use network::Network;
