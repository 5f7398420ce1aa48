//! # Ports Layer
//!
//! Trait definitions for the hexagonal architecture.
//! - **Inbound (Driving)**: API that callers use to prove address ownership
//! - **Outbound (Driven)**: the identity provider that issues sessions

pub mod inbound;
pub mod outbound;
