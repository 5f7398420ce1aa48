//! # Inscriber Runtime
//!
//! Connects the wallet-auth (`oi-01`) and inscription-order (`oi-02`)
//! subsystems to their remote collaborators and drives them from the
//! `inscriber` command line tool.
//!
//! ## Module Structure
//!
//! - `config` - environment-driven `RuntimeConfig`
//! - `logging` - tracing subscriber setup
//! - `adapters/` - HTTP implementations of the outbound ports
//! - `wiring` - builds services from configuration

#![warn(missing_docs)]

pub mod adapters;
pub mod config;
pub mod logging;
pub mod wiring;

pub use config::{ConfigError, RuntimeConfig};
pub use logging::init_logging;
