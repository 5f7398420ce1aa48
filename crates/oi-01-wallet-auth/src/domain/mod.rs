//! # Domain Layer
//!
//! Address codec and signature verification. Pure logic, no I/O.
//! This is the inner layer of the hexagonal architecture.

pub mod address;
pub mod bip137;
pub mod bip322;
pub mod entities;
pub mod errors;
pub mod message;
pub mod transaction;
pub mod verifier;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_helpers;
