//! # Ordinals Inscriber Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/
//! │   └── verification_benchmarks.rs  # signature verification throughput
//! └── src/
//!     └── integration/                # flows across oi-01 and oi-02
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p oi-tests
//! cargo bench -p oi-tests
//! ```

pub mod integration;
