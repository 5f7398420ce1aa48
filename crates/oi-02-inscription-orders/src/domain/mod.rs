//! # Domain Module
//!
//! Core types for inscription orders: the snapshot-driven state machine,
//! the poll interval policy and submission validation. Pure, no I/O.

pub mod entities;
pub mod errors;
pub mod interval;
pub mod state_machine;
pub mod submission;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use interval::*;
pub use state_machine::apply;
pub use submission::*;
pub use value_objects::*;
