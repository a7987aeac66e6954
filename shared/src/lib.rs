//! Shared types for the storefront inventory and order lifecycle service
//!
//! This crate holds the types that are meaningful outside the server process:
//!
//! - **order**: order status state machine and batch operation results
//! - **inventory**: stock movement enums for the append-only ledger
//! - **types**: actor and payment method enums
//!
//! Everything here is pure data + pure functions. No I/O, no database types.

pub mod inventory;
pub mod order;
pub mod types;

// Re-export the types callers reach for most often
pub use inventory::{MovementType, ReferenceType};
pub use order::{BatchError, BatchResult, InvalidTransition, OrderStatus, validate_transition};
pub use types::{ActorType, PaymentMethod};
