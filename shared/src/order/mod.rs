//! Order status state machine and batch operation results

pub mod batch;
pub mod status;

pub use batch::{BatchError, BatchResult};
pub use status::{InvalidTransition, OrderStatus, validate_transition};
