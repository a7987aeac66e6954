//! Order domain
//!
//! The lifecycle coordinator owns every order-level operation that touches
//! more than one table: bulk status changes, the payment timeout sweep, and
//! reserve/release of stock tied to an order.

pub mod lifecycle;

pub use lifecycle::{OrderLifecycle, StockRelease, SweepResult};
