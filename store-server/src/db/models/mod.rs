//! Database models
//!
//! Entity structs persisted in SurrealDB plus their create payloads.
//! Timestamps are Unix milliseconds (see `utils::time`).

pub mod history;
pub mod movement;
pub mod order;
pub mod product;

pub use history::{OrderHistoryCreate, OrderHistoryEntry};
pub use movement::InventoryMovement;
pub use order::{Order, OrderCreate, OrderItem, OrderItemCreate};
pub use product::{Product, ProductCreate, Variant, VariantCreate};
