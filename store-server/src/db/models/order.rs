//! Order model
//!
//! Items are embedded and immutable once the order is placed; they drive
//! reservation and release quantities. Status transitions go through the
//! state machine, never through direct writes.

use serde::{Deserialize, Serialize};
use shared::{OrderStatus, PaymentMethod};
use surrealdb::RecordId;

/// One line of an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub product: RecordId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variation: Option<RecordId>,
    /// SKU snapshot at placement time
    pub sku: String,
    pub quantity: i64,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub order_number: String,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub items: Vec<OrderItem>,
    /// Set once when reserved stock is returned (auto-cancel, refund);
    /// guards against double release
    pub stock_released: bool,
    /// Optimistic lock counter
    pub version: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create order payload (checkout caller)
#[derive(Debug, Clone, Deserialize)]
pub struct OrderCreate {
    pub payment_method: PaymentMethod,
    pub items: Vec<OrderItemCreate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemCreate {
    pub product_id: String,
    pub variation_id: Option<String>,
    pub quantity: i64,
}
