//! Product and variant models
//!
//! A product is either simple (stock counters live on the product row,
//! `has_variants == false`) or variable (counters live on its `variant`
//! rows). Exactly one representation holds the counters; code resolving a
//! stock target must pick the right one.

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    pub sku: String,
    /// Stock tracking enabled; products with `false` are treated as always
    /// in stock and excluded from stock-status filtering
    pub manage_stock: bool,
    /// Counters live on `variant` rows when true
    pub has_variants: bool,
    pub stock_quantity: i64,
    pub reserved_quantity: i64,
    /// Falls back to the configured global default when None
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_stock_threshold: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<RecordId>,
    pub is_active: bool,
    /// Optimistic lock counter, bumped on every mutation
    pub version: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Product {
    /// On-hand minus reserved, floored at 0 for display
    pub fn available(&self) -> i64 {
        (self.stock_quantity - self.reserved_quantity).max(0)
    }
}

/// Create product payload
#[derive(Debug, Clone, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub sku: String,
    pub manage_stock: Option<bool>,
    pub stock_quantity: Option<i64>,
    pub low_stock_threshold: Option<i64>,
    pub category: Option<String>,
}

/// Variant entity (one row per size/color combination of a variable product)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variant {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Parent product reference
    pub product: RecordId,
    pub sku: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub stock_quantity: i64,
    pub reserved_quantity: i64,
    /// Inherits the parent product's threshold when None
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_stock_threshold: Option<i64>,
    pub version: i64,
}

impl Variant {
    pub fn available(&self) -> i64 {
        (self.stock_quantity - self.reserved_quantity).max(0)
    }
}

/// Create variant payload
#[derive(Debug, Clone, Deserialize)]
pub struct VariantCreate {
    pub sku: String,
    pub size: Option<String>,
    pub color: Option<String>,
    pub stock_quantity: Option<i64>,
    pub low_stock_threshold: Option<i64>,
}
