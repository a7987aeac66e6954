//! Schema definitions
//!
//! Tables stay schemaless; indexes cover the hot query paths (movement
//! listing, timed-out order scan, history lookup). Statements are idempotent
//! so they run on every startup.

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::utils::AppError;

const DEFINITIONS: &[&str] = &[
    "DEFINE TABLE IF NOT EXISTS product SCHEMALESS",
    "DEFINE TABLE IF NOT EXISTS variant SCHEMALESS",
    "DEFINE TABLE IF NOT EXISTS inventory_movement SCHEMALESS",
    "DEFINE TABLE IF NOT EXISTS order SCHEMALESS",
    "DEFINE TABLE IF NOT EXISTS order_history SCHEMALESS",
    "DEFINE INDEX IF NOT EXISTS product_sku ON product FIELDS sku",
    "DEFINE INDEX IF NOT EXISTS variant_product ON variant FIELDS product",
    "DEFINE INDEX IF NOT EXISTS movement_product ON inventory_movement FIELDS product, created_at",
    "DEFINE INDEX IF NOT EXISTS movement_created ON inventory_movement FIELDS created_at",
    "DEFINE INDEX IF NOT EXISTS order_status_created ON order FIELDS status, created_at",
    "DEFINE INDEX IF NOT EXISTS history_order ON order_history FIELDS order, created_at",
];

/// Apply all schema definitions
pub async fn apply(db: &Surreal<Db>) -> Result<(), AppError> {
    for stmt in DEFINITIONS {
        db.query(*stmt)
            .await
            .map_err(|e| AppError::database(format!("Schema definition failed: {e}")))?
            .check()
            .map_err(|e| AppError::database(format!("Schema definition rejected: {e}")))?;
    }
    tracing::info!("Schema definitions applied ({} statements)", DEFINITIONS.len());
    Ok(())
}
