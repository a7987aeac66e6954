//! Stock ledger
//!
//! Every stock-affecting event goes through [`StockLedger::adjust_stock`]:
//! the counter delta and the ledger row commit together, and the zero-floor
//! invariant (`stock - reserved >= 0`) is enforced by the repository's
//! guarded update. No other code path writes stock counters.

use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::InventoryMovement;
use crate::db::repository::{
    InventoryRepository, MovementFilter, NewMovement, ProductRepository, StockTarget,
};
use crate::inventory::events::{StockEvent, StockEventSender};
use crate::utils::types::clamp_pagination;
use crate::utils::validation::{MAX_REASON_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, Paginated};
use shared::{MovementType, ReferenceType};

/// Manual stock adjustment request
#[derive(Debug, Clone)]
pub struct StockAdjustment {
    pub product_id: String,
    pub variation_id: Option<String>,
    /// Signed, non-zero: positive increases stock, negative decreases
    pub quantity: i64,
    pub movement_type: MovementType,
    pub reason: String,
    pub reference_id: Option<String>,
}

/// Outcome of a successful adjustment
#[derive(Debug, Clone, serde::Serialize)]
pub struct StockAdjusted {
    pub new_stock: i64,
    pub movement_id: String,
}

/// Movement listing request (unclamped caller input)
#[derive(Debug, Clone, Default)]
pub struct MovementQuery {
    pub product_id: Option<String>,
    pub variation_id: Option<String>,
    pub sku: Option<String>,
    pub movement_type: Option<MovementType>,
    pub reference_type: Option<ReferenceType>,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Clone)]
pub struct StockLedger {
    products: ProductRepository,
    inventory: InventoryRepository,
    events: StockEventSender,
}

/// Parse a caller-supplied id into a record id of the expected table
///
/// Accepts both the full `table:key` form and a bare key.
pub(crate) fn parse_record_id(table: &str, raw: &str) -> AppResult<RecordId> {
    if let Ok(id) = raw.parse::<RecordId>() {
        if id.table() == table {
            return Ok(id);
        }
        return Err(AppError::validation(format!(
            "expected a {table} id, got {raw}"
        )));
    }
    if raw.trim().is_empty() {
        return Err(AppError::validation(format!("{table} id must not be empty")));
    }
    Ok(RecordId::from_table_key(table, raw))
}

impl StockLedger {
    pub fn new(db: Surreal<Db>, events: StockEventSender) -> Self {
        Self {
            products: ProductRepository::new(db.clone()),
            inventory: InventoryRepository::new(db),
            events,
        }
    }

    /// Resolve the row that carries the counters for this request
    ///
    /// Simple products adjust the product row; variable products require a
    /// variation id and adjust the variant row. Products without stock
    /// management reject adjustments outright.
    async fn resolve_target(
        &self,
        product_id: &str,
        variation_id: Option<&str>,
    ) -> AppResult<(StockTarget, String)> {
        let product_rid = parse_record_id("product", product_id)?;
        let product = self
            .products
            .find_by_id(&product_rid)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product {product_id}")))?;

        if !product.manage_stock {
            return Err(AppError::validation(format!(
                "stock management is disabled for product {product_id}"
            )));
        }

        match variation_id {
            Some(raw) => {
                let variant_rid = parse_record_id("variant", raw)?;
                let variant = self
                    .products
                    .find_variant(&variant_rid)
                    .await?
                    .ok_or_else(|| AppError::not_found(format!("Variant {raw}")))?;
                if variant.product != product_rid {
                    return Err(AppError::validation(format!(
                        "variant {raw} does not belong to product {product_id}"
                    )));
                }
                Ok((
                    StockTarget::Variant {
                        product: product_rid,
                        variant: variant_rid,
                    },
                    variant.sku,
                ))
            }
            None => {
                if product.has_variants {
                    return Err(AppError::validation(format!(
                        "product {product_id} is variable; variation_id is required"
                    )));
                }
                Ok((StockTarget::Product(product_rid), product.sku))
            }
        }
    }

    /// Atomically adjust stock and record the movement
    pub async fn adjust_stock(
        &self,
        params: StockAdjustment,
        actor_id: &str,
        actor_label: &str,
    ) -> AppResult<StockAdjusted> {
        if params.quantity == 0 {
            return Err(AppError::validation("quantity must be a non-zero integer"));
        }
        if !MovementType::ADJUSTABLE.contains(&params.movement_type) {
            return Err(AppError::validation(format!(
                "movement type {} is not allowed for manual adjustments",
                params.movement_type.as_str()
            )));
        }
        validate_required_text(&params.reason, "reason", MAX_REASON_LEN)?;

        let (target, sku) = self
            .resolve_target(&params.product_id, params.variation_id.as_deref())
            .await?;

        let reference = match &params.reference_id {
            Some(raw) => Some(parse_record_id("order", raw)?),
            None => None,
        };

        let outcome = self
            .inventory
            .adjust(
                &target,
                &sku,
                params.quantity,
                NewMovement {
                    movement_type: params.movement_type,
                    reference_type: ReferenceType::Manual,
                    reference,
                    reason: params.reason.clone(),
                    adjusted_by: actor_id.to_string(),
                    actor_label: actor_label.to_string(),
                },
            )
            .await?;

        tracing::info!(
            product = %params.product_id,
            variation = ?params.variation_id,
            quantity = params.quantity,
            movement_type = params.movement_type.as_str(),
            new_stock = outcome.new_stock,
            "stock adjusted"
        );

        // Signal downstream caches; nobody listening is fine
        let _ = self.events.send(StockEvent::Invalidate {
            product_id: target.product().to_string(),
        });

        Ok(StockAdjusted {
            new_stock: outcome.new_stock,
            movement_id: outcome.movement_id,
        })
    }

    /// List ledger movements, newest first
    pub async fn get_movements(
        &self,
        query: MovementQuery,
    ) -> AppResult<Paginated<InventoryMovement>> {
        let (page, per_page) = clamp_pagination(query.page, query.per_page);

        let filter = MovementFilter {
            product: query
                .product_id
                .as_deref()
                .map(|p| parse_record_id("product", p))
                .transpose()?,
            variation: query
                .variation_id
                .as_deref()
                .map(|v| parse_record_id("variant", v))
                .transpose()?,
            sku: query.sku,
            movement_type: query.movement_type,
            reference_type: query.reference_type,
            start_date: query.start_date,
            end_date: query.end_date,
            page,
            per_page,
        };

        let (rows, total) = self.inventory.movements(&filter).await?;
        Ok(Paginated {
            data: rows,
            total,
            page,
            per_page,
        })
    }
}
