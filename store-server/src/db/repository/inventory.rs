//! Inventory repository
//!
//! The only write path for stock counters. `adjust` applies the counter
//! delta and appends the ledger row in a single transaction; the zero-floor
//! invariant is enforced by the `WHERE` guard of the conditional update, so
//! concurrent decrements serialize inside the storage engine instead of
//! racing through a read-modify-write.

use serde::Deserialize;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use uuid::Uuid;

use super::{BaseRepository, RepoError, RepoResult, take_query_errors};
use crate::db::models::InventoryMovement;
use crate::utils::now_millis;
use shared::{MovementType, ReferenceType};

const MOVEMENT_TABLE: &str = "inventory_movement";

/// Which row carries the stock counters for an adjustment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockTarget {
    Product(RecordId),
    Variant { product: RecordId, variant: RecordId },
}

impl StockTarget {
    /// The row the guarded update runs against
    pub fn record(&self) -> &RecordId {
        match self {
            StockTarget::Product(id) => id,
            StockTarget::Variant { variant, .. } => variant,
        }
    }

    /// The product the ledger entry is filed under
    pub fn product(&self) -> &RecordId {
        match self {
            StockTarget::Product(id) => id,
            StockTarget::Variant { product, .. } => product,
        }
    }

    pub fn variation(&self) -> Option<&RecordId> {
        match self {
            StockTarget::Product(_) => None,
            StockTarget::Variant { variant, .. } => Some(variant),
        }
    }
}

/// Counter snapshot of a stock target
#[derive(Debug, Clone, Deserialize)]
pub struct TargetRow {
    pub sku: String,
    pub stock_quantity: i64,
    pub reserved_quantity: i64,
}

/// Ledger metadata for a movement about to be written
#[derive(Debug, Clone)]
pub struct NewMovement {
    pub movement_type: MovementType,
    pub reference_type: ReferenceType,
    pub reference: Option<RecordId>,
    pub reason: String,
    pub adjusted_by: String,
    pub actor_label: String,
}

/// Result of a successful adjustment
#[derive(Debug, Clone, Deserialize)]
pub struct AdjustOutcome {
    pub new_stock: i64,
    pub movement_id: String,
}

/// Movement listing filters (already clamped by the caller)
#[derive(Debug, Clone, Default)]
pub struct MovementFilter {
    pub product: Option<RecordId>,
    pub variation: Option<RecordId>,
    pub sku: Option<String>,
    pub movement_type: Option<MovementType>,
    pub reference_type: Option<ReferenceType>,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
    pub page: i64,
    pub per_page: i64,
}

#[derive(Debug, Deserialize)]
struct CountRow {
    count: i64,
}

/// Attach the optional movement filters as query bindings
fn bind_filters<'a>(
    mut q: surrealdb::method::Query<'a, Db>,
    filter: &MovementFilter,
) -> surrealdb::method::Query<'a, Db> {
    if let Some(v) = &filter.product {
        q = q.bind(("product", v.clone()));
    }
    if let Some(v) = &filter.variation {
        q = q.bind(("variation", v.clone()));
    }
    if let Some(v) = &filter.sku {
        q = q.bind(("sku", v.clone()));
    }
    if let Some(v) = filter.movement_type {
        q = q.bind(("movement_type", v));
    }
    if let Some(v) = filter.reference_type {
        q = q.bind(("reference_type", v));
    }
    if let Some(v) = filter.start_date {
        q = q.bind(("start_date", v));
    }
    if let Some(v) = filter.end_date {
        q = q.bind(("end_date", v));
    }
    q
}

#[derive(Clone)]
pub struct InventoryRepository {
    base: BaseRepository,
}

impl InventoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Read the counters of a stock target, if it exists
    pub async fn find_target(&self, target: &StockTarget) -> RepoResult<Option<TargetRow>> {
        let row: Option<TargetRow> = self
            .base
            .db()
            .query("SELECT sku, stock_quantity, reserved_quantity FROM ONLY $target")
            .bind(("target", target.record().clone()))
            .await?
            .take(0)?;
        Ok(row)
    }

    /// Apply a signed delta to the on-hand counter and append the ledger row
    ///
    /// All-or-nothing: if the guard rejects the decrease, neither the
    /// counter nor the ledger is touched. Returns `NotFound` when the target
    /// row does not exist, `InsufficientStock` when the decrease would drive
    /// available stock below zero.
    pub async fn adjust(
        &self,
        target: &StockTarget,
        sku: &str,
        delta: i64,
        movement: NewMovement,
    ) -> RepoResult<AdjustOutcome> {
        let movement_id = RecordId::from_table_key(MOVEMENT_TABLE, Uuid::new_v4().to_string());
        let mut result = self
            .base
            .db()
            .query(
                "BEGIN TRANSACTION;
                 LET $rows = (UPDATE $target SET
                        stock_quantity += $delta,
                        version += 1,
                        updated_at = $now
                    WHERE $delta >= 0 OR stock_quantity + $delta >= reserved_quantity
                    RETURN AFTER);
                 IF array::len($rows) == 0 { THROW 'insufficient_stock' };
                 CREATE ONLY $movement_id CONTENT {
                    product: $product,
                    variation: $variation,
                    sku: $sku,
                    direction: $direction,
                    quantity: $quantity,
                    movement_type: $movement_type,
                    reference_type: $reference_type,
                    reference: $reference,
                    reason: $reason,
                    adjusted_by: $adjusted_by,
                    actor_label: $actor_label,
                    created_at: $now
                 };
                 RETURN {
                    new_stock: $rows[0].stock_quantity,
                    movement_id: <string>$movement_id
                 };
                 COMMIT TRANSACTION;",
            )
            .bind(("target", target.record().clone()))
            .bind(("delta", delta))
            .bind(("now", now_millis()))
            .bind(("movement_id", movement_id))
            .bind(("product", target.product().clone()))
            .bind(("variation", target.variation().cloned()))
            .bind(("sku", sku.to_string()))
            .bind(("direction", if delta >= 0 { 1i64 } else { -1i64 }))
            .bind(("quantity", delta.abs()))
            .bind(("movement_type", movement.movement_type))
            .bind(("reference_type", movement.reference_type))
            .bind(("reference", movement.reference))
            .bind(("reason", movement.reason))
            .bind(("adjusted_by", movement.adjusted_by))
            .bind(("actor_label", movement.actor_label))
            .await?;

        take_query_errors(&mut result)?;
        let outcome: Option<AdjustOutcome> = result.take(0)?;
        outcome.ok_or_else(|| RepoError::Database("adjustment returned no outcome".to_string()))
    }

    /// Reserve stock for an order: bump the reserved counter, guarded so the
    /// reservation never exceeds on-hand stock
    pub async fn reserve(
        &self,
        target: &StockTarget,
        sku: &str,
        quantity: i64,
        movement: NewMovement,
    ) -> RepoResult<()> {
        let movement_id = RecordId::from_table_key(MOVEMENT_TABLE, Uuid::new_v4().to_string());
        let mut result = self
            .base
            .db()
            .query(
                "BEGIN TRANSACTION;
                 LET $rows = (UPDATE $target SET
                        reserved_quantity += $quantity,
                        version += 1,
                        updated_at = $now
                    WHERE reserved_quantity + $quantity <= stock_quantity
                    RETURN AFTER);
                 IF array::len($rows) == 0 { THROW 'insufficient_stock' };
                 CREATE ONLY $movement_id CONTENT {
                    product: $product,
                    variation: $variation,
                    sku: $sku,
                    direction: -1,
                    quantity: $quantity,
                    movement_type: 'reservation',
                    reference_type: $reference_type,
                    reference: $reference,
                    reason: $reason,
                    adjusted_by: $adjusted_by,
                    actor_label: $actor_label,
                    created_at: $now
                 };
                 RETURN $rows[0].reserved_quantity;
                 COMMIT TRANSACTION;",
            )
            .bind(("target", target.record().clone()))
            .bind(("quantity", quantity))
            .bind(("now", now_millis()))
            .bind(("movement_id", movement_id))
            .bind(("product", target.product().clone()))
            .bind(("variation", target.variation().cloned()))
            .bind(("sku", sku.to_string()))
            .bind(("reference_type", movement.reference_type))
            .bind(("reference", movement.reference))
            .bind(("reason", movement.reason))
            .bind(("adjusted_by", movement.adjusted_by))
            .bind(("actor_label", movement.actor_label))
            .await?;

        take_query_errors(&mut result)?;
        let _reserved: Option<i64> = result.take(0)?;
        Ok(())
    }

    /// Release previously reserved stock
    ///
    /// Clamped at zero: if the reserved counter has drifted below the
    /// requested quantity, the release empties it rather than failing, and
    /// the ledger records the quantity actually released.
    pub async fn release(
        &self,
        target: &StockTarget,
        sku: &str,
        quantity: i64,
        movement: NewMovement,
    ) -> RepoResult<i64> {
        let movement_id = RecordId::from_table_key(MOVEMENT_TABLE, Uuid::new_v4().to_string());
        let mut result = self
            .base
            .db()
            .query(
                "BEGIN TRANSACTION;
                 LET $before = (SELECT VALUE reserved_quantity FROM ONLY $target);
                 IF $before == NONE { THROW 'target_missing' };
                 LET $released = math::min([$before, $quantity]);
                 UPDATE $target SET
                        reserved_quantity -= $released,
                        version += 1,
                        updated_at = $now;
                 IF $released > 0 {
                    CREATE ONLY $movement_id CONTENT {
                        product: $product,
                        variation: $variation,
                        sku: $sku,
                        direction: 1,
                        quantity: $released,
                        movement_type: 'release',
                        reference_type: $reference_type,
                        reference: $reference,
                        reason: $reason,
                        adjusted_by: $adjusted_by,
                        actor_label: $actor_label,
                        created_at: $now
                    };
                 };
                 RETURN $released;
                 COMMIT TRANSACTION;",
            )
            .bind(("target", target.record().clone()))
            .bind(("quantity", quantity))
            .bind(("now", now_millis()))
            .bind(("movement_id", movement_id))
            .bind(("product", target.product().clone()))
            .bind(("variation", target.variation().cloned()))
            .bind(("sku", sku.to_string()))
            .bind(("reference_type", movement.reference_type))
            .bind(("reference", movement.reference))
            .bind(("reason", movement.reason))
            .bind(("adjusted_by", movement.adjusted_by))
            .bind(("actor_label", movement.actor_label))
            .await?;

        take_query_errors(&mut result)?;
        let released: Option<i64> = result.take(0)?;
        released.ok_or_else(|| RepoError::Database("release returned no outcome".to_string()))
    }

    /// List ledger movements, newest first
    pub async fn movements(
        &self,
        filter: &MovementFilter,
    ) -> RepoResult<(Vec<InventoryMovement>, i64)> {
        let mut where_parts: Vec<&str> = Vec::new();
        if filter.product.is_some() {
            where_parts.push("product = $product");
        }
        if filter.variation.is_some() {
            where_parts.push("variation = $variation");
        }
        if filter.sku.is_some() {
            where_parts.push("sku = $sku");
        }
        if filter.movement_type.is_some() {
            where_parts.push("movement_type = $movement_type");
        }
        if filter.reference_type.is_some() {
            where_parts.push("reference_type = $reference_type");
        }
        if filter.start_date.is_some() {
            where_parts.push("created_at >= $start_date");
        }
        if filter.end_date.is_some() {
            where_parts.push("created_at <= $end_date");
        }

        let where_clause = if where_parts.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", where_parts.join(" AND "))
        };

        let data_query = format!(
            "SELECT * FROM inventory_movement{where_clause} ORDER BY created_at DESC LIMIT $limit START $start"
        );
        let count_query =
            format!("SELECT count() AS count FROM inventory_movement{where_clause} GROUP ALL");

        let start = (filter.page - 1) * filter.per_page;
        let mut data_res = bind_filters(self.base.db().query(&data_query), filter)
            .bind(("limit", filter.per_page))
            .bind(("start", start))
            .await?;
        let rows: Vec<InventoryMovement> = data_res.take(0)?;

        let mut count_res = bind_filters(self.base.db().query(&count_query), filter).await?;
        let counts: Vec<CountRow> = count_res.take(0)?;
        let total = counts.first().map(|c| c.count).unwrap_or(0);

        Ok((rows, total))
    }

    /// Reconstruct the on-hand counter from the ledger
    ///
    /// Sums `direction * quantity` over stock-affecting movement types for
    /// one target. Used by reconciliation tooling and invariant tests.
    pub async fn ledger_stock_sum(&self, target: &StockTarget) -> RepoResult<i64> {
        let (clause, variation) = match target.variation() {
            Some(v) => ("variation = $variation", Some(v.clone())),
            None => ("product = $product AND variation = NONE", None),
        };
        let query = format!(
            "SELECT math::sum(direction * quantity) AS count FROM inventory_movement \
             WHERE {clause} AND movement_type NOT IN ['reservation', 'release'] GROUP ALL"
        );

        let mut q = self.base.db().query(&query);
        if let Some(v) = variation {
            q = q.bind(("variation", v));
        } else {
            q = q.bind(("product", target.product().clone()));
        }

        let mut res = q.await?;
        let rows: Vec<CountRow> = res.take(0)?;
        Ok(rows.first().map(|c| c.count).unwrap_or(0))
    }
}
