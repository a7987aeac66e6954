//! Order lifecycle coordinator
//!
//! Sequences the state machine, the stock ledger, and the history trail for
//! order-level operations. Bulk operations isolate per-order failures into a
//! [`BatchResult`] instead of aborting; the timeout sweep and stock release
//! are written to be safe under re-runs and concurrent callers.

use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::{Order, OrderCreate, OrderHistoryCreate, OrderItem};
use crate::db::repository::{
    InventoryRepository, NewMovement, OrderHistoryRepository, OrderRepository, ProductRepository,
    StockTarget,
};
use crate::inventory::events::{StockEvent, StockEventSender};
use crate::inventory::ledger::parse_record_id;
use crate::utils::{AppError, AppResult, now_millis};
use shared::{ActorType, BatchResult, MovementType, OrderStatus, ReferenceType, validate_transition};

/// Outcome of one timeout sweep
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct SweepResult {
    pub scanned: usize,
    pub cancelled: usize,
    pub failed: usize,
    /// Orders whose stock release did not fully succeed; the cancellation
    /// itself still went through
    pub release_failures: usize,
}

/// Outcome of a stock release for one order
#[derive(Debug, Clone, serde::Serialize)]
pub struct StockRelease {
    /// False when the order had already released its stock; nothing was done
    pub performed: bool,
    /// Items whose release failed; the rest still went through
    pub failures: Vec<String>,
}

#[derive(Clone)]
pub struct OrderLifecycle {
    orders: OrderRepository,
    history: OrderHistoryRepository,
    inventory: InventoryRepository,
    products: ProductRepository,
    events: StockEventSender,
    instant_timeout_ms: i64,
    cod_timeout_ms: i64,
}

impl OrderLifecycle {
    pub fn new(
        db: Surreal<Db>,
        events: StockEventSender,
        instant_timeout_ms: i64,
        cod_timeout_ms: i64,
    ) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            history: OrderHistoryRepository::new(db.clone()),
            inventory: InventoryRepository::new(db.clone()),
            products: ProductRepository::new(db),
            events,
            instant_timeout_ms,
            cod_timeout_ms,
        }
    }

    pub async fn find_order(&self, order_id: &str) -> AppResult<Order> {
        let rid = parse_record_id("order", order_id)?;
        self.orders
            .find_by_id(&rid)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {order_id}")))
    }

    /// Audit trail of an order, oldest entry first
    pub async fn order_history(
        &self,
        order_id: &str,
    ) -> AppResult<Vec<crate::db::models::OrderHistoryEntry>> {
        let order = self.find_order(order_id).await?;
        let order_rid = order_record(&order)?;
        Ok(self.history.find_by_order(&order_rid).await?)
    }

    /// Place an order and reserve stock for every item
    ///
    /// Reservation is all-or-nothing across items: a failed item triggers a
    /// compensating release of the ones already reserved and the whole call
    /// fails, leaving the order pending with nothing held.
    pub async fn create_order(&self, data: OrderCreate, actor_name: &str) -> AppResult<Order> {
        if data.items.is_empty() {
            return Err(AppError::validation("order must contain at least one item"));
        }

        let mut items = Vec::with_capacity(data.items.len());
        for line in &data.items {
            if line.quantity <= 0 {
                return Err(AppError::validation("item quantity must be positive"));
            }
            let product_rid = parse_record_id("product", &line.product_id)?;
            let product = self
                .products
                .find_by_id(&product_rid)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Product {}", line.product_id)))?;

            let (variation, sku) = match &line.variation_id {
                Some(raw) => {
                    let variant_rid = parse_record_id("variant", raw)?;
                    let variant = self
                        .products
                        .find_variant(&variant_rid)
                        .await?
                        .ok_or_else(|| AppError::not_found(format!("Variant {raw}")))?;
                    if variant.product != product_rid {
                        return Err(AppError::validation(format!(
                            "variant {raw} does not belong to product {}",
                            line.product_id
                        )));
                    }
                    (Some(variant_rid), variant.sku)
                }
                None => {
                    if product.has_variants {
                        return Err(AppError::validation(format!(
                            "product {} is variable; variation_id is required",
                            line.product_id
                        )));
                    }
                    (None, product.sku)
                }
            };

            items.push(OrderItem {
                product: product_rid,
                variation,
                sku,
                quantity: line.quantity,
            });
        }

        let order = self.orders.create(data.payment_method, items).await?;
        self.reserve_stock(&order).await?;

        let order_rid = order_record(&order)?;
        self.append_history(
            &order_rid,
            "order_created",
            format!("Order {} placed, stock reserved", order.order_number),
            ActorType::Customer,
            actor_name,
        )
        .await?;

        Ok(order)
    }

    /// Reserve stock for every item of an order
    pub async fn reserve_stock(&self, order: &Order) -> AppResult<()> {
        let order_rid = order_record(order)?;
        let mut reserved: Vec<&OrderItem> = Vec::new();

        for item in &order.items {
            let target = item_target(item);
            let result = self
                .inventory
                .reserve(
                    &target,
                    &item.sku,
                    item.quantity,
                    NewMovement {
                        movement_type: MovementType::Reservation,
                        reference_type: ReferenceType::Order,
                        reference: Some(order_rid.clone()),
                        reason: format!("Reserved for order {}", order.order_number),
                        adjusted_by: "system".to_string(),
                        actor_label: "system".to_string(),
                    },
                )
                .await;

            match result {
                Ok(()) => reserved.push(item),
                Err(err) => {
                    // Hand back what we already took before surfacing the failure
                    for held in reserved {
                        let target = item_target(held);
                        if let Err(release_err) = self
                            .inventory
                            .release(
                                &target,
                                &held.sku,
                                held.quantity,
                                NewMovement {
                                    movement_type: MovementType::Release,
                                    reference_type: ReferenceType::Order,
                                    reference: Some(order_rid.clone()),
                                    reason: format!(
                                        "Reservation rollback for order {}",
                                        order.order_number
                                    ),
                                    adjusted_by: "system".to_string(),
                                    actor_label: "system".to_string(),
                                },
                            )
                            .await
                        {
                            tracing::error!(
                                order = %order.order_number,
                                sku = %held.sku,
                                error = %release_err,
                                "reservation rollback failed"
                            );
                        }
                    }
                    return Err(err.into());
                }
            }
        }

        for item in &order.items {
            let _ = self.events.send(StockEvent::Invalidate {
                product_id: item.product.to_string(),
            });
        }
        Ok(())
    }

    /// Return reserved stock for an order, at most once
    ///
    /// The `stock_released` flag flips via an atomic conditional update, so
    /// a concurrent or repeated call observes `performed: false` and does
    /// nothing. Per-item failures are collected rather than aborting the
    /// rest; the flag stays set so a later sweep does not double-release the
    /// items that did succeed.
    pub async fn release_stock(&self, order: &Order, actor_name: &str) -> AppResult<StockRelease> {
        let order_rid = order_record(order)?;

        if !self.orders.mark_stock_released(&order_rid).await? {
            return Ok(StockRelease {
                performed: false,
                failures: Vec::new(),
            });
        }

        let mut failures = Vec::new();
        for item in &order.items {
            let target = item_target(item);
            let result = self
                .inventory
                .release(
                    &target,
                    &item.sku,
                    item.quantity,
                    NewMovement {
                        movement_type: MovementType::Release,
                        reference_type: ReferenceType::Order,
                        reference: Some(order_rid.clone()),
                        reason: format!("Released for order {}", order.order_number),
                        adjusted_by: "system".to_string(),
                        actor_label: actor_name.to_string(),
                    },
                )
                .await;

            if let Err(err) = result {
                tracing::error!(
                    order = %order.order_number,
                    sku = %item.sku,
                    error = %err,
                    "stock release failed for item"
                );
                failures.push(format!("{}: {err}", item.sku));
            } else {
                let _ = self.events.send(StockEvent::Invalidate {
                    product_id: item.product.to_string(),
                });
            }
        }

        self.append_history(
            &order_rid,
            "stock_released",
            format!(
                "Reserved stock returned ({} item(s), {} failure(s))",
                order.items.len(),
                failures.len()
            ),
            ActorType::System,
            actor_name,
        )
        .await?;

        Ok(StockRelease {
            performed: true,
            failures,
        })
    }

    /// Approve pending orders in bulk
    ///
    /// Only `pending` orders qualify; anything else fails on its own without
    /// touching the rest of the batch. An empty batch is a caller error, not
    /// an empty result.
    pub async fn bulk_approve(
        &self,
        order_ids: &[String],
        actor_name: &str,
    ) -> AppResult<BatchResult> {
        if order_ids.is_empty() {
            return Err(AppError::validation("order_ids must not be empty"));
        }
        let mut result = BatchResult::new();
        for order_id in order_ids {
            match self
                .transition_one(order_id, Some(OrderStatus::Pending), OrderStatus::Confirmed, actor_name)
                .await
            {
                Ok(_) => result.record_success(),
                Err(err) => result.record_failure(order_id.clone(), err.to_string()),
            }
        }
        Ok(result)
    }

    /// Move orders to a target status in bulk
    ///
    /// Each order's current status is validated against the state machine.
    /// An order already at the target counts as success without a write.
    pub async fn bulk_update_status(
        &self,
        order_ids: &[String],
        target: OrderStatus,
        actor_name: &str,
    ) -> AppResult<BatchResult> {
        if order_ids.is_empty() {
            return Err(AppError::validation("order_ids must not be empty"));
        }
        let mut result = BatchResult::new();
        for order_id in order_ids {
            match self.transition_one(order_id, None, target, actor_name).await {
                Ok(_) => result.record_success(),
                Err(err) => result.record_failure(order_id.clone(), err.to_string()),
            }
        }
        Ok(result)
    }

    /// Transition a single order, enforcing the state machine and CAS
    async fn transition_one(
        &self,
        order_id: &str,
        required_current: Option<OrderStatus>,
        target: OrderStatus,
        actor_name: &str,
    ) -> AppResult<Order> {
        let order = self.find_order(order_id).await?;

        if let Some(required) = required_current {
            if order.status != required {
                return Err(AppError::invalid_transition(format!(
                    "order {} is {}, expected {required}",
                    order.order_number, order.status
                )));
            }
        }

        // Already there: nothing to write, nothing to log
        if order.status == target {
            return Ok(order);
        }
        validate_transition(order.status, target)?;

        let order_rid = order_record(&order)?;
        let updated = self
            .orders
            .update_status_cas(&order_rid, order.status, order.version, target)
            .await?;

        self.append_history(
            &order_rid,
            "status_changed",
            format!("Status changed from {} to {target}", order.status),
            ActorType::Admin,
            actor_name,
        )
        .await?;

        Ok(updated)
    }

    /// Cancel pending orders whose payment window has lapsed
    ///
    /// Stock release runs first and is best-effort: a failed release is
    /// logged and counted but never blocks the cancellation. The sweep is
    /// idempotent; an order cancelled by a concurrent sweep just misses the
    /// CAS and counts as failed without side effects.
    pub async fn auto_cancel_timed_out(&self) -> AppResult<SweepResult> {
        let now = now_millis();
        let timed_out = self
            .orders
            .find_timed_out_pending(now - self.instant_timeout_ms, now - self.cod_timeout_ms)
            .await?;

        let mut sweep = SweepResult {
            scanned: timed_out.len(),
            ..Default::default()
        };

        for order in timed_out {
            match self.cancel_timed_out(&order).await {
                Ok(released_cleanly) => {
                    sweep.cancelled += 1;
                    if !released_cleanly {
                        sweep.release_failures += 1;
                    }
                }
                Err(err) => {
                    tracing::warn!(
                        order = %order.order_number,
                        error = %err,
                        "auto-cancel skipped order"
                    );
                    sweep.failed += 1;
                }
            }
        }

        tracing::info!(
            scanned = sweep.scanned,
            cancelled = sweep.cancelled,
            failed = sweep.failed,
            release_failures = sweep.release_failures,
            "payment timeout sweep finished"
        );
        Ok(sweep)
    }

    /// Cancel first, release after. If an admin moved the order on between
    /// the scan and this write, the CAS misses and the live order keeps its
    /// reservation untouched.
    async fn cancel_timed_out(&self, order: &Order) -> AppResult<bool> {
        let order_rid = order_record(order)?;
        self.orders
            .update_status_cas(
                &order_rid,
                OrderStatus::Pending,
                order.version,
                OrderStatus::Cancelled,
            )
            .await?;

        self.append_history(
            &order_rid,
            "status_changed",
            format!(
                "Order {} auto-cancelled: payment window expired",
                order.order_number
            ),
            ActorType::System,
            "system",
        )
        .await?;

        let release = self.release_stock(order, "system").await?;
        Ok(release.failures.is_empty())
    }

    async fn append_history(
        &self,
        order: &RecordId,
        action: &str,
        description: String,
        actor_type: ActorType,
        actor_name: &str,
    ) -> AppResult<()> {
        self.history
            .append(OrderHistoryCreate {
                order: order.clone(),
                action: action.to_string(),
                description,
                actor_type,
                actor_name: actor_name.to_string(),
                metadata: None,
            })
            .await?;
        Ok(())
    }
}

fn order_record(order: &Order) -> AppResult<RecordId> {
    order
        .id
        .clone()
        .ok_or_else(|| AppError::internal("order record is missing its id"))
}

fn item_target(item: &OrderItem) -> StockTarget {
    match &item.variation {
        Some(variant) => StockTarget::Variant {
            product: item.product.clone(),
            variant: variant.clone(),
        },
        None => StockTarget::Product(item.product.clone()),
    }
}
