//! Order repository
//!
//! Status writes are compare-and-swap: the update carries both the expected
//! status and the expected version, so a concurrent change makes the write
//! miss and surface as a conflict instead of clobbering.

use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use uuid::Uuid;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Order, OrderItem};
use crate::utils::now_millis;
use shared::{OrderStatus, PaymentMethod};

const ORDER_TABLE: &str = "order";

/// Payment methods swept with the short (QR / e-wallet) timeout
const INSTANT_METHODS: &[PaymentMethod] = &[
    PaymentMethod::Vietqr,
    PaymentMethod::Momo,
    PaymentMethod::Stripe,
];

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Order>> {
        let order: Option<Order> = self.base.db().select(id.clone()).await?;
        Ok(order)
    }

    pub async fn create(
        &self,
        payment_method: PaymentMethod,
        items: Vec<OrderItem>,
    ) -> RepoResult<Order> {
        let now = now_millis();
        let order = Order {
            id: None,
            order_number: format!("ORD-{}", &Uuid::new_v4().simple().to_string()[..12]),
            status: OrderStatus::Pending,
            payment_method,
            items,
            stock_released: false,
            version: 0,
            created_at: now,
            updated_at: now,
        };

        let created: Option<Order> = self.base.db().create(ORDER_TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Compare-and-swap status update
    ///
    /// The write only lands if the order still has `expected` status and
    /// `version`; otherwise the order changed underneath the caller and a
    /// `Conflict` is returned with the current state untouched.
    pub async fn update_status_cas(
        &self,
        id: &RecordId,
        expected: OrderStatus,
        version: i64,
        target: OrderStatus,
    ) -> RepoResult<Order> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $id SET status = $target, version += 1, updated_at = $now \
                 WHERE status = $expected AND version = $version RETURN AFTER",
            )
            .bind(("id", id.clone()))
            .bind(("target", target))
            .bind(("expected", expected))
            .bind(("version", version))
            .bind(("now", now_millis()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        orders.into_iter().next().ok_or_else(|| {
            RepoError::Conflict(format!(
                "order {id} changed concurrently (expected status {expected})"
            ))
        })
    }

    /// Flip the `stock_released` flag, returning whether this call won
    ///
    /// Atomic conditional update: exactly one caller ever sees `true`, which
    /// makes release idempotent at the coordinator level.
    pub async fn mark_stock_released(&self, id: &RecordId) -> RepoResult<bool> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $id SET stock_released = true, version += 1, updated_at = $now \
                 WHERE stock_released = false RETURN AFTER",
            )
            .bind(("id", id.clone()))
            .bind(("now", now_millis()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(!orders.is_empty())
    }

    /// Pending orders whose payment window has lapsed
    ///
    /// QR / e-wallet orders time out after the short cutoff, COD after the
    /// long one. Already-cancelled orders are simply never matched, so the
    /// sweep can re-run safely.
    pub async fn find_timed_out_pending(
        &self,
        instant_cutoff: i64,
        cod_cutoff: i64,
    ) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                "SELECT * FROM order WHERE status = 'pending' AND ( \
                    (payment_method IN $instant_methods AND created_at < $instant_cutoff) OR \
                    (payment_method = 'cod' AND created_at < $cod_cutoff) \
                 ) ORDER BY created_at",
            )
            .bind(("instant_methods", INSTANT_METHODS))
            .bind(("instant_cutoff", instant_cutoff))
            .bind(("cod_cutoff", cod_cutoff))
            .await?
            .take(0)?;
        Ok(orders)
    }
}
