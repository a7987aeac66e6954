//! Order history repository
//!
//! Append-only: entries are created and read, never updated or deleted.

use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{OrderHistoryCreate, OrderHistoryEntry};
use crate::utils::now_millis;

const HISTORY_TABLE: &str = "order_history";

#[derive(Clone)]
pub struct OrderHistoryRepository {
    base: BaseRepository,
}

impl OrderHistoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn append(&self, data: OrderHistoryCreate) -> RepoResult<OrderHistoryEntry> {
        let entry = OrderHistoryEntry {
            id: None,
            order: data.order,
            action: data.action,
            description: data.description,
            actor_type: data.actor_type,
            actor_name: data.actor_name,
            metadata: data.metadata,
            created_at: now_millis(),
        };

        let created: Option<OrderHistoryEntry> = self
            .base
            .db()
            .create(HISTORY_TABLE)
            .content(entry)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to append history entry".to_string()))
    }

    /// Entries for an order, oldest first
    pub async fn find_by_order(&self, order: &RecordId) -> RepoResult<Vec<OrderHistoryEntry>> {
        let entries: Vec<OrderHistoryEntry> = self
            .base
            .db()
            .query("SELECT * FROM order_history WHERE order = $order ORDER BY created_at")
            .bind(("order", order.clone()))
            .await?
            .take(0)?;
        Ok(entries)
    }
}
