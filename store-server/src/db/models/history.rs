//! Order history model
//!
//! Append-only audit trail: one entry per state transition or stock action,
//! never mutated or deleted.

use serde::{Deserialize, Serialize};
use shared::ActorType;
use surrealdb::RecordId;

/// One audit trail entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderHistoryEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub order: RecordId,
    /// Machine-readable action, e.g. "status_changed", "stock_released"
    pub action: String,
    pub description: String,
    pub actor_type: ActorType,
    pub actor_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    pub created_at: i64,
}

/// Payload for appending a history entry
#[derive(Debug, Clone)]
pub struct OrderHistoryCreate {
    pub order: RecordId,
    pub action: String,
    pub description: String,
    pub actor_type: ActorType,
    pub actor_name: String,
    pub metadata: Option<serde_json::Value>,
}
