//! Inventory movement model
//!
//! Append-only ledger entry. Rows are never updated or deleted; the sum of
//! `direction * quantity` over stock-affecting types reconstructs the
//! on-hand counter for a product/variant.

use serde::{Deserialize, Serialize};
use shared::{MovementType, ReferenceType};
use surrealdb::RecordId;

/// One stock-affecting event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryMovement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub product: RecordId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variation: Option<RecordId>,
    /// SKU snapshot of the adjusted target, for ledger filtering
    pub sku: String,
    /// +1 increase, -1 decrease
    pub direction: i64,
    /// Absolute quantity moved, always > 0
    pub quantity: i64,
    pub movement_type: MovementType,
    pub reference_type: ReferenceType,
    /// The order (or other record) that drove this movement
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<RecordId>,
    pub reason: String,
    /// User id of the caller (trusted from the auth collaborator)
    pub adjusted_by: String,
    /// Display name snapshot for the audit trail
    pub actor_label: String,
    pub created_at: i64,
}

impl InventoryMovement {
    /// Signed contribution of this movement to the on-hand counter
    pub fn stock_delta(&self) -> i64 {
        if self.movement_type.affects_stock() {
            self.direction * self.quantity
        } else {
            0
        }
    }
}
