//! Inventory domain
//!
//! - **ledger**: the single guarded write path for stock counters, with the
//!   append-only movement audit trail
//! - **overview**: derived read views (current stock, low-stock report)
//! - **events**: cache-invalidation broadcast after successful adjustments

pub mod events;
pub mod ledger;
pub mod overview;

pub use events::{StockEvent, StockEventSender, stock_event_channel};
pub use ledger::{MovementQuery, StockAdjusted, StockAdjustment, StockLedger};
pub use overview::{InventoryOverview, InventoryRow, LowStockItem, Severity, StockStatus};
