//! Stock change notifications
//!
//! Successful adjustments broadcast the affected product id so downstream
//! caches can drop stale reads. Consumers subscribe via the channel held on
//! the server state; a lagging or absent consumer never blocks the writer.

use tokio::sync::broadcast;

/// Broadcast payload emitted after a stock mutation commits
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockEvent {
    /// Cached reads for this product are stale
    Invalidate { product_id: String },
}

pub type StockEventSender = broadcast::Sender<StockEvent>;

/// Channel capacity: invalidations are tiny and consumers only need the
/// latest view, so a modest buffer is enough
const CHANNEL_CAPACITY: usize = 256;

pub fn stock_event_channel() -> (StockEventSender, broadcast::Receiver<StockEvent>) {
    broadcast::channel(CHANNEL_CAPACITY)
}
