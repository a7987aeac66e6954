//! Store Server - storefront inventory and order lifecycle service
//!
//! Backend for a small e-commerce storefront (teddy-bear shop). The heart of
//! the service is the inventory ledger and the order status state machine:
//!
//! - **inventory**: atomic stock adjustment with an append-only audit ledger,
//!   plus derived views (overview, low-stock report)
//! - **orders**: order status transitions, bulk operations and the
//!   auto-cancel sweep for timed-out pending orders
//! - **db**: embedded SurrealDB storage and the repository layer
//! - **api**: HTTP routes and handlers
//! - **auth**: JWT validation and permission checks
//!
//! # Module structure
//!
//! ```text
//! store-server/src/
//! ├── core/          # config, state, server
//! ├── auth/          # JWT validation, permissions
//! ├── api/           # HTTP routes and handlers
//! ├── utils/         # errors, logging, validation
//! ├── db/            # database layer (models + repositories)
//! ├── inventory/     # stock ledger and aggregated views
//! └── orders/        # order lifecycle coordination
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod inventory;
pub mod orders;
pub mod utils;

// Re-export the public surface
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use inventory::{InventoryOverview, StockEvent, StockLedger};
pub use orders::OrderLifecycle;
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
