use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::inventory::events::{StockEventSender, stock_event_channel};
use crate::inventory::{InventoryOverview, StockLedger};
use crate::orders::OrderLifecycle;
use crate::utils::AppResult;

/// Shared server state
///
/// Holds the handles every request needs: configuration, the embedded
/// database, the JWT service and the stock event channel. Cloning is cheap;
/// the domain services are constructed on demand from these handles.
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub jwt_service: Arc<JwtService>,
    pub stock_events: StockEventSender,
}

impl ServerState {
    /// Open the on-disk database and assemble the state
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let db_service = DbService::new(&config.db_path()).await?;
        Ok(Self::from_parts(config.clone(), db_service))
    }

    /// State backed by an in-memory database (tests, local tooling)
    pub async fn in_memory(config: Config) -> AppResult<Self> {
        let db_service = DbService::memory().await?;
        Ok(Self::from_parts(config, db_service))
    }

    fn from_parts(config: Config, db_service: DbService) -> Self {
        let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));
        let (stock_events, _) = stock_event_channel();
        Self {
            config,
            db: db_service.db,
            jwt_service,
            stock_events,
        }
    }

    pub fn stock_ledger(&self) -> StockLedger {
        StockLedger::new(self.db.clone(), self.stock_events.clone())
    }

    pub fn inventory_overview(&self) -> InventoryOverview {
        InventoryOverview::new(self.db.clone(), self.config.low_stock_threshold)
    }

    pub fn order_lifecycle(&self) -> OrderLifecycle {
        OrderLifecycle::new(
            self.db.clone(),
            self.stock_events.clone(),
            self.config.instant_timeout_ms(),
            self.config.cod_timeout_ms(),
        )
    }
}
