//! API routes
//!
//! # Structure
//!
//! - [`health`] - health check
//! - [`inventory`] - stock adjustment, movement ledger, overview, low-stock
//! - [`orders`] - bulk status operations, timeout sweep, history
//!
//! All routes except `/health` require a valid bearer token; write routes
//! additionally require a permission (`products:manage` for inventory,
//! `orders:manage` for order operations).

pub mod health;
pub mod inventory;
pub mod orders;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(inventory::router())
        .merge(orders::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
