//! Inventory API module
//!
//! | Path | Method | Permission |
//! |------|--------|------------|
//! | /api/inventory/adjust | POST | products:manage |
//! | /api/inventory/movements | GET | authenticated |
//! | /api/inventory/overview | GET | authenticated |
//! | /api/inventory/low-stock | GET | authenticated |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/inventory", inventory_routes())
}

fn inventory_routes() -> Router<ServerState> {
    Router::new()
        .route("/adjust", post(handler::adjust))
        .route("/movements", get(handler::movements))
        .route("/overview", get(handler::overview))
        .route("/low-stock", get(handler::low_stock))
}
