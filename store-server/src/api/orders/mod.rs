//! Order API module
//!
//! | Path | Method | Permission |
//! |------|--------|------------|
//! | /api/orders/bulk-approve | POST | orders:manage |
//! | /api/orders/bulk-status | POST | orders:manage |
//! | /api/orders/auto-cancel | POST | orders:manage |
//! | /api/orders/{id}/history | GET | authenticated |
//! | /api/orders/{id}/transitions | GET | authenticated |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", order_routes())
}

fn order_routes() -> Router<ServerState> {
    Router::new()
        .route("/bulk-approve", post(handler::bulk_approve))
        .route("/bulk-status", post(handler::bulk_update_status))
        .route("/auto-cancel", post(handler::auto_cancel))
        .route("/{id}/history", get(handler::history))
        .route("/{id}/transitions", get(handler::transitions))
}
