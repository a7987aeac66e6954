//! Order API handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::auth::{CurrentUser, permissions::PERM_ORDERS_MANAGE};
use crate::core::ServerState;
use crate::db::models::OrderHistoryEntry;
use crate::orders::SweepResult;
use crate::utils::AppResult;
use shared::{BatchResult, OrderStatus};

/// POST /api/orders/bulk-approve - pending orders to confirmed
#[derive(Debug, Deserialize)]
pub struct BulkApproveRequest {
    pub order_ids: Vec<String>,
}

pub async fn bulk_approve(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(body): Json<BulkApproveRequest>,
) -> AppResult<Json<BatchResult>> {
    user.require(PERM_ORDERS_MANAGE)?;

    let result = state
        .order_lifecycle()
        .bulk_approve(&body.order_ids, &user.username)
        .await?;
    Ok(Json(result))
}

/// POST /api/orders/bulk-status - move orders to a target status
#[derive(Debug, Deserialize)]
pub struct BulkStatusRequest {
    pub order_ids: Vec<String>,
    pub status: OrderStatus,
}

pub async fn bulk_update_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(body): Json<BulkStatusRequest>,
) -> AppResult<Json<BatchResult>> {
    user.require(PERM_ORDERS_MANAGE)?;

    let result = state
        .order_lifecycle()
        .bulk_update_status(&body.order_ids, body.status, &user.username)
        .await?;
    Ok(Json(result))
}

/// POST /api/orders/auto-cancel - run the payment timeout sweep now
pub async fn auto_cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<SweepResult>> {
    user.require(PERM_ORDERS_MANAGE)?;

    let sweep = state.order_lifecycle().auto_cancel_timed_out().await?;
    Ok(Json(sweep))
}

/// GET /api/orders/:id/history - audit trail, oldest first
pub async fn history(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<OrderHistoryEntry>>> {
    let entries = state.order_lifecycle().order_history(&id).await?;
    Ok(Json(entries))
}

/// GET /api/orders/:id/transitions - statuses this order may move to
#[derive(Debug, Serialize)]
pub struct TransitionsResponse {
    pub current: OrderStatus,
    pub transitions: &'static [OrderStatus],
}

pub async fn transitions(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<TransitionsResponse>> {
    let order = state.order_lifecycle().find_order(&id).await?;
    Ok(Json(TransitionsResponse {
        current: order.status,
        transitions: order.status.valid_next_statuses(),
    }))
}
