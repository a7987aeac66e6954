//! Inventory API handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::auth::{CurrentUser, permissions::PERM_PRODUCTS_MANAGE};
use crate::core::ServerState;
use crate::db::models::InventoryMovement;
use crate::inventory::ledger::{MovementQuery, StockAdjusted, StockAdjustment};
use crate::inventory::overview::{
    InventoryRow, LowStockItem, OverviewQuery, SortBy, SortOrder, StockStatusFilter,
};
use crate::utils::{AppResult, Paginated};
use shared::{MovementType, ReferenceType};

/// POST /api/inventory/adjust - manual stock adjustment
#[derive(Debug, Deserialize)]
pub struct AdjustStockRequest {
    pub product_id: String,
    pub variation_id: Option<String>,
    /// Signed, non-zero
    pub quantity: i64,
    pub movement_type: MovementType,
    pub reason: String,
    pub reference_id: Option<String>,
}

pub async fn adjust(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(body): Json<AdjustStockRequest>,
) -> AppResult<Json<StockAdjusted>> {
    user.require(PERM_PRODUCTS_MANAGE)?;

    let outcome = state
        .stock_ledger()
        .adjust_stock(
            StockAdjustment {
                product_id: body.product_id,
                variation_id: body.variation_id,
                quantity: body.quantity,
                movement_type: body.movement_type,
                reason: body.reason,
                reference_id: body.reference_id,
            },
            &user.id,
            &user.username,
        )
        .await?;
    Ok(Json(outcome))
}

/// GET /api/inventory/movements - ledger listing, newest first
#[derive(Debug, Default, Deserialize)]
pub struct MovementListParams {
    pub product_id: Option<String>,
    pub variation_id: Option<String>,
    pub sku: Option<String>,
    pub movement_type: Option<MovementType>,
    pub reference_type: Option<ReferenceType>,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

pub async fn movements(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Query(params): Query<MovementListParams>,
) -> AppResult<Json<Paginated<InventoryMovement>>> {
    let page = state
        .stock_ledger()
        .get_movements(MovementQuery {
            product_id: params.product_id,
            variation_id: params.variation_id,
            sku: params.sku,
            movement_type: params.movement_type,
            reference_type: params.reference_type,
            start_date: params.start_date,
            end_date: params.end_date,
            page: params.page,
            per_page: params.per_page,
        })
        .await?;
    Ok(Json(page))
}

/// GET /api/inventory/overview - current stock per sellable unit
#[derive(Debug, Default, Deserialize)]
pub struct OverviewParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub search: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub stock_status: StockStatusFilter,
    #[serde(default)]
    pub sort_by: SortBy,
    #[serde(default)]
    pub sort_order: SortOrder,
}

pub async fn overview(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Query(params): Query<OverviewParams>,
) -> AppResult<Json<Paginated<InventoryRow>>> {
    let page = state
        .inventory_overview()
        .get_inventory_overview(OverviewQuery {
            page: params.page,
            per_page: params.per_page,
            search: params.search,
            category: params.category,
            stock_status: params.stock_status,
            sort_by: params.sort_by,
            sort_order: params.sort_order,
        })
        .await?;
    Ok(Json(page))
}

/// GET /api/inventory/low-stock - items at or below their threshold
#[derive(Debug, Default, Deserialize)]
pub struct LowStockParams {
    pub category: Option<String>,
    #[serde(default)]
    pub include_out_of_stock: bool,
}

pub async fn low_stock(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Query(params): Query<LowStockParams>,
) -> AppResult<Json<Vec<LowStockItem>>> {
    let items = state
        .inventory_overview()
        .get_low_stock_items(params.category, params.include_out_of_stock)
        .await?;
    Ok(Json(items))
}
