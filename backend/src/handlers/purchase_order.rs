//! HTTP handlers for purchase order endpoints
//!
//! State transitions are restricted to staff.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use shared::OrderStatus;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::purchase_order::{
    AddItemInput, CreateOrderInput, PurchaseOrder, PurchaseOrderDetails, PurchaseOrderItem,
    PurchaseOrderService,
};
use crate::AppState;

/// Request body for a status transition
#[derive(Debug, Deserialize)]
pub struct TransitionInput {
    pub status: OrderStatus,
}

/// Create a purchase order manually
pub async fn create_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateOrderInput>,
) -> AppResult<Json<PurchaseOrder>> {
    let service = PurchaseOrderService::new(state.db);
    let order = service.create(current_user.0.user_id, input).await?;
    Ok(Json(order))
}

/// List purchase orders
pub async fn list_orders(State(state): State<AppState>) -> AppResult<Json<Vec<PurchaseOrder>>> {
    let service = PurchaseOrderService::new(state.db);
    let orders = service.list().await?;
    Ok(Json(orders))
}

/// Get an order with items and log
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<PurchaseOrderDetails>> {
    let service = PurchaseOrderService::new(state.db);
    let details = service.get_details(order_id).await?;
    Ok(Json(details))
}

/// Add a line item to an order
pub async fn add_order_item(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
    Json(input): Json<AddItemInput>,
) -> AppResult<Json<PurchaseOrderItem>> {
    let service = PurchaseOrderService::new(state.db);
    let item = service.add_item(order_id, input).await?;
    Ok(Json(item))
}

/// Advance an order to a new status
pub async fn transition_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
    Json(input): Json<TransitionInput>,
) -> AppResult<Json<PurchaseOrder>> {
    if !current_user.0.is_staff() {
        return Err(AppError::InsufficientPermissions);
    }

    let service = PurchaseOrderService::new(state.db);
    let order = service
        .transition(current_user.0.user_id, order_id, input.status)
        .await?;
    Ok(Json(order))
}

/// Generate suggested orders for all low-stock products
pub async fn generate_suggested_orders(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<serde_json::Value>> {
    if !current_user.0.is_staff() {
        return Err(AppError::InsufficientPermissions);
    }

    let service = PurchaseOrderService::new(state.db);
    let added = service.generate_suggested_orders().await?;
    Ok(Json(serde_json::json!({ "lines_added": added })))
}
