//! HTTP handlers for price history endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::price::{PriceEntry, PriceService, RecordPriceInput};
use crate::AppState;

/// Record a new unit price for a product
pub async fn record_price(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<RecordPriceInput>,
) -> AppResult<Json<PriceEntry>> {
    let service = PriceService::new(state.db);
    let entry = service.record(current_user.0.user_id, input).await?;
    Ok(Json(entry))
}

/// Price history of a product
pub async fn get_price_history(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Vec<PriceEntry>>> {
    let service = PriceService::new(state.db);
    let entries = service.history(product_id).await?;
    Ok(Json(entries))
}

/// Current price of a product
pub async fn get_current_price(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Option<PriceEntry>>> {
    let service = PriceService::new(state.db);
    let entry = service.latest(product_id).await?;
    Ok(Json(entry))
}
