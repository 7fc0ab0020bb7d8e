//! HTTP handlers for batch endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::batch::{Batch, BatchHistoryEntry, BatchService, CreateBatchInput};
use crate::AppState;

/// Create a batch for a product
pub async fn create_batch(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateBatchInput>,
) -> AppResult<Json<Batch>> {
    let service = BatchService::new(state.db);
    let batch = service.create(current_user.0.user_id, input).await?;
    Ok(Json(batch))
}

/// Get one batch
pub async fn get_batch(
    State(state): State<AppState>,
    Path(batch_id): Path<Uuid>,
) -> AppResult<Json<Batch>> {
    let service = BatchService::new(state.db);
    let batch = service.get(batch_id).await?;
    Ok(Json(batch))
}

/// Batches of a product
pub async fn list_product_batches(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Vec<Batch>>> {
    let service = BatchService::new(state.db);
    let batches = service.list_for_product(product_id).await?;
    Ok(Json(batches))
}

/// Deactivate a batch
pub async fn deactivate_batch(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(batch_id): Path<Uuid>,
) -> AppResult<Json<Batch>> {
    let service = BatchService::new(state.db);
    let batch = service.deactivate(current_user.0.user_id, batch_id).await?;
    Ok(Json(batch))
}

/// History of a batch
pub async fn get_batch_history(
    State(state): State<AppState>,
    Path(batch_id): Path<Uuid>,
) -> AppResult<Json<Vec<BatchHistoryEntry>>> {
    let service = BatchService::new(state.db);
    let history = service.history(batch_id).await?;
    Ok(Json(history))
}
