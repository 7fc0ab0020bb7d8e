//! HTTP handlers for kit endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::kit::{CreateKitInput, Kit, KitService, KitWithAvailability};
use crate::AppState;

/// Create a kit
pub async fn create_kit(
    State(state): State<AppState>,
    Json(input): Json<CreateKitInput>,
) -> AppResult<Json<Kit>> {
    let service = KitService::new(state.db);
    let kit = service.create(input).await?;
    Ok(Json(kit))
}

/// List kits with availability
pub async fn list_kits(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<KitWithAvailability>>> {
    let service = KitService::new(state.db);
    let kits = service.list().await?;
    Ok(Json(kits))
}

/// Get one kit with availability
pub async fn get_kit(
    State(state): State<AppState>,
    Path(kit_id): Path<Uuid>,
) -> AppResult<Json<KitWithAvailability>> {
    let service = KitService::new(state.db);
    let kit = service.get(kit_id).await?;
    Ok(Json(kit))
}
