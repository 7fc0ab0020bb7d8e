//! HTTP handlers for audit lock endpoints
//!
//! Blocking and unblocking products is restricted to staff.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::audit::{AuditLock, AuditService, BlockProductInput};
use crate::AppState;

/// Block a product for audit
pub async fn block_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<BlockProductInput>,
) -> AppResult<Json<AuditLock>> {
    if !current_user.0.is_staff() {
        return Err(AppError::InsufficientPermissions);
    }

    let service = AuditService::new(state.db);
    let lock = service.block(current_user.0.user_id, input).await?;
    Ok(Json(lock))
}

/// Finalize an audit lock
pub async fn unblock_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(lock_id): Path<Uuid>,
) -> AppResult<Json<AuditLock>> {
    if !current_user.0.is_staff() {
        return Err(AppError::InsufficientPermissions);
    }

    let service = AuditService::new(state.db);
    let lock = service.unblock(lock_id).await?;
    Ok(Json(lock))
}

/// List all audit locks
pub async fn list_audit_locks(State(state): State<AppState>) -> AppResult<Json<Vec<AuditLock>>> {
    let service = AuditService::new(state.db);
    let locks = service.list().await?;
    Ok(Json(locks))
}

/// Active lock for a product, if any
pub async fn get_active_lock(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Option<AuditLock>>> {
    let service = AuditService::new(state.db);
    let lock = service.active_lock(product_id).await?;
    Ok(Json(lock))
}
