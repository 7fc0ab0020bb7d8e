//! HTTP handlers for system settings endpoints
//!
//! Updates are restricted to staff.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::settings::{Setting, SettingsService, UpdateSettingInput};
use crate::AppState;

/// List all settings
pub async fn list_settings(State(state): State<AppState>) -> AppResult<Json<Vec<Setting>>> {
    let service = SettingsService::new(state.db);
    let settings = service.list().await?;
    Ok(Json(settings))
}

/// Get one setting by key
pub async fn get_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> AppResult<Json<Setting>> {
    let service = SettingsService::new(state.db);
    let setting = service.get(&key).await?;
    Ok(Json(setting))
}

/// Update a setting
pub async fn update_setting(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<UpdateSettingInput>,
) -> AppResult<Json<Setting>> {
    if !current_user.0.is_staff() {
        return Err(AppError::InsufficientPermissions);
    }

    let service = SettingsService::new(state.db);
    let setting = service.update(input).await?;
    Ok(Json(setting))
}
