//! HTTP handlers for authentication endpoints

use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::auth::{AuthService, LoginInput, LoginResponse};
use crate::AppState;

/// Log in with username and password
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> AppResult<Json<LoginResponse>> {
    let service = AuthService::new(state.db, state.config.jwt.clone());
    let response = service.login(input).await?;
    Ok(Json(response))
}

/// Current authenticated user
pub async fn me(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<MeResponse>> {
    let service = AuthService::new(state.db, state.config.jwt.clone());
    let user = service.get_user(current_user.0.user_id).await?;
    Ok(Json(MeResponse {
        user_id: user.id,
        username: user.username,
        email: user.email,
        role: user.role,
    }))
}

/// Profile of the authenticated user
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user_id: uuid::Uuid,
    pub username: String,
    pub email: Option<String>,
    pub role: String,
}
