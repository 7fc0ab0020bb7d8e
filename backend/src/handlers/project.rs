//! HTTP handlers for project endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::project::{
    AssignMaterialInput, CreateProjectInput, Project, ProjectMaterial, ProjectService,
};
use crate::AppState;

/// Create a project
pub async fn create_project(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(input): Json<CreateProjectInput>,
) -> AppResult<Json<Project>> {
    let service = ProjectService::new(state.db);
    let project = service.create(input).await?;
    Ok(Json(project))
}

/// List projects
pub async fn list_projects(State(state): State<AppState>) -> AppResult<Json<Vec<Project>>> {
    let service = ProjectService::new(state.db);
    let projects = service.list().await?;
    Ok(Json(projects))
}

/// Get one project
pub async fn get_project(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> AppResult<Json<Project>> {
    let service = ProjectService::new(state.db);
    let project = service.get(project_id).await?;
    Ok(Json(project))
}

/// Assign material to a project, consuming stock
pub async fn assign_material(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(project_id): Path<Uuid>,
    Json(input): Json<AssignMaterialInput>,
) -> AppResult<Json<ProjectMaterial>> {
    let service = ProjectService::new(state.db);
    let material = service
        .assign_material(current_user.0.user_id, project_id, input)
        .await?;
    Ok(Json(material))
}

/// Materials consumed by a project
pub async fn list_project_materials(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> AppResult<Json<Vec<ProjectMaterial>>> {
    let service = ProjectService::new(state.db);
    let materials = service.materials(project_id).await?;
    Ok(Json(materials))
}

/// Close a project
pub async fn close_project(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(project_id): Path<Uuid>,
) -> AppResult<Json<Project>> {
    let service = ProjectService::new(state.db);
    let project = service.close(project_id).await?;
    Ok(Json(project))
}
