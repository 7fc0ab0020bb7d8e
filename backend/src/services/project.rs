//! Project material allocation service
//!
//! Projects consume inventory: assigning material to a project records an
//! exit movement through the movement recorder (so the audit gate, the
//! sufficiency check and the ledger all apply) and keeps a per-project
//! consumption record for cost tracking.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::MovementType;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::movement::{MovementService, RecordMovementInput};

/// Project service
#[derive(Clone)]
pub struct ProjectService {
    db: PgPool,
}

/// A project consuming inventory
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub estimated_end_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Material consumed by a project
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProjectMaterial {
    pub id: Uuid,
    pub project_id: Uuid,
    pub product_id: Uuid,
    pub movement_id: Uuid,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a project
#[derive(Debug, Deserialize)]
pub struct CreateProjectInput {
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub estimated_end_date: Option<NaiveDate>,
}

/// Input for assigning material to a project
#[derive(Debug, Deserialize)]
pub struct AssignMaterialInput {
    pub product_id: Uuid,
    pub batch_id: Option<Uuid>,
    pub quantity: i32,
}

const PROJECT_COLUMNS: &str =
    "id, name, description, start_date, estimated_end_date, is_active, created_at";
const MATERIAL_COLUMNS: &str = "id, project_id, product_id, movement_id, quantity, created_at";

impl ProjectService {
    /// Create a new ProjectService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a project
    pub async fn create(&self, input: CreateProjectInput) -> AppResult<Project> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Project name cannot be empty".to_string(),
                message_es: "El nombre del proyecto no puede estar vacío".to_string(),
            });
        }

        let start_date = input
            .start_date
            .unwrap_or_else(|| Utc::now().date_naive());

        let project = sqlx::query_as::<_, Project>(&format!(
            r#"
            INSERT INTO projects (name, description, start_date, estimated_end_date)
            VALUES ($1, $2, $3, $4)
            RETURNING {PROJECT_COLUMNS}
            "#,
        ))
        .bind(input.name.trim())
        .bind(&input.description)
        .bind(start_date)
        .bind(input.estimated_end_date)
        .fetch_one(&self.db)
        .await?;

        Ok(project)
    }

    /// Get a project by id
    pub async fn get(&self, project_id: Uuid) -> AppResult<Project> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1",
        ))
        .bind(project_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Project".to_string()))?;

        Ok(project)
    }

    /// List projects, active first
    pub async fn list(&self) -> AppResult<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY is_active DESC, name",
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(projects)
    }

    /// Assign material to a project.
    ///
    /// Records an exit movement for the quantity, then links the movement to
    /// the project. The exit enforces the audit gate and the sufficiency
    /// check; if it fails, nothing is consumed.
    pub async fn assign_material(
        &self,
        actor_id: Uuid,
        project_id: Uuid,
        input: AssignMaterialInput,
    ) -> AppResult<ProjectMaterial> {
        let project = self.get(project_id).await?;
        if !project.is_active {
            return Err(AppError::Conflict {
                resource: "project".to_string(),
                message: "Cannot assign material to an inactive project".to_string(),
                message_es: "No se puede asignar material a un proyecto inactivo".to_string(),
            });
        }

        let movements = MovementService::new(self.db.clone());
        let movement = movements
            .record(
                actor_id,
                RecordMovementInput {
                    product_id: input.product_id,
                    batch_id: input.batch_id,
                    movement_type: MovementType::Exit,
                    quantity: input.quantity,
                    notes: Some(format!("Assigned to project {}", project.name)),
                },
            )
            .await?;

        let material = sqlx::query_as::<_, ProjectMaterial>(&format!(
            r#"
            INSERT INTO project_materials (project_id, product_id, movement_id, quantity)
            VALUES ($1, $2, $3, $4)
            RETURNING {MATERIAL_COLUMNS}
            "#,
        ))
        .bind(project_id)
        .bind(input.product_id)
        .bind(movement.id)
        .bind(input.quantity)
        .fetch_one(&self.db)
        .await?;

        Ok(material)
    }

    /// Materials consumed by a project, most recent first
    pub async fn materials(&self, project_id: Uuid) -> AppResult<Vec<ProjectMaterial>> {
        self.get(project_id).await?;

        let materials = sqlx::query_as::<_, ProjectMaterial>(&format!(
            r#"
            SELECT {MATERIAL_COLUMNS}
            FROM project_materials
            WHERE project_id = $1
            ORDER BY created_at DESC
            "#,
        ))
        .bind(project_id)
        .fetch_all(&self.db)
        .await?;

        Ok(materials)
    }

    /// Close a project, stopping further material assignment
    pub async fn close(&self, project_id: Uuid) -> AppResult<Project> {
        let project = sqlx::query_as::<_, Project>(&format!(
            r#"
            UPDATE projects SET is_active = false WHERE id = $1
            RETURNING {PROJECT_COLUMNS}
            "#,
        ))
        .bind(project_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Project".to_string()))?;

        Ok(project)
    }
}
