//! Kit service
//!
//! Kits are named bundles of products in fixed quantities. They hold no
//! stock of their own; availability is derived on read as the minimum over
//! floor(component stock / quantity per kit).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::kit_availability;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Kit service
#[derive(Clone)]
pub struct KitService {
    db: PgPool,
}

/// A kit definition
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Kit {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One component of a kit
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct KitItem {
    pub id: Uuid,
    pub kit_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
}

/// A kit with its components and derived availability
#[derive(Debug, Serialize)]
pub struct KitWithAvailability {
    #[serde(flatten)]
    pub kit: Kit,
    pub items: Vec<KitItem>,
    pub available: i32,
}

/// Input for creating a kit
#[derive(Debug, Deserialize)]
pub struct CreateKitInput {
    pub name: String,
    pub description: Option<String>,
    pub items: Vec<KitItemInput>,
}

#[derive(Debug, Deserialize)]
pub struct KitItemInput {
    pub product_id: Uuid,
    pub quantity: i32,
}

const KIT_COLUMNS: &str = "id, name, description, created_at";
const ITEM_COLUMNS: &str = "id, kit_id, product_id, quantity";

impl KitService {
    /// Create a new KitService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a kit with its components
    pub async fn create(&self, input: CreateKitInput) -> AppResult<Kit> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Kit name cannot be empty".to_string(),
                message_es: "El nombre del kit no puede estar vacío".to_string(),
            });
        }

        if input.items.is_empty() {
            return Err(AppError::Validation {
                field: "items".to_string(),
                message: "A kit needs at least one component".to_string(),
                message_es: "Un kit necesita al menos un componente".to_string(),
            });
        }

        for item in &input.items {
            shared::validate_movement_quantity(item.quantity).map_err(|msg| {
                AppError::Validation {
                    field: "items".to_string(),
                    message: msg.to_string(),
                    message_es: "La cantidad por kit debe ser positiva".to_string(),
                }
            })?;
        }

        let duplicate = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM kits WHERE name = $1)",
        )
        .bind(input.name.trim())
        .fetch_one(&self.db)
        .await?;

        if duplicate {
            return Err(AppError::DuplicateEntry("name".to_string()));
        }

        let mut tx = self.db.begin().await?;

        let kit = sqlx::query_as::<_, Kit>(&format!(
            r#"
            INSERT INTO kits (name, description)
            VALUES ($1, $2)
            RETURNING {KIT_COLUMNS}
            "#,
        ))
        .bind(input.name.trim())
        .bind(&input.description)
        .fetch_one(&mut *tx)
        .await?;

        for item in &input.items {
            let product_exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)",
            )
            .bind(item.product_id)
            .fetch_one(&mut *tx)
            .await?;

            if !product_exists {
                return Err(AppError::NotFound("Product".to_string()));
            }

            sqlx::query("INSERT INTO kit_items (kit_id, product_id, quantity) VALUES ($1, $2, $3)")
                .bind(kit.id)
                .bind(item.product_id)
                .bind(item.quantity)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(kit)
    }

    /// Get a kit with components and derived availability
    pub async fn get(&self, kit_id: Uuid) -> AppResult<KitWithAvailability> {
        let kit = sqlx::query_as::<_, Kit>(&format!(
            "SELECT {KIT_COLUMNS} FROM kits WHERE id = $1",
        ))
        .bind(kit_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Kit".to_string()))?;

        self.with_availability(kit).await
    }

    /// List kits with derived availability
    pub async fn list(&self) -> AppResult<Vec<KitWithAvailability>> {
        let kits = sqlx::query_as::<_, Kit>(&format!(
            "SELECT {KIT_COLUMNS} FROM kits ORDER BY name",
        ))
        .fetch_all(&self.db)
        .await?;

        let mut out = Vec::with_capacity(kits.len());
        for kit in kits {
            out.push(self.with_availability(kit).await?);
        }

        Ok(out)
    }

    async fn with_availability(&self, kit: Kit) -> AppResult<KitWithAvailability> {
        let items = sqlx::query_as::<_, KitItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM kit_items WHERE kit_id = $1",
        ))
        .bind(kit.id)
        .fetch_all(&self.db)
        .await?;

        let components = sqlx::query_as::<_, (i32, i32)>(
            r#"
            SELECT p.current_stock, ki.quantity
            FROM kit_items ki
            JOIN products p ON p.id = ki.product_id
            WHERE ki.kit_id = $1
            "#,
        )
        .bind(kit.id)
        .fetch_all(&self.db)
        .await?;

        let available = kit_availability(&components);

        Ok(KitWithAvailability {
            kit,
            items,
            available,
        })
    }
}
