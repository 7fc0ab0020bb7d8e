//! Batch (lot) management service
//!
//! Batches are dated sub-quantities of a product, tracked separately for
//! expiry and traceability. They are never hard-deleted; deactivation takes
//! a batch out of the active set. Quantity mutations go through the
//! movement recorder, which keeps the product aggregate and the batch
//! history consistent in one transaction.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::BatchChangeType;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Batch service for lot lifecycle management
#[derive(Clone)]
pub struct BatchService {
    db: PgPool,
}

/// A product batch
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Batch {
    pub id: Uuid,
    pub product_id: Uuid,
    pub batch_number: String,
    pub expiry_date: Option<NaiveDate>,
    pub initial_quantity: i32,
    pub current_quantity: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Append-only batch history entry
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BatchHistoryEntry {
    pub id: Uuid,
    pub batch_id: Uuid,
    pub change_type: String,
    pub quantity_before: i32,
    pub quantity_after: i32,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a batch
#[derive(Debug, Deserialize)]
pub struct CreateBatchInput {
    pub product_id: Uuid,
    pub batch_number: String,
    pub expiry_date: Option<NaiveDate>,
    pub initial_quantity: i32,
}

const BATCH_COLUMNS: &str = "id, product_id, batch_number, expiry_date, initial_quantity, \
     current_quantity, is_active, created_at";

const HISTORY_COLUMNS: &str =
    "id, batch_id, change_type, quantity_before, quantity_after, notes, created_by, created_at";

impl BatchService {
    /// Create a new BatchService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a batch for a product.
    ///
    /// The batch opens with its full initial quantity; the product aggregate
    /// is resummed from active batches in the same transaction, since
    /// batches are the source of truth once they exist.
    pub async fn create(&self, actor_id: Uuid, input: CreateBatchInput) -> AppResult<Batch> {
        if input.batch_number.trim().is_empty() {
            return Err(AppError::Validation {
                field: "batch_number".to_string(),
                message: "Batch number cannot be empty".to_string(),
                message_es: "El número de lote no puede estar vacío".to_string(),
            });
        }

        shared::validate_batch_quantities(input.initial_quantity, input.initial_quantity)
            .map_err(|msg| AppError::Validation {
                field: "initial_quantity".to_string(),
                message: msg.to_string(),
                message_es: "Cantidad inicial inválida".to_string(),
            })?;

        let duplicate = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM batches WHERE batch_number = $1)",
        )
        .bind(input.batch_number.trim())
        .fetch_one(&self.db)
        .await?;

        if duplicate {
            return Err(AppError::DuplicateEntry("batch_number".to_string()));
        }

        let mut tx = self.db.begin().await?;

        let product_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)",
        )
        .bind(input.product_id)
        .fetch_one(&mut *tx)
        .await?;

        if !product_exists {
            return Err(AppError::NotFound("Product".to_string()));
        }

        let batch = sqlx::query_as::<_, Batch>(&format!(
            r#"
            INSERT INTO batches (product_id, batch_number, expiry_date,
                                 initial_quantity, current_quantity)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING {BATCH_COLUMNS}
            "#,
        ))
        .bind(input.product_id)
        .bind(input.batch_number.trim())
        .bind(input.expiry_date)
        .bind(input.initial_quantity)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO batch_history (batch_id, change_type, quantity_before,
                                       quantity_after, notes, created_by)
            VALUES ($1, $2, 0, $3, $4, $5)
            "#,
        )
        .bind(batch.id)
        .bind(BatchChangeType::Created.as_str())
        .bind(input.initial_quantity)
        .bind(format!("Batch {} created", batch.batch_number))
        .bind(actor_id)
        .execute(&mut *tx)
        .await?;

        resync_product_stock(&mut tx, input.product_id).await?;

        tx.commit().await?;

        Ok(batch)
    }

    /// Get a batch by id
    pub async fn get(&self, batch_id: Uuid) -> AppResult<Batch> {
        let batch = sqlx::query_as::<_, Batch>(&format!(
            "SELECT {BATCH_COLUMNS} FROM batches WHERE id = $1",
        ))
        .bind(batch_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Batch".to_string()))?;

        Ok(batch)
    }

    /// List batches of a product, active first, oldest expiry first
    pub async fn list_for_product(&self, product_id: Uuid) -> AppResult<Vec<Batch>> {
        let batches = sqlx::query_as::<_, Batch>(&format!(
            r#"
            SELECT {BATCH_COLUMNS}
            FROM batches
            WHERE product_id = $1
            ORDER BY is_active DESC, expiry_date NULLS LAST, created_at
            "#,
        ))
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        Ok(batches)
    }

    /// Deactivate a batch, removing it from the active set. The product
    /// aggregate is resummed from the remaining active batches.
    pub async fn deactivate(&self, actor_id: Uuid, batch_id: Uuid) -> AppResult<Batch> {
        let mut tx = self.db.begin().await?;

        let batch = sqlx::query_as::<_, Batch>(&format!(
            "SELECT {BATCH_COLUMNS} FROM batches WHERE id = $1 FOR UPDATE",
        ))
        .bind(batch_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Batch".to_string()))?;

        if !batch.is_active {
            return Err(AppError::Conflict {
                resource: "batch".to_string(),
                message: "Batch is already inactive".to_string(),
                message_es: "El lote ya está inactivo".to_string(),
            });
        }

        let batch = sqlx::query_as::<_, Batch>(&format!(
            r#"
            UPDATE batches SET is_active = false WHERE id = $1
            RETURNING {BATCH_COLUMNS}
            "#,
        ))
        .bind(batch_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO batch_history (batch_id, change_type, quantity_before,
                                       quantity_after, notes, created_by)
            VALUES ($1, $2, $3, $3, $4, $5)
            "#,
        )
        .bind(batch.id)
        .bind(BatchChangeType::Deactivated.as_str())
        .bind(batch.current_quantity)
        .bind(format!("Batch {} deactivated", batch.batch_number))
        .bind(actor_id)
        .execute(&mut *tx)
        .await?;

        resync_product_stock(&mut tx, batch.product_id).await?;

        tx.commit().await?;

        Ok(batch)
    }

    /// History entries for a batch, most recent first
    pub async fn history(&self, batch_id: Uuid) -> AppResult<Vec<BatchHistoryEntry>> {
        let batch_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM batches WHERE id = $1)",
        )
        .bind(batch_id)
        .fetch_one(&self.db)
        .await?;

        if !batch_exists {
            return Err(AppError::NotFound("Batch".to_string()));
        }

        let entries = sqlx::query_as::<_, BatchHistoryEntry>(&format!(
            r#"
            SELECT {HISTORY_COLUMNS}
            FROM batch_history
            WHERE batch_id = $1
            ORDER BY created_at DESC
            "#,
        ))
        .bind(batch_id)
        .fetch_all(&self.db)
        .await?;

        Ok(entries)
    }
}

/// Recompute a product's aggregate stock as the sum of its active batches.
/// Must run inside the transaction that mutated the batch set.
pub(crate) async fn resync_product_stock(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    product_id: Uuid,
) -> AppResult<i32> {
    let total = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COALESCE(SUM(current_quantity), 0)
        FROM batches
        WHERE product_id = $1 AND is_active = true
        "#,
    )
    .bind(product_id)
    .fetch_one(&mut **tx)
    .await?;

    let total = total.max(0) as i32;

    sqlx::query("UPDATE products SET current_stock = $1, updated_at = NOW() WHERE id = $2")
        .bind(total)
        .bind(product_id)
        .execute(&mut **tx)
        .await?;

    Ok(total)
}
