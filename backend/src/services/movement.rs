//! Movement recorder: the stock ledger core
//!
//! Records one inventory movement against a product and optionally a batch.
//! The whole reconciliation — movement insert, batch quantity update, batch
//! history append, product aggregate update — runs in a single transaction
//! with the product (and batch) rows locked, so concurrent movements against
//! the same rows serialize instead of losing updates. A failed step rolls
//! everything back; no partial ledger entry survives.
//!
//! Movements are not idempotent: resubmitting the same logical movement
//! creates a second ledger entry and applies its effect again. Duplicate
//! suppression belongs to the submitting UI.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{BatchChangeType, MovementType, PaginatedResponse, Pagination, PaginationMeta};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::audit::AuditService;
use crate::services::batch::resync_product_stock;

/// Movement recorder service
#[derive(Clone)]
pub struct MovementService {
    db: PgPool,
}

/// A recorded inventory movement. Immutable once created.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Movement {
    pub id: Uuid,
    pub product_id: Uuid,
    pub batch_id: Option<Uuid>,
    pub movement_type: String,
    pub quantity: i32,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a movement
#[derive(Debug, Deserialize)]
pub struct RecordMovementInput {
    pub product_id: Uuid,
    pub batch_id: Option<Uuid>,
    pub movement_type: MovementType,
    pub quantity: i32,
    pub notes: Option<String>,
}

/// Query parameters for the movement ledger list
#[derive(Debug, Default, Deserialize)]
pub struct MovementFilter {
    pub product_id: Option<Uuid>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, FromRow)]
struct LockedProduct {
    id: Uuid,
    current_stock: i32,
}

#[derive(Debug, FromRow)]
struct LockedBatch {
    id: Uuid,
    product_id: Uuid,
    current_quantity: i32,
    is_active: bool,
}

const MOVEMENT_COLUMNS: &str =
    "id, product_id, batch_id, movement_type, quantity, notes, created_by, created_at";

impl MovementService {
    /// Create a new MovementService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record an inventory movement.
    ///
    /// Preconditions, checked before any mutation:
    /// - the product is not under an active audit lock
    /// - a named batch belongs to the product and is still active
    /// - an exit does not exceed the available quantity (batch quantity when
    ///   a batch is named, product stock otherwise)
    pub async fn record(
        &self,
        actor_id: Uuid,
        input: RecordMovementInput,
    ) -> AppResult<Movement> {
        shared::validate_movement_quantity(input.quantity).map_err(|msg| {
            AppError::Validation {
                field: "quantity".to_string(),
                message: msg.to_string(),
                message_es: "La cantidad debe ser positiva".to_string(),
            }
        })?;

        // Audit gate, before any mutation
        let audit = AuditService::new(self.db.clone());
        if audit.is_blocked(input.product_id).await? {
            return Err(AppError::ProductBlocked(
                "product is blocked by an active audit".to_string(),
            ));
        }

        let mut tx = self.db.begin().await?;

        // Lock the product row for the whole reconciliation
        let product = sqlx::query_as::<_, LockedProduct>(
            "SELECT id, current_stock FROM products WHERE id = $1 FOR UPDATE",
        )
        .bind(input.product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        // Lock and validate the batch when one is named
        let batch = match input.batch_id {
            Some(batch_id) => {
                let batch = sqlx::query_as::<_, LockedBatch>(
                    "SELECT id, product_id, current_quantity, is_active FROM batches WHERE id = $1 FOR UPDATE",
                )
                .bind(batch_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::NotFound("Batch".to_string()))?;

                if batch.product_id != product.id {
                    return Err(AppError::Validation {
                        field: "batch_id".to_string(),
                        message: "Batch does not belong to the given product".to_string(),
                        message_es: "El lote no pertenece al producto indicado".to_string(),
                    });
                }

                // A deactivated batch is excluded from the product aggregate;
                // mutating it would desynchronize the stock from the active
                // batch sum
                if !batch.is_active {
                    return Err(AppError::Validation {
                        field: "batch_id".to_string(),
                        message: "Batch is deactivated and no longer accepts movements"
                            .to_string(),
                        message_es: "El lote está desactivado y ya no acepta movimientos"
                            .to_string(),
                    });
                }

                Some(batch)
            }
            None => None,
        };

        // Sufficiency check for exits, naming the available quantity
        if input.movement_type == MovementType::Exit {
            let available = shared::exit_availability(
                batch.as_ref().map(|b| b.current_quantity),
                product.current_stock,
            );

            if input.quantity > available {
                return Err(AppError::InsufficientStock(format!(
                    "requested {} exceeds available {}",
                    input.quantity, available
                )));
            }
        }

        // The movement row is persisted first: the immutable ledger entry
        let movement = sqlx::query_as::<_, Movement>(&format!(
            r#"
            INSERT INTO movements (product_id, batch_id, movement_type, quantity,
                                   notes, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {MOVEMENT_COLUMNS}
            "#,
        ))
        .bind(product.id)
        .bind(input.batch_id)
        .bind(input.movement_type.as_str())
        .bind(input.quantity)
        .bind(&input.notes)
        .bind(actor_id)
        .fetch_one(&mut *tx)
        .await?;

        // Batch quantity update and history append
        if let Some(batch) = &batch {
            apply_to_batch(&mut tx, batch, input.movement_type, input.quantity, actor_id).await?;
        }

        // Product aggregate reconciliation: incremental for entry/exit/return,
        // resummed from active batches for adjustments (batches are the
        // source of truth once introduced)
        match input.movement_type.signed_delta(input.quantity) {
            Some(delta) => {
                let new_stock = (product.current_stock + delta).max(0);
                sqlx::query(
                    "UPDATE products SET current_stock = $1, updated_at = NOW() WHERE id = $2",
                )
                .bind(new_stock)
                .bind(product.id)
                .execute(&mut *tx)
                .await?;
            }
            None => {
                resync_product_stock(&mut tx, product.id).await?;
            }
        }

        tx.commit().await?;

        Ok(movement)
    }

    /// List movements, most recent first, optionally narrowed to a product
    pub async fn list(&self, filter: MovementFilter) -> AppResult<PaginatedResponse<Movement>> {
        let pagination = Pagination {
            page: filter.page.unwrap_or(1),
            per_page: filter.per_page.unwrap_or(20).min(100),
        };

        let total_items = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM movements WHERE ($1::uuid IS NULL OR product_id = $1)",
        )
        .bind(filter.product_id)
        .fetch_one(&self.db)
        .await?;

        let movements = sqlx::query_as::<_, Movement>(&format!(
            r#"
            SELECT {MOVEMENT_COLUMNS}
            FROM movements
            WHERE ($1::uuid IS NULL OR product_id = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        ))
        .bind(filter.product_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        Ok(PaginatedResponse {
            data: movements,
            pagination: PaginationMeta::new(&pagination, total_items as u64),
        })
    }

    /// Get one movement by id
    pub async fn get(&self, movement_id: Uuid) -> AppResult<Movement> {
        let movement = sqlx::query_as::<_, Movement>(&format!(
            "SELECT {MOVEMENT_COLUMNS} FROM movements WHERE id = $1",
        ))
        .bind(movement_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Movement".to_string()))?;

        Ok(movement)
    }
}

/// Apply one movement's effect to a locked batch and append the history row.
///
/// The quantity before mutation is captured into a local here, before any
/// write, so the history carries the literal prior value rather than a
/// back-computed one.
async fn apply_to_batch(
    tx: &mut Transaction<'_, Postgres>,
    batch: &LockedBatch,
    movement_type: MovementType,
    quantity: i32,
    actor_id: Uuid,
) -> AppResult<()> {
    let quantity_before = batch.current_quantity;
    let quantity_after = movement_type.apply(quantity_before, quantity);

    sqlx::query("UPDATE batches SET current_quantity = $1 WHERE id = $2")
        .bind(quantity_after)
        .bind(batch.id)
        .execute(&mut **tx)
        .await?;

    let change_type = BatchChangeType::from_movement(movement_type);
    let notes = format!("{} movement of {}", movement_type.as_str(), quantity);

    sqlx::query(
        r#"
        INSERT INTO batch_history (batch_id, change_type, quantity_before,
                                   quantity_after, notes, created_by)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(batch.id)
    .bind(change_type.as_str())
    .bind(quantity_before)
    .bind(quantity_after)
    .bind(notes)
    .bind(actor_id)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
