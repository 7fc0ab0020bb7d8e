//! Audit lock gate
//!
//! Decides whether a product may currently be mutated by inventory
//! operations. A product with an active lock rejects movements and project
//! material assignments until the lock is finalized.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Audit service managing product locks
#[derive(Clone)]
pub struct AuditService {
    db: PgPool,
}

/// An audit lock on a product
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AuditLock {
    pub id: Uuid,
    pub product_id: Uuid,
    pub reason: String,
    pub auditor_id: Option<Uuid>,
    pub blocked: bool,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

/// Input for blocking a product
#[derive(Debug, Deserialize)]
pub struct BlockProductInput {
    pub product_id: Uuid,
    pub reason: String,
}

const LOCK_COLUMNS: &str = "id, product_id, reason, auditor_id, blocked, started_at, ended_at";

impl AuditService {
    /// Create a new AuditService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// True iff an active audit lock exists for the product.
    /// Read-only, safe to call repeatedly.
    pub async fn is_blocked(&self, product_id: Uuid) -> AppResult<bool> {
        let blocked = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM audit_locks WHERE product_id = $1 AND blocked = true)",
        )
        .bind(product_id)
        .fetch_one(&self.db)
        .await?;

        Ok(blocked)
    }

    /// First active lock for the product, for display of reason and auditor
    pub async fn active_lock(&self, product_id: Uuid) -> AppResult<Option<AuditLock>> {
        let lock = sqlx::query_as::<_, AuditLock>(&format!(
            r#"
            SELECT {LOCK_COLUMNS}
            FROM audit_locks
            WHERE product_id = $1 AND blocked = true
            ORDER BY started_at
            LIMIT 1
            "#,
        ))
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(lock)
    }

    /// Block a product for audit. Fails with a conflict when an active lock
    /// already exists, so at most one active lock per product can be created
    /// through this gate.
    pub async fn block(
        &self,
        auditor_id: Uuid,
        input: BlockProductInput,
    ) -> AppResult<AuditLock> {
        let product_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)",
        )
        .bind(input.product_id)
        .fetch_one(&self.db)
        .await?;

        if !product_exists {
            return Err(AppError::NotFound("Product".to_string()));
        }

        if self.is_blocked(input.product_id).await? {
            return Err(AppError::Conflict {
                resource: "product".to_string(),
                message: "Product is already blocked by an active audit".to_string(),
                message_es: "El producto ya está bloqueado por una auditoría activa".to_string(),
            });
        }

        let lock = sqlx::query_as::<_, AuditLock>(&format!(
            r#"
            INSERT INTO audit_locks (product_id, reason, auditor_id)
            VALUES ($1, $2, $3)
            RETURNING {LOCK_COLUMNS}
            "#,
        ))
        .bind(input.product_id)
        .bind(&input.reason)
        .bind(auditor_id)
        .fetch_one(&self.db)
        .await?;

        Ok(lock)
    }

    /// Finalize a lock: set its end time and clear the blocked flag.
    /// Calling this on an already-finalized lock only refreshes the end
    /// timestamp.
    pub async fn unblock(&self, lock_id: Uuid) -> AppResult<AuditLock> {
        let lock = sqlx::query_as::<_, AuditLock>(&format!(
            r#"
            UPDATE audit_locks
            SET blocked = false, ended_at = NOW()
            WHERE id = $1
            RETURNING {LOCK_COLUMNS}
            "#,
        ))
        .bind(lock_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Audit lock".to_string()))?;

        Ok(lock)
    }

    /// List all locks, most recent first
    pub async fn list(&self) -> AppResult<Vec<AuditLock>> {
        let locks = sqlx::query_as::<_, AuditLock>(&format!(
            r#"
            SELECT {LOCK_COLUMNS}
            FROM audit_locks
            ORDER BY started_at DESC
            "#,
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(locks)
    }
}
