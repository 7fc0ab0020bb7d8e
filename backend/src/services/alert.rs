//! Stock alert service
//!
//! Detects products below their minimum stock and maintains the alert set:
//! at most one unattended alert per product (look-before-create), automatic
//! resolution once stock recovers to the minimum. Email dispatch and
//! suggested-order generation are driven by the callers, so each side
//! effect stays an explicit call.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Alert service for low-stock detection
#[derive(Clone)]
pub struct AlertService {
    db: PgPool,
}

/// A low-stock alert
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StockAlert {
    pub id: Uuid,
    pub product_id: Uuid,
    pub message: String,
    pub attended: bool,
    pub created_at: DateTime<Utc>,
}

/// Outcome of a full low-stock sweep
#[derive(Debug, Serialize)]
pub struct SweepOutcome {
    pub created: Vec<StockAlert>,
    pub resolved: u64,
}

#[derive(Debug, FromRow)]
struct StockLevel {
    id: Uuid,
    name: String,
    current_stock: i32,
    minimum_stock: i32,
}

const ALERT_COLUMNS: &str = "id, product_id, message, attended, created_at";

impl AlertService {
    /// Create a new AlertService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Reconcile the alert state of a single product after a stock change.
    ///
    /// Below minimum: creates an alert unless an unattended one already
    /// exists. At or above minimum: marks any unattended alerts attended.
    /// Returns the newly created alert, if any.
    pub async fn check_product(&self, product_id: Uuid) -> AppResult<Option<StockAlert>> {
        let level = sqlx::query_as::<_, StockLevel>(
            "SELECT id, name, current_stock, minimum_stock FROM products WHERE id = $1",
        )
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        if level.current_stock < level.minimum_stock {
            self.create_if_missing(&level).await
        } else {
            self.resolve_for_product(product_id).await?;
            Ok(None)
        }
    }

    /// Sweep all products: create alerts for those below minimum, resolve
    /// alerts whose product has recovered
    pub async fn run_sweep(&self) -> AppResult<SweepOutcome> {
        let low = sqlx::query_as::<_, StockLevel>(
            r#"
            SELECT id, name, current_stock, minimum_stock
            FROM products
            WHERE current_stock < minimum_stock
            ORDER BY name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let mut created = Vec::new();
        for level in &low {
            if let Some(alert) = self.create_if_missing(level).await? {
                created.push(alert);
            }
        }

        // Alerts whose product is back at or above minimum are attended
        let resolved = sqlx::query(
            r#"
            UPDATE stock_alerts a
            SET attended = true
            FROM products p
            WHERE a.product_id = p.id
              AND a.attended = false
              AND p.current_stock >= p.minimum_stock
            "#,
        )
        .execute(&self.db)
        .await?
        .rows_affected();

        tracing::info!(
            created = created.len(),
            resolved,
            "low-stock sweep completed"
        );

        Ok(SweepOutcome { created, resolved })
    }

    /// Mark one alert attended
    pub async fn mark_attended(&self, alert_id: Uuid) -> AppResult<StockAlert> {
        let alert = sqlx::query_as::<_, StockAlert>(&format!(
            r#"
            UPDATE stock_alerts SET attended = true WHERE id = $1
            RETURNING {ALERT_COLUMNS}
            "#,
        ))
        .bind(alert_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Alert".to_string()))?;

        Ok(alert)
    }

    /// List alerts, unattended first, most recent first
    pub async fn list(&self, only_unattended: bool) -> AppResult<Vec<StockAlert>> {
        let alerts = sqlx::query_as::<_, StockAlert>(&format!(
            r#"
            SELECT {ALERT_COLUMNS}
            FROM stock_alerts
            WHERE ($1 = false OR attended = false)
            ORDER BY attended, created_at DESC
            "#,
        ))
        .bind(only_unattended)
        .fetch_all(&self.db)
        .await?;

        Ok(alerts)
    }

    /// Create an alert for a product below minimum unless an unattended one
    /// already exists
    async fn create_if_missing(&self, level: &StockLevel) -> AppResult<Option<StockAlert>> {
        let already_open = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM stock_alerts WHERE product_id = $1 AND attended = false)",
        )
        .bind(level.id)
        .fetch_one(&self.db)
        .await?;

        if already_open {
            return Ok(None);
        }

        let message = format!(
            "Stock of {} is {} units, below the minimum of {}",
            level.name, level.current_stock, level.minimum_stock
        );

        let alert = sqlx::query_as::<_, StockAlert>(&format!(
            r#"
            INSERT INTO stock_alerts (product_id, message)
            VALUES ($1, $2)
            RETURNING {ALERT_COLUMNS}
            "#,
        ))
        .bind(level.id)
        .bind(&message)
        .fetch_one(&self.db)
        .await?;

        Ok(Some(alert))
    }

    /// Mark all unattended alerts of a product attended
    async fn resolve_for_product(&self, product_id: Uuid) -> AppResult<u64> {
        let resolved = sqlx::query(
            "UPDATE stock_alerts SET attended = true WHERE product_id = $1 AND attended = false",
        )
        .bind(product_id)
        .execute(&self.db)
        .await?
        .rows_affected();

        Ok(resolved)
    }
}
