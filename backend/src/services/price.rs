//! Price history service
//!
//! Prices are append-only: each change writes a new row, and the latest row
//! is the current price. History is kept for cost reporting.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Price history service
#[derive(Clone)]
pub struct PriceService {
    db: PgPool,
}

/// A recorded unit price for a product
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PriceEntry {
    pub id: Uuid,
    pub product_id: Uuid,
    pub unit_price: Decimal,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a price
#[derive(Debug, Deserialize)]
pub struct RecordPriceInput {
    pub product_id: Uuid,
    pub unit_price: Decimal,
}

const PRICE_COLUMNS: &str = "id, product_id, unit_price, created_by, created_at";

impl PriceService {
    /// Create a new PriceService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a new unit price for a product
    pub async fn record(&self, actor_id: Uuid, input: RecordPriceInput) -> AppResult<PriceEntry> {
        if input.unit_price < Decimal::ZERO {
            return Err(AppError::Validation {
                field: "unit_price".to_string(),
                message: "Unit price cannot be negative".to_string(),
                message_es: "El precio unitario no puede ser negativo".to_string(),
            });
        }

        let product_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)",
        )
        .bind(input.product_id)
        .fetch_one(&self.db)
        .await?;

        if !product_exists {
            return Err(AppError::NotFound("Product".to_string()));
        }

        let entry = sqlx::query_as::<_, PriceEntry>(&format!(
            r#"
            INSERT INTO price_history (product_id, unit_price, created_by)
            VALUES ($1, $2, $3)
            RETURNING {PRICE_COLUMNS}
            "#,
        ))
        .bind(input.product_id)
        .bind(input.unit_price)
        .bind(actor_id)
        .fetch_one(&self.db)
        .await?;

        Ok(entry)
    }

    /// Full price history of a product, most recent first
    pub async fn history(&self, product_id: Uuid) -> AppResult<Vec<PriceEntry>> {
        let entries = sqlx::query_as::<_, PriceEntry>(&format!(
            r#"
            SELECT {PRICE_COLUMNS}
            FROM price_history
            WHERE product_id = $1
            ORDER BY created_at DESC
            "#,
        ))
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        Ok(entries)
    }

    /// Current price of a product, if one has been recorded
    pub async fn latest(&self, product_id: Uuid) -> AppResult<Option<PriceEntry>> {
        let entry = sqlx::query_as::<_, PriceEntry>(&format!(
            r#"
            SELECT {PRICE_COLUMNS}
            FROM price_history
            WHERE product_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        ))
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(entry)
    }
}
