//! CSV report generation
//!
//! Reports are rendered in memory and returned as CSV bytes; the handler
//! attaches the download headers.

use shared::DateRange;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Report service
#[derive(Clone)]
pub struct ReportService {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct InventoryRow {
    serial_number: String,
    name: String,
    category: String,
    location: String,
    current_stock: i32,
    minimum_stock: i32,
    supplier_name: Option<String>,
}

#[derive(Debug, FromRow)]
struct MovementRow {
    created_at: chrono::DateTime<chrono::Utc>,
    product_name: String,
    movement_type: String,
    quantity: i32,
    batch_number: Option<String>,
    username: Option<String>,
    notes: Option<String>,
}

impl ReportService {
    /// Create a new ReportService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Full inventory snapshot as CSV
    pub async fn inventory_csv(&self) -> AppResult<Vec<u8>> {
        let rows = sqlx::query_as::<_, InventoryRow>(
            r#"
            SELECT p.serial_number, p.name, p.category, p.location,
                   p.current_stock, p.minimum_stock, s.name AS supplier_name
            FROM products p
            LEFT JOIN suppliers s ON s.id = p.supplier_id
            ORDER BY p.name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let mut writer = csv::Writer::from_writer(Vec::new());

        writer
            .write_record([
                "serial_number",
                "name",
                "category",
                "location",
                "current_stock",
                "minimum_stock",
                "supplier",
                "below_minimum",
            ])
            .map_err(|e| AppError::Report(e.to_string()))?;

        for row in rows {
            let current_stock = row.current_stock.to_string();
            let minimum_stock = row.minimum_stock.to_string();
            let below = if row.current_stock < row.minimum_stock {
                "yes"
            } else {
                "no"
            };

            writer
                .write_record([
                    row.serial_number.as_str(),
                    row.name.as_str(),
                    row.category.as_str(),
                    row.location.as_str(),
                    current_stock.as_str(),
                    minimum_stock.as_str(),
                    row.supplier_name.as_deref().unwrap_or(""),
                    below,
                ])
                .map_err(|e| AppError::Report(e.to_string()))?;
        }

        writer
            .into_inner()
            .map_err(|e| AppError::Report(e.to_string()))
    }

    /// Movement ledger as CSV, optionally bounded by a date range and product
    pub async fn movements_csv(
        &self,
        product_id: Option<Uuid>,
        range: DateRange,
    ) -> AppResult<Vec<u8>> {
        let rows = sqlx::query_as::<_, MovementRow>(
            r#"
            SELECT m.created_at, p.name AS product_name, m.movement_type,
                   m.quantity, b.batch_number, u.username, m.notes
            FROM movements m
            JOIN products p ON p.id = m.product_id
            LEFT JOIN batches b ON b.id = m.batch_id
            LEFT JOIN users u ON u.id = m.created_by
            WHERE ($1::uuid IS NULL OR m.product_id = $1)
              AND ($2::date IS NULL OR m.created_at::date >= $2)
              AND ($3::date IS NULL OR m.created_at::date <= $3)
            ORDER BY m.created_at
            "#,
        )
        .bind(product_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.db)
        .await?;

        let mut writer = csv::Writer::from_writer(Vec::new());

        writer
            .write_record([
                "date",
                "product",
                "movement_type",
                "quantity",
                "batch",
                "user",
                "notes",
            ])
            .map_err(|e| AppError::Report(e.to_string()))?;

        for row in rows {
            let date = row.created_at.to_rfc3339();
            let quantity = row.quantity.to_string();

            writer
                .write_record([
                    date.as_str(),
                    row.product_name.as_str(),
                    row.movement_type.as_str(),
                    quantity.as_str(),
                    row.batch_number.as_deref().unwrap_or(""),
                    row.username.as_deref().unwrap_or(""),
                    row.notes.as_deref().unwrap_or(""),
                ])
                .map_err(|e| AppError::Report(e.to_string()))?;
        }

        writer
            .into_inner()
            .map_err(|e| AppError::Report(e.to_string()))
    }
}
