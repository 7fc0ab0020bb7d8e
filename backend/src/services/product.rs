//! Product catalog service

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::{PaginatedResponse, Pagination, PaginationMeta};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Product service for catalog management
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// A tracked product
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub serial_number: String,
    pub name: String,
    pub description: Option<String>,
    pub location: String,
    pub category: String,
    pub supplier_id: Option<Uuid>,
    pub expiry_date: Option<NaiveDate>,
    pub current_stock: i32,
    pub minimum_stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a product
#[derive(Debug, Deserialize)]
pub struct CreateProductInput {
    pub serial_number: String,
    pub name: String,
    pub description: Option<String>,
    pub location: String,
    pub category: String,
    pub supplier_id: Option<Uuid>,
    pub expiry_date: Option<NaiveDate>,
    pub current_stock: Option<i32>,
    pub minimum_stock: Option<i32>,
}

/// Input for updating a product
#[derive(Debug, Deserialize)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub supplier_id: Option<Uuid>,
    pub expiry_date: Option<NaiveDate>,
    pub current_stock: Option<i32>,
    pub minimum_stock: Option<i32>,
}

/// Filters for the product list
#[derive(Debug, Default, Deserialize)]
pub struct ProductFilter {
    pub name: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

const PRODUCT_COLUMNS: &str = "id, serial_number, name, description, location, category, \
     supplier_id, expiry_date, current_stock, minimum_stock, created_at, updated_at";

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a product
    pub async fn create(&self, input: CreateProductInput) -> AppResult<Product> {
        shared::validate_serial_number(&input.serial_number).map_err(|msg| {
            AppError::Validation {
                field: "serial_number".to_string(),
                message: msg.to_string(),
                message_es: "Número de serie inválido".to_string(),
            }
        })?;

        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Product name cannot be empty".to_string(),
                message_es: "El nombre del producto no puede estar vacío".to_string(),
            });
        }

        let current_stock = input.current_stock.unwrap_or(0);
        let minimum_stock = input.minimum_stock.unwrap_or(0);
        shared::validate_stock_levels(current_stock, minimum_stock).map_err(|msg| {
            AppError::Validation {
                field: "stock".to_string(),
                message: msg.to_string(),
                message_es: "Niveles de stock inválidos".to_string(),
            }
        })?;

        let duplicate = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE serial_number = $1)",
        )
        .bind(input.serial_number.trim())
        .fetch_one(&self.db)
        .await?;

        if duplicate {
            return Err(AppError::DuplicateEntry("serial_number".to_string()));
        }

        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (serial_number, name, description, location, category,
                                  supplier_id, expiry_date, current_stock, minimum_stock)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {PRODUCT_COLUMNS}
            "#,
        ))
        .bind(input.serial_number.trim())
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.location)
        .bind(&input.category)
        .bind(input.supplier_id)
        .bind(input.expiry_date)
        .bind(current_stock)
        .bind(minimum_stock)
        .fetch_one(&self.db)
        .await?;

        Ok(product)
    }

    /// Get a product by id
    pub async fn get(&self, product_id: Uuid) -> AppResult<Product> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1",
        ))
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(product)
    }

    /// List products with optional name/location/category filters, paginated
    pub async fn list(&self, filter: ProductFilter) -> AppResult<PaginatedResponse<Product>> {
        let pagination = Pagination {
            page: filter.page.unwrap_or(1),
            per_page: filter.per_page.unwrap_or(20).min(100),
        };

        let name = filter.name.unwrap_or_default();
        let location = filter.location.unwrap_or_default();
        let category = filter.category.unwrap_or_default();

        let total_items = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM products
            WHERE ($1 = '' OR name ILIKE '%' || $1 || '%')
              AND ($2 = '' OR location ILIKE '%' || $2 || '%')
              AND ($3 = '' OR category ILIKE '%' || $3 || '%')
            "#,
        )
        .bind(&name)
        .bind(&location)
        .bind(&category)
        .fetch_one(&self.db)
        .await?;

        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE ($1 = '' OR name ILIKE '%' || $1 || '%')
              AND ($2 = '' OR location ILIKE '%' || $2 || '%')
              AND ($3 = '' OR category ILIKE '%' || $3 || '%')
            ORDER BY name
            LIMIT $4 OFFSET $5
            "#,
        ))
        .bind(&name)
        .bind(&location)
        .bind(&category)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        Ok(PaginatedResponse {
            data: products,
            pagination: PaginationMeta::new(&pagination, total_items as u64),
        })
    }

    /// Distinct categories, for list filtering
    pub async fn categories(&self) -> AppResult<Vec<String>> {
        let categories = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT category FROM products ORDER BY category",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(categories)
    }

    /// Update a product's descriptive fields and, for batch-less products,
    /// its directly managed stock levels
    pub async fn update(&self, product_id: Uuid, input: UpdateProductInput) -> AppResult<Product> {
        let existing = self.get(product_id).await?;

        let name = input.name.unwrap_or(existing.name);
        let description = input.description.or(existing.description);
        let location = input.location.unwrap_or(existing.location);
        let category = input.category.unwrap_or(existing.category);
        let supplier_id = input.supplier_id.or(existing.supplier_id);
        let expiry_date = input.expiry_date.or(existing.expiry_date);
        let current_stock = input.current_stock.unwrap_or(existing.current_stock);
        let minimum_stock = input.minimum_stock.unwrap_or(existing.minimum_stock);

        shared::validate_stock_levels(current_stock, minimum_stock).map_err(|msg| {
            AppError::Validation {
                field: "stock".to_string(),
                message: msg.to_string(),
                message_es: "Niveles de stock inválidos".to_string(),
            }
        })?;

        // Batches are the source of truth once introduced; a direct stock
        // edit would desynchronize the aggregate from the active batch sum
        if current_stock != existing.current_stock {
            let active_batches = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM batches WHERE product_id = $1 AND is_active = true",
            )
            .bind(product_id)
            .fetch_one(&self.db)
            .await?;

            shared::validate_direct_stock_edit(active_batches).map_err(|msg| {
                AppError::Validation {
                    field: "current_stock".to_string(),
                    message: msg.to_string(),
                    message_es: "El stock se gestiona por lotes; registre un movimiento"
                        .to_string(),
                }
            })?;
        }

        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET name = $1, description = $2, location = $3, category = $4,
                supplier_id = $5, expiry_date = $6, current_stock = $7,
                minimum_stock = $8, updated_at = NOW()
            WHERE id = $9
            RETURNING {PRODUCT_COLUMNS}
            "#,
        ))
        .bind(&name)
        .bind(&description)
        .bind(&location)
        .bind(&category)
        .bind(supplier_id)
        .bind(expiry_date)
        .bind(current_stock)
        .bind(minimum_stock)
        .bind(product_id)
        .fetch_one(&self.db)
        .await?;

        Ok(product)
    }

    /// Products currently below their minimum stock
    pub async fn low_stock(&self) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE current_stock < minimum_stock
            ORDER BY name
            "#,
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(products)
    }
}
