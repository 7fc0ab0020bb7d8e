//! Purchase order service
//!
//! Orders group line items per supplier. Suggested orders are generated by
//! the replenishment trigger for products below minimum; staff push them
//! through approval to reception. Every creation and state change writes a
//! log row with the acting user, as an explicit call from the mutating
//! operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{MovementType, OrderStatus};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::alert::AlertService;
use crate::services::audit::AuditService;
use crate::services::movement::{MovementService, RecordMovementInput};

/// Purchase order service
#[derive(Clone)]
pub struct PurchaseOrderService {
    db: PgPool,
}

/// A purchase order
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PurchaseOrder {
    pub id: Uuid,
    pub supplier_id: Option<Uuid>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A line item on a purchase order
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PurchaseOrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
}

/// A log entry recording an order state change
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PurchaseOrderLog {
    pub id: Uuid,
    pub order_id: Uuid,
    pub status: String,
    pub description: String,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// An order with its line items and log
#[derive(Debug, Serialize)]
pub struct PurchaseOrderDetails {
    #[serde(flatten)]
    pub order: PurchaseOrder,
    pub items: Vec<PurchaseOrderItem>,
    pub logs: Vec<PurchaseOrderLog>,
}

/// Input for creating an order manually
#[derive(Debug, Deserialize)]
pub struct CreateOrderInput {
    pub supplier_id: Option<Uuid>,
    pub notes: Option<String>,
}

/// Input for adding a line item
#[derive(Debug, Deserialize)]
pub struct AddItemInput {
    pub product_id: Uuid,
    pub quantity: i32,
}

const ORDER_COLUMNS: &str = "id, supplier_id, status, notes, created_at, updated_at";
const ITEM_COLUMNS: &str = "id, order_id, product_id, quantity";
const LOG_COLUMNS: &str = "id, order_id, status, description, created_by, created_at";

impl PurchaseOrderService {
    /// Create a new PurchaseOrderService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create an order manually, in pending state
    pub async fn create(&self, actor_id: Uuid, input: CreateOrderInput) -> AppResult<PurchaseOrder> {
        let mut tx = self.db.begin().await?;

        let order = sqlx::query_as::<_, PurchaseOrder>(&format!(
            r#"
            INSERT INTO purchase_orders (supplier_id, status, notes)
            VALUES ($1, $2, $3)
            RETURNING {ORDER_COLUMNS}
            "#,
        ))
        .bind(input.supplier_id)
        .bind(OrderStatus::Pending.as_str())
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await?;

        insert_log(
            &mut tx,
            order.id,
            OrderStatus::Pending,
            "Order created",
            Some(actor_id),
        )
        .await?;

        tx.commit().await?;

        Ok(order)
    }

    /// List orders, most recent first
    pub async fn list(&self) -> AppResult<Vec<PurchaseOrder>> {
        let orders = sqlx::query_as::<_, PurchaseOrder>(&format!(
            "SELECT {ORDER_COLUMNS} FROM purchase_orders ORDER BY created_at DESC",
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(orders)
    }

    /// Get an order with its items and log
    pub async fn get_details(&self, order_id: Uuid) -> AppResult<PurchaseOrderDetails> {
        let order = self.get(order_id).await?;

        let items = sqlx::query_as::<_, PurchaseOrderItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM purchase_order_items WHERE order_id = $1",
        ))
        .bind(order_id)
        .fetch_all(&self.db)
        .await?;

        let logs = sqlx::query_as::<_, PurchaseOrderLog>(&format!(
            "SELECT {LOG_COLUMNS} FROM purchase_order_logs WHERE order_id = $1 ORDER BY created_at",
        ))
        .bind(order_id)
        .fetch_all(&self.db)
        .await?;

        Ok(PurchaseOrderDetails { order, items, logs })
    }

    /// Add a line item to an order still open for editing
    pub async fn add_item(
        &self,
        order_id: Uuid,
        input: AddItemInput,
    ) -> AppResult<PurchaseOrderItem> {
        shared::validate_movement_quantity(input.quantity).map_err(|msg| {
            AppError::Validation {
                field: "quantity".to_string(),
                message: msg.to_string(),
                message_es: "La cantidad debe ser positiva".to_string(),
            }
        })?;

        let order = self.get(order_id).await?;
        let status = parse_status(&order.status)?;
        if status.is_terminal() {
            return Err(AppError::Conflict {
                resource: "purchase_order".to_string(),
                message: format!("Cannot add items to a {} order", status.as_str()),
                message_es: "No se pueden agregar ítems a una orden cerrada".to_string(),
            });
        }

        // One line per product and order
        let existing = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM purchase_order_items WHERE order_id = $1 AND product_id = $2)",
        )
        .bind(order_id)
        .bind(input.product_id)
        .fetch_one(&self.db)
        .await?;

        if existing {
            return Err(AppError::DuplicateEntry("product".to_string()));
        }

        let item = sqlx::query_as::<_, PurchaseOrderItem>(&format!(
            r#"
            INSERT INTO purchase_order_items (order_id, product_id, quantity)
            VALUES ($1, $2, $3)
            RETURNING {ITEM_COLUMNS}
            "#,
        ))
        .bind(order_id)
        .bind(input.product_id)
        .bind(input.quantity)
        .fetch_one(&self.db)
        .await?;

        Ok(item)
    }

    /// Generate or top up suggested orders for every product below its
    /// minimum stock. For each low product, an open suggested order for its
    /// supplier is found or created and a line for the missing quantity is
    /// appended unless the product is already on the order. Returns the
    /// number of lines added.
    pub async fn generate_suggested_orders(&self) -> AppResult<u32> {
        let low = sqlx::query_as::<_, (Uuid, Option<Uuid>, i32, i32)>(
            r#"
            SELECT id, supplier_id, current_stock, minimum_stock
            FROM products
            WHERE current_stock < minimum_stock
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let mut added = 0;
        for (product_id, supplier_id, current, minimum) in low {
            if self
                .suggest_line(product_id, supplier_id, minimum - current)
                .await?
            {
                added += 1;
            }
        }

        if added > 0 {
            tracing::info!(lines = added, "suggested purchase order lines generated");
        }

        Ok(added)
    }

    /// Generate a suggested order line for one low-stock product
    pub async fn generate_for_product(&self, product_id: Uuid) -> AppResult<bool> {
        let product = sqlx::query_as::<_, (Option<Uuid>, i32, i32)>(
            "SELECT supplier_id, current_stock, minimum_stock FROM products WHERE id = $1",
        )
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        let (supplier_id, current, minimum) = product;
        if current >= minimum {
            return Ok(false);
        }

        self.suggest_line(product_id, supplier_id, minimum - current)
            .await
    }

    /// Advance an order to a new status. Invalid transitions are skipped
    /// with a conflict, never partially applied. Receiving an order records
    /// an entry movement per line item through the movement recorder, which
    /// resolves outstanding alerts for replenished products. The reception
    /// gate is checked across all items before the status is committed, so
    /// an audit-blocked product rejects the whole transition up front.
    pub async fn transition(
        &self,
        actor_id: Uuid,
        order_id: Uuid,
        next: OrderStatus,
    ) -> AppResult<PurchaseOrder> {
        let order = self.get(order_id).await?;
        let current = parse_status(&order.status)?;

        if !current.can_transition_to(next) {
            return Err(AppError::Conflict {
                resource: "purchase_order".to_string(),
                message: format!(
                    "Cannot move order from {} to {}",
                    current.as_str(),
                    next.as_str()
                ),
                message_es: format!(
                    "No se puede pasar la orden de {} a {}",
                    current.as_str(),
                    next.as_str()
                ),
            });
        }

        if next == OrderStatus::Received {
            self.check_reception_gate(order_id).await?;
        }

        let mut tx = self.db.begin().await?;

        let order = sqlx::query_as::<_, PurchaseOrder>(&format!(
            r#"
            UPDATE purchase_orders SET status = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING {ORDER_COLUMNS}
            "#,
        ))
        .bind(next.as_str())
        .bind(order_id)
        .fetch_one(&mut *tx)
        .await?;

        insert_log(
            &mut tx,
            order_id,
            next,
            &format!("Status changed to '{}'", next.as_str()),
            Some(actor_id),
        )
        .await?;

        tx.commit().await?;

        if next == OrderStatus::Received {
            self.apply_reception(actor_id, order_id).await?;
        }

        Ok(order)
    }

    /// Get one order
    async fn get(&self, order_id: Uuid) -> AppResult<PurchaseOrder> {
        let order = sqlx::query_as::<_, PurchaseOrder>(&format!(
            "SELECT {ORDER_COLUMNS} FROM purchase_orders WHERE id = $1",
        ))
        .bind(order_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase order".to_string()))?;

        Ok(order)
    }

    /// Reject reception while any ordered product is under an active audit,
    /// before the received status is committed
    async fn check_reception_gate(&self, order_id: Uuid) -> AppResult<()> {
        let product_ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT product_id FROM purchase_order_items WHERE order_id = $1",
        )
        .bind(order_id)
        .fetch_all(&self.db)
        .await?;

        let audit = AuditService::new(self.db.clone());
        for product_id in product_ids {
            if audit.is_blocked(product_id).await? {
                return Err(AppError::ProductBlocked(format!(
                    "product {} on the order is blocked by an active audit",
                    product_id
                )));
            }
        }

        Ok(())
    }

    /// Record the stock entries for a received order and reconcile alerts
    async fn apply_reception(&self, actor_id: Uuid, order_id: Uuid) -> AppResult<()> {
        let items = sqlx::query_as::<_, PurchaseOrderItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM purchase_order_items WHERE order_id = $1",
        ))
        .bind(order_id)
        .fetch_all(&self.db)
        .await?;

        let movements = MovementService::new(self.db.clone());
        let alerts = AlertService::new(self.db.clone());

        for item in items {
            movements
                .record(
                    actor_id,
                    RecordMovementInput {
                        product_id: item.product_id,
                        batch_id: None,
                        movement_type: MovementType::Entry,
                        quantity: item.quantity,
                        notes: Some(format!("Reception of purchase order {}", order_id)),
                    },
                )
                .await?;

            // Replenished products get their open alerts attended
            alerts.check_product(item.product_id).await?;
        }

        Ok(())
    }

    /// Find or create an open suggested order for the supplier and append a
    /// line for the missing quantity, unless one already exists
    async fn suggest_line(
        &self,
        product_id: Uuid,
        supplier_id: Option<Uuid>,
        missing: i32,
    ) -> AppResult<bool> {
        let mut tx = self.db.begin().await?;

        let order_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id FROM purchase_orders
            WHERE status = 'suggested' AND supplier_id IS NOT DISTINCT FROM $1
            ORDER BY created_at
            LIMIT 1
            "#,
        )
        .bind(supplier_id)
        .fetch_optional(&mut *tx)
        .await?;

        let order_id = match order_id {
            Some(id) => id,
            None => {
                let id = sqlx::query_scalar::<_, Uuid>(
                    r#"
                    INSERT INTO purchase_orders (supplier_id, status, notes)
                    VALUES ($1, 'suggested', 'Order generated automatically for low stock')
                    RETURNING id
                    "#,
                )
                .bind(supplier_id)
                .fetch_one(&mut *tx)
                .await?;

                insert_log(&mut tx, id, OrderStatus::Suggested, "Order created automatically", None)
                    .await?;

                id
            }
        };

        let already_listed = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM purchase_order_items WHERE order_id = $1 AND product_id = $2)",
        )
        .bind(order_id)
        .bind(product_id)
        .fetch_one(&mut *tx)
        .await?;

        if already_listed {
            tx.commit().await?;
            return Ok(false);
        }

        sqlx::query(
            "INSERT INTO purchase_order_items (order_id, product_id, quantity) VALUES ($1, $2, $3)",
        )
        .bind(order_id)
        .bind(product_id)
        .bind(missing)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(true)
    }
}

fn parse_status(status: &str) -> AppResult<OrderStatus> {
    OrderStatus::from_str(status)
        .ok_or_else(|| AppError::Internal(format!("unknown order status '{}'", status)))
}

async fn insert_log(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    order_id: Uuid,
    status: OrderStatus,
    description: &str,
    created_by: Option<Uuid>,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO purchase_order_logs (order_id, status, description, created_by)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(order_id)
    .bind(status.as_str())
    .bind(description)
    .bind(created_by)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
