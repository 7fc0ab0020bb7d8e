//! HTTP handlers for the movement ledger
//!
//! Recording a movement triggers the low-stock check for the product.
//! Alerting and replenishment side effects run after the ledger commit:
//! their failures are logged and never undo a recorded movement.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use shared::PaginatedResponse;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::alert::AlertService;
use crate::services::movement::{Movement, MovementFilter, MovementService, RecordMovementInput};
use crate::services::notification::{EmailClient, NotificationService};
use crate::services::purchase_order::PurchaseOrderService;
use crate::services::settings::{SettingsService, AUTO_GENERATE_PURCHASE_ORDERS};
use crate::AppState;

/// Record an inventory movement
pub async fn record_movement(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<RecordMovementInput>,
) -> AppResult<Json<Movement>> {
    let service = MovementService::new(state.db.clone());
    let movement = service.record(current_user.0.user_id, input).await?;

    // Post-commit side effects. The movement is already recorded; failures
    // here are logged, not surfaced.
    if let Err(e) = run_stock_checks(&state, movement.product_id).await {
        tracing::warn!(
            product_id = %movement.product_id,
            error = %e,
            "post-movement stock checks failed"
        );
    }

    Ok(Json(movement))
}

/// List movements, optionally filtered by product
pub async fn list_movements(
    State(state): State<AppState>,
    Query(filter): Query<MovementFilter>,
) -> AppResult<Json<PaginatedResponse<Movement>>> {
    let service = MovementService::new(state.db);
    let movements = service.list(filter).await?;
    Ok(Json(movements))
}

/// Get one movement
pub async fn get_movement(
    State(state): State<AppState>,
    Path(movement_id): Path<Uuid>,
) -> AppResult<Json<Movement>> {
    let service = MovementService::new(state.db);
    let movement = service.get(movement_id).await?;
    Ok(Json(movement))
}

/// Reconcile alerts for a product after a stock change, email the digest
/// and generate a suggested order when enabled
async fn run_stock_checks(state: &AppState, product_id: Uuid) -> AppResult<()> {
    let alerts = AlertService::new(state.db.clone());
    let created = alerts.check_product(product_id).await?;

    let Some(alert) = created else {
        return Ok(());
    };

    let notifications = NotificationService::new(
        state.db.clone(),
        EmailClient::from_config(&state.config.email),
    );
    notifications
        .send_low_stock_digest(&[alert.message.clone()])
        .await?;

    let settings = SettingsService::new(state.db.clone());
    let auto_orders = settings
        .get_bool(
            AUTO_GENERATE_PURCHASE_ORDERS,
            state.config.alerts.auto_generate_purchase_orders,
        )
        .await?;

    if auto_orders {
        let orders = PurchaseOrderService::new(state.db.clone());
        orders.generate_for_product(product_id).await?;
    }

    Ok(())
}
