//! HTTP handlers for stock alert endpoints
//!
//! The sweep endpoint drives the full alert cycle on demand: detection,
//! staff digest email and suggested order generation. Unlike the
//! per-movement check, a failed digest here fails the request, since the
//! caller explicitly asked for notifications to go out.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::alert::{AlertService, StockAlert, SweepOutcome};
use crate::services::notification::{EmailClient, NotificationService};
use crate::services::purchase_order::PurchaseOrderService;
use crate::services::settings::{SettingsService, AUTO_GENERATE_PURCHASE_ORDERS};
use crate::AppState;

/// Query parameters for the alert list
#[derive(Debug, Default, Deserialize)]
pub struct AlertListQuery {
    #[serde(default)]
    pub unattended: bool,
}

/// List stock alerts
pub async fn list_alerts(
    State(state): State<AppState>,
    Query(query): Query<AlertListQuery>,
) -> AppResult<Json<Vec<StockAlert>>> {
    let service = AlertService::new(state.db);
    let alerts = service.list(query.unattended).await?;
    Ok(Json(alerts))
}

/// Mark an alert attended
pub async fn attend_alert(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(alert_id): Path<Uuid>,
) -> AppResult<Json<StockAlert>> {
    let service = AlertService::new(state.db);
    let alert = service.mark_attended(alert_id).await?;
    Ok(Json(alert))
}

/// Run a full low-stock sweep: create and resolve alerts, email the digest
/// and generate suggested purchase orders when enabled
pub async fn run_alert_sweep(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<SweepOutcome>> {
    let alerts = AlertService::new(state.db.clone());
    let outcome = alerts.run_sweep().await?;

    let lines: Vec<String> = outcome.created.iter().map(|a| a.message.clone()).collect();
    let notifications = NotificationService::new(
        state.db.clone(),
        EmailClient::from_config(&state.config.email),
    );
    notifications.send_low_stock_digest(&lines).await?;

    let settings = SettingsService::new(state.db.clone());
    let auto_orders = settings
        .get_bool(
            AUTO_GENERATE_PURCHASE_ORDERS,
            state.config.alerts.auto_generate_purchase_orders,
        )
        .await?;

    if auto_orders {
        let orders = PurchaseOrderService::new(state.db.clone());
        orders.generate_suggested_orders().await?;
    }

    Ok(Json(outcome))
}
