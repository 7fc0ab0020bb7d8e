//! HTTP handlers for CSV report downloads

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::Response,
};
use serde::Deserialize;
use shared::DateRange;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::report::ReportService;
use crate::AppState;

/// Query parameters for the movements report
#[derive(Debug, Default, Deserialize)]
pub struct MovementReportQuery {
    pub product_id: Option<Uuid>,
    pub start: Option<chrono::NaiveDate>,
    pub end: Option<chrono::NaiveDate>,
}

/// Download the inventory snapshot as CSV
pub async fn download_inventory_report(State(state): State<AppState>) -> AppResult<Response> {
    let service = ReportService::new(state.db);
    let csv = service.inventory_csv().await?;
    csv_response(csv, "inventory.csv")
}

/// Download the movement ledger as CSV
pub async fn download_movements_report(
    State(state): State<AppState>,
    Query(query): Query<MovementReportQuery>,
) -> AppResult<Response> {
    let service = ReportService::new(state.db);
    let range = DateRange {
        start: query.start,
        end: query.end,
    };
    let csv = service.movements_csv(query.product_id, range).await?;
    csv_response(csv, "movements.csv")
}

fn csv_response(csv: Vec<u8>, filename: &str) -> AppResult<Response> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )
        .body(csv.into())
        .map_err(|e| AppError::Report(e.to_string()))
}
