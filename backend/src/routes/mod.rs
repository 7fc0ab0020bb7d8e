//! Route definitions for the Maestranza Inventory Platform

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public login, protected profile)
        .nest("/auth", auth_routes())
        // Protected routes - product catalog
        .nest("/products", product_routes())
        // Protected routes - movement ledger
        .nest("/movements", movement_routes())
        // Protected routes - batch management
        .nest("/batches", batch_routes())
        // Protected routes - audit locks
        .nest("/audits", audit_routes())
        // Protected routes - stock alerts
        .nest("/alerts", alert_routes())
        // Protected routes - purchase orders
        .nest("/purchase-orders", purchase_order_routes())
        // Protected routes - suppliers
        .nest("/suppliers", supplier_routes())
        // Protected routes - projects
        .nest("/projects", project_routes())
        // Protected routes - kits
        .nest("/kits", kit_routes())
        // Protected routes - price history
        .nest("/prices", price_routes())
        // Protected routes - CSV reports
        .nest("/reports", report_routes())
        // Protected routes - system settings
        .nest("/settings", settings_routes())
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::login))
        .merge(protected_auth_routes())
}

fn protected_auth_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(handlers::me))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Product catalog routes (protected)
fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route("/categories", get(handlers::list_categories))
        .route("/low-stock", get(handlers::list_low_stock))
        .route(
            "/:product_id",
            get(handlers::get_product).put(handlers::update_product),
        )
        .route("/:product_id/batches", get(handlers::list_product_batches))
        .route("/:product_id/audit", get(handlers::get_active_lock))
        .route("/:product_id/prices", get(handlers::get_price_history))
        .route(
            "/:product_id/prices/current",
            get(handlers::get_current_price),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Movement ledger routes (protected)
fn movement_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_movements).post(handlers::record_movement),
        )
        .route("/:movement_id", get(handlers::get_movement))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Batch management routes (protected)
fn batch_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_batch))
        .route("/:batch_id", get(handlers::get_batch))
        .route("/:batch_id/deactivate", post(handlers::deactivate_batch))
        .route("/:batch_id/history", get(handlers::get_batch_history))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Audit lock routes (protected)
fn audit_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_audit_locks).post(handlers::block_product),
        )
        .route("/:lock_id/unblock", post(handlers::unblock_product))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Stock alert routes (protected)
fn alert_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_alerts))
        .route("/run", post(handlers::run_alert_sweep))
        .route("/:alert_id/attend", post(handlers::attend_alert))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Purchase order routes (protected)
fn purchase_order_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_orders).post(handlers::create_order),
        )
        .route("/generate", post(handlers::generate_suggested_orders))
        .route("/:order_id", get(handlers::get_order))
        .route("/:order_id/items", post(handlers::add_order_item))
        .route("/:order_id/status", put(handlers::transition_order))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Supplier routes (protected)
fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_suppliers).post(handlers::create_supplier),
        )
        .route(
            "/:supplier_id",
            get(handlers::get_supplier).put(handlers::update_supplier),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Project routes (protected)
fn project_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_projects).post(handlers::create_project),
        )
        .route("/:project_id", get(handlers::get_project))
        .route("/:project_id/close", post(handlers::close_project))
        .route(
            "/:project_id/materials",
            get(handlers::list_project_materials).post(handlers::assign_material),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Kit routes (protected)
fn kit_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_kits).post(handlers::create_kit))
        .route("/:kit_id", get(handlers::get_kit))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Price history routes (protected)
fn price_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::record_price))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// CSV report routes (protected)
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/inventory", get(handlers::download_inventory_report))
        .route("/movements", get(handlers::download_movements_report))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// System settings routes (protected)
fn settings_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_settings).put(handlers::update_setting),
        )
        .route("/:key", get(handlers::get_setting))
        .route_layer(middleware::from_fn(auth_middleware))
}
