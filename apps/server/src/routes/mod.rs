//! HTTP route table and handler modules.
//!
//! Handlers are thin: parse and validate the request, call a repository,
//! shape the response. Business rules live in till-core and the
//! transactional workflows in till-db.

pub mod attendance;
pub mod auth;
pub mod batches;
pub mod categories;
pub mod items;
pub mod reports;
pub mod sales;
pub mod settings;
pub mod users;

use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiResult;
use crate::AppState;

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        // Auth
        .route("/api/auth/login", post(auth::login))
        // Users
        .route("/api/users", get(users::list).post(users::create))
        .route(
            "/api/users/:id",
            get(users::get_one).put(users::update).delete(users::remove),
        )
        // Categories
        .route(
            "/api/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/api/categories/:id",
            get(categories::get_one)
                .put(categories::update)
                .delete(categories::remove),
        )
        .route("/api/categories/:id/items", get(categories::list_items))
        // Items
        .route("/api/items", get(items::list).post(items::create))
        .route("/api/items/search", get(items::search))
        .route("/api/items/low-stock", get(items::low_stock))
        .route("/api/items/expiring", get(items::expiring))
        .route("/api/items/barcode/:barcode", get(items::get_by_barcode))
        .route(
            "/api/items/:id",
            get(items::get_one).put(items::update).delete(items::remove),
        )
        .route("/api/items/:id/stock", patch(items::adjust_stock))
        // Batches
        .route("/api/batches", post(batches::create))
        .route("/api/batches/expiring", get(batches::expiring))
        .route(
            "/api/batches/:id",
            get(batches::get_one)
                .put(batches::update)
                .delete(batches::remove),
        )
        .route("/api/items/:id/batches", get(batches::list_for_item))
        // Attendance
        .route("/api/attendances/time-in", post(attendance::time_in))
        .route("/api/attendances/time-out", post(attendance::time_out))
        .route(
            "/api/attendances/weekly-report",
            get(attendance::weekly_report),
        )
        .route("/api/attendances/date/:date", get(attendance::list_for_date))
        .route(
            "/api/attendances/user/:id",
            get(attendance::list_for_user),
        )
        .route(
            "/api/attendances/user/:id/weekly-total",
            get(attendance::weekly_total),
        )
        // Sales
        .route("/api/sales", get(sales::list).post(sales::create))
        .route("/api/sales/daily-report", get(sales::daily_report))
        .route(
            "/api/sales/:id",
            get(sales::get_one).put(sales::update).delete(sales::remove),
        )
        // Reports
        .route("/api/reports/vat-summary", get(reports::vat_summary))
        .route(
            "/api/reports/category-summary",
            get(reports::category_summary),
        )
        .route("/api/reports/payroll", get(reports::payroll))
        // Settings
        .route(
            "/api/settings/company",
            get(settings::get_company).put(settings::save_company),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Liveness probe: checks the database can answer a query.
async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> ApiResult<Json<serde_json::Value>> {
    let healthy = state.db.health_check().await;

    if healthy {
        Ok(Json(json!({ "status": "ok" })))
    } else {
        Err(crate::error::ApiError::Internal(
            "database unreachable".to_string(),
        ))
    }
}
