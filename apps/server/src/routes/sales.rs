//! Sale endpoints.
//!
//! Creating a sale moves stock; deleting one moves it back; updating one
//! rewrites header and lines but never touches stock.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::AppState;
use till_core::validation::{validate_price, validate_quantity};
use till_core::{DiscountType, Money, PaymentMethod, Sale};
use till_db::repository::sale::{DailyReport, NewSale, NewSaleLine, SaleWithItems};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLineRequest {
    /// Catalog item, or omitted for a quick-sale line.
    pub item_id: Option<i64>,
    pub quantity: i64,
    /// Cents; required for quick-sale lines, overrides the catalog price
    /// otherwise.
    pub unit_price: Option<Money>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRequest {
    pub payment_method: PaymentMethod,
    pub user_id: Option<i64>,
    pub discount_type: Option<DiscountType>,
    pub discount_value: Option<i64>,
    /// Defaults to now (server local time).
    pub sale_date: Option<NaiveDateTime>,
    pub items: Vec<SaleLineRequest>,
}

impl SaleRequest {
    fn into_new_sale(self) -> ApiResult<NewSale> {
        if self.items.is_empty() {
            return Err(ApiError::Validation("A sale needs at least one line".to_string()));
        }

        let mut lines = Vec::with_capacity(self.items.len());
        for line in self.items {
            validate_quantity(line.quantity)?;
            if line.item_id.is_none() {
                // Quick-sale lines have no catalog price to fall back on.
                let price = line.unit_price.ok_or_else(|| {
                    ApiError::Validation("Quick-sale lines require a unitPrice".to_string())
                })?;
                validate_price("unitPrice", price)?;
            }
            lines.push(NewSaleLine {
                item_id: line.item_id,
                quantity: line.quantity,
                unit_price: line.unit_price,
            });
        }

        Ok(NewSale {
            payment_method: self.payment_method,
            user_id: self.user_id,
            discount_type: self.discount_type,
            discount_value: self.discount_value,
            sale_date: self.sale_date,
            lines,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReportQuery {
    /// Defaults to today (server local time).
    pub date: Option<NaiveDate>,
    /// Restrict the report to one cashier.
    pub user_id: Option<i64>,
}

/// POST /api/sales
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<SaleRequest>,
) -> ApiResult<(StatusCode, Json<SaleWithItems>)> {
    let sale = state.db.sales().create(&req.into_new_sale()?).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

/// GET /api/sales?limit=50
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Sale>>> {
    let limit = query.limit.unwrap_or(100).min(1000);
    Ok(Json(state.db.sales().list(limit).await?))
}

/// GET /api/sales/:id
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<SaleWithItems>> {
    let sale = state
        .db
        .sales()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Sale not found: {id}")))?;

    Ok(Json(sale))
}

/// PUT /api/sales/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<SaleRequest>,
) -> ApiResult<Json<SaleWithItems>> {
    let sale = state.db.sales().update(id, &req.into_new_sale()?).await?;
    Ok(Json(sale))
}

/// DELETE /api/sales/:id
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.db.sales().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/sales/daily-report?date=2026-08-20&userId=3
pub async fn daily_report(
    State(state): State<AppState>,
    Query(query): Query<DailyReportQuery>,
) -> ApiResult<Json<DailyReport>> {
    let date = query.date.unwrap_or_else(|| Local::now().date_naive());
    let report = state.db.sales().daily_report(date, query.user_id).await?;
    Ok(Json(report))
}
