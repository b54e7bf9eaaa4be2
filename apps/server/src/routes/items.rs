//! Catalog item endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::AppState;
use till_core::validation::{validate_name, validate_price, validate_stock_quantity};
use till_core::{Item, Money, VatRate};
use till_db::repository::item::NewItem;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequest {
    pub name: String,
    pub description: Option<String>,
    /// Gross price in cents.
    pub price: Money,
    #[serde(default)]
    pub stock_quantity: i64,
    pub barcode: Option<String>,
    pub category_id: Option<i64>,
    /// Basis points; omit to inherit from the category.
    pub vat_rate: Option<VatRate>,
    pub batch_number: Option<String>,
    pub expiry_date: Option<NaiveDate>,
}

impl ItemRequest {
    fn into_fields(self) -> ApiResult<NewItem> {
        validate_name("name", &self.name)?;
        validate_price("price", self.price)?;
        validate_stock_quantity(self.stock_quantity)?;

        Ok(NewItem {
            name: self.name.trim().to_string(),
            description: self.description,
            price: self.price,
            stock_quantity: self.stock_quantity,
            barcode: self.barcode.filter(|b| !b.trim().is_empty()),
            category_id: self.category_id,
            vat_rate: self.vat_rate,
            batch_number: self.batch_number,
            expiry_date: self.expiry_date,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct ThresholdQuery {
    pub threshold: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct BeforeQuery {
    pub before: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct StockAdjustment {
    pub delta: i64,
}

/// POST /api/items
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<ItemRequest>,
) -> ApiResult<(StatusCode, Json<Item>)> {
    let item = state.db.items().insert(&req.into_fields()?).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// GET /api/items
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Item>>> {
    Ok(Json(state.db.items().list().await?))
}

/// GET /api/items/search?q=term
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Vec<Item>>> {
    Ok(Json(state.db.items().search(&query.q).await?))
}

/// GET /api/items/low-stock?threshold=5
pub async fn low_stock(
    State(state): State<AppState>,
    Query(query): Query<ThresholdQuery>,
) -> ApiResult<Json<Vec<Item>>> {
    let threshold = query
        .threshold
        .unwrap_or(state.config.low_stock_threshold);
    Ok(Json(state.db.items().list_low_stock(threshold).await?))
}

/// GET /api/items/expiring?before=2026-09-01
pub async fn expiring(
    State(state): State<AppState>,
    Query(query): Query<BeforeQuery>,
) -> ApiResult<Json<Vec<Item>>> {
    Ok(Json(state.db.items().list_expiring_before(query.before).await?))
}

/// GET /api/items/barcode/:barcode
pub async fn get_by_barcode(
    State(state): State<AppState>,
    Path(barcode): Path<String>,
) -> ApiResult<Json<Item>> {
    let item = state
        .db
        .items()
        .get_by_barcode(&barcode)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Item not found for barcode: {barcode}")))?;

    Ok(Json(item))
}

/// GET /api/items/:id
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Item>> {
    let item = state
        .db
        .items()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Item not found: {id}")))?;

    Ok(Json(item))
}

/// PUT /api/items/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<ItemRequest>,
) -> ApiResult<Json<Item>> {
    let item = state.db.items().update(id, &req.into_fields()?).await?;
    Ok(Json(item))
}

/// PATCH /api/items/:id/stock
///
/// Positive delta restocks, negative delta writes stock off. Selling goes
/// through sales, not this endpoint.
pub async fn adjust_stock(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<StockAdjustment>,
) -> ApiResult<Json<Item>> {
    let item = state.db.items().adjust_stock(id, req.delta).await?;
    Ok(Json(item))
}

/// DELETE /api/items/:id
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.db.items().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
