//! Delivery batch endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::AppState;
use till_core::validation::validate_name;
use till_core::Batch;
use till_db::repository::batch::BatchFields;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRequest {
    pub item_id: i64,
    pub batch_id: String,
    #[serde(default)]
    pub quantity: i64,
    pub expiry_date: Option<NaiveDate>,
    pub manufacture_date: Option<NaiveDate>,
    pub received_date: Option<NaiveDate>,
    pub supplier_id: Option<String>,
}

impl BatchRequest {
    fn into_fields(self) -> ApiResult<BatchFields> {
        validate_name("batchId", &self.batch_id)?;

        Ok(BatchFields {
            item_id: self.item_id,
            batch_id: self.batch_id.trim().to_string(),
            quantity: self.quantity,
            expiry_date: self.expiry_date,
            manufacture_date: self.manufacture_date,
            received_date: self.received_date,
            supplier_id: self.supplier_id,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct BeforeQuery {
    pub before: NaiveDate,
}

/// POST /api/batches
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<BatchRequest>,
) -> ApiResult<(StatusCode, Json<Batch>)> {
    let batch = state.db.batches().insert(&req.into_fields()?).await?;
    Ok((StatusCode::CREATED, Json(batch)))
}

/// GET /api/items/:id/batches
pub async fn list_for_item(
    State(state): State<AppState>,
    Path(item_id): Path<i64>,
) -> ApiResult<Json<Vec<Batch>>> {
    Ok(Json(state.db.batches().list_for_item(item_id).await?))
}

/// GET /api/batches/expiring?before=2026-09-01
pub async fn expiring(
    State(state): State<AppState>,
    Query(query): Query<BeforeQuery>,
) -> ApiResult<Json<Vec<Batch>>> {
    Ok(Json(state.db.batches().list_expiring_before(query.before).await?))
}

/// GET /api/batches/:id
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Batch>> {
    let batch = state
        .db
        .batches()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Batch not found: {id}")))?;

    Ok(Json(batch))
}

/// PUT /api/batches/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<BatchRequest>,
) -> ApiResult<Json<Batch>> {
    let batch = state.db.batches().update(id, &req.into_fields()?).await?;
    Ok(Json(batch))
}

/// DELETE /api/batches/:id
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.db.batches().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
