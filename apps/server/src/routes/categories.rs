//! Category endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::AppState;
use till_core::validation::validate_name;
use till_core::{Category, Item, VatRate};
use till_db::repository::category::CategoryFields;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRequest {
    pub name: String,
    pub description: Option<String>,
    /// Basis points; omit to leave items on the default rate.
    pub vat_rate: Option<VatRate>,
    #[serde(default)]
    pub display_on_pos: bool,
}

impl CategoryRequest {
    fn into_fields(self) -> ApiResult<CategoryFields> {
        validate_name("name", &self.name)?;

        Ok(CategoryFields {
            name: self.name.trim().to_string(),
            description: self.description,
            vat_rate: self.vat_rate,
            display_on_pos: self.display_on_pos,
        })
    }
}

/// POST /api/categories
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CategoryRequest>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let category = state.db.categories().insert(&req.into_fields()?).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// GET /api/categories
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(state.db.categories().list().await?))
}

/// GET /api/categories/:id
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Category>> {
    let category = state
        .db
        .categories()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Category not found: {id}")))?;

    Ok(Json(category))
}

/// GET /api/categories/:id/items
pub async fn list_items(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<Item>>> {
    Ok(Json(state.db.items().list_by_category(id).await?))
}

/// PUT /api/categories/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<CategoryRequest>,
) -> ApiResult<Json<Category>> {
    let category = state.db.categories().update(id, &req.into_fields()?).await?;
    Ok(Json(category))
}

/// DELETE /api/categories/:id
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.db.categories().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
