//! Company settings endpoints.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::AppState;
use till_core::validation::validate_name;
use till_core::CompanySettings;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySettingsRequest {
    pub company_name: String,
    pub address: Option<String>,
}

/// GET /api/settings/company
pub async fn get_company(State(state): State<AppState>) -> ApiResult<Json<CompanySettings>> {
    let settings = state
        .db
        .settings()
        .get()
        .await?
        .ok_or_else(|| ApiError::NotFound("Company settings not configured".to_string()))?;

    Ok(Json(settings))
}

/// PUT /api/settings/company
pub async fn save_company(
    State(state): State<AppState>,
    Json(req): Json<CompanySettingsRequest>,
) -> ApiResult<Json<CompanySettings>> {
    validate_name("companyName", &req.company_name)?;

    let settings = state
        .db
        .settings()
        .save(req.company_name.trim(), req.address.as_deref())
        .await?;

    Ok(Json(settings))
}
