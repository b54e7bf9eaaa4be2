//! Aggregated reporting endpoints.

use axum::extract::{Query, State};
use axum::Json;
use chrono::{Local, NaiveDate};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::AppState;
use till_db::repository::report::{CategorySummaryRow, PayrollRow, VatSummaryRow};

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    /// Defaults to today when both bounds are absent.
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl RangeQuery {
    fn resolve(&self) -> ApiResult<(NaiveDate, NaiveDate)> {
        let today = Local::now().date_naive();
        let from = self.from.unwrap_or(today);
        let to = self.to.unwrap_or(from);

        if to < from {
            return Err(ApiError::Validation(
                "Range end precedes range start".to_string(),
            ));
        }

        Ok((from, to))
    }
}

/// GET /api/reports/vat-summary?from=2026-08-01&to=2026-08-31
pub async fn vat_summary(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Json<Vec<VatSummaryRow>>> {
    let (from, to) = query.resolve()?;
    Ok(Json(state.db.reports().vat_summary(from, to).await?))
}

/// GET /api/reports/category-summary?from=2026-08-01&to=2026-08-31
pub async fn category_summary(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Json<Vec<CategorySummaryRow>>> {
    let (from, to) = query.resolve()?;
    Ok(Json(state.db.reports().category_summary(from, to).await?))
}

/// GET /api/reports/payroll?from=2026-08-17&to=2026-08-23
pub async fn payroll(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Json<Vec<PayrollRow>>> {
    let (from, to) = query.resolve()?;
    Ok(Json(state.db.reports().payroll(from, to).await?))
}
