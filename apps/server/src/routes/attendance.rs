//! Attendance endpoints: clock-in, clock-out and weekly hour reports.
//!
//! Requests may carry an explicit date and time (back-office corrections);
//! without them the server's local wall clock applies, the same clock the
//! end-of-day scheduler uses. Clock bodies reject unknown fields so a
//! mistyped field name fails loudly instead of silently defaulting to now.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Local, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::AppState;
use till_core::hours::{week_end, week_start, WorkedHours};
use till_core::Attendance;
use till_db::repository::attendance::UserWeeklyHours;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TimeInRequest {
    pub user_id: i64,
    /// Defaults to today (server local time).
    pub date: Option<NaiveDate>,
    /// Defaults to now (server local time).
    pub time_in: Option<NaiveTime>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TimeOutRequest {
    pub user_id: i64,
    /// Defaults to today (server local time).
    pub date: Option<NaiveDate>,
    /// Defaults to now (server local time).
    pub time_out: Option<NaiveTime>,
}

/// Fills missing clock fields from the server's local wall clock.
fn resolve_clock(date: Option<NaiveDate>, time: Option<NaiveTime>) -> (NaiveDate, NaiveTime) {
    let now = Local::now().naive_local();
    (
        date.unwrap_or_else(|| now.date()),
        time.unwrap_or_else(|| now.time()),
    )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekQuery {
    /// Any date inside the wanted week; defaults to today.
    pub week_start: Option<NaiveDate>,
}

impl WeekQuery {
    fn resolve(&self) -> NaiveDate {
        self.week_start.unwrap_or_else(|| Local::now().date_naive())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyTotalResponse {
    pub user_id: i64,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub total_hours: WorkedHours,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyReportResponse {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub users: Vec<UserWeeklyHours>,
}

/// POST /api/attendances/time-in
///
/// Always opens a fresh session; split shifts stack as separate rows.
pub async fn time_in(
    State(state): State<AppState>,
    Json(req): Json<TimeInRequest>,
) -> ApiResult<(StatusCode, Json<Attendance>)> {
    let (date, time) = resolve_clock(req.date, req.time_in);
    let attendance = state.db.attendances().time_in(req.user_id, date, time).await?;
    Ok((StatusCode::CREATED, Json(attendance)))
}

/// POST /api/attendances/time-out
///
/// Closes the latest open session for the user and date; 409 when there
/// is nothing open to close.
pub async fn time_out(
    State(state): State<AppState>,
    Json(req): Json<TimeOutRequest>,
) -> ApiResult<Json<Attendance>> {
    let (date, time) = resolve_clock(req.date, req.time_out);
    let attendance = state.db.attendances().time_out(req.user_id, date, time).await?;
    Ok(Json(attendance))
}

/// GET /api/attendances/weekly-report?weekStart=2026-08-17
pub async fn weekly_report(
    State(state): State<AppState>,
    Query(query): Query<WeekQuery>,
) -> ApiResult<Json<WeeklyReportResponse>> {
    let date = query.resolve();
    let start = week_start(date);

    let users = state.db.attendances().weekly_report(date).await?;

    Ok(Json(WeeklyReportResponse {
        week_start: start,
        week_end: week_end(start),
        users,
    }))
}

/// GET /api/attendances/user/:id/weekly-total?weekStart=2026-08-17
pub async fn weekly_total(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<WeekQuery>,
) -> ApiResult<Json<WeeklyTotalResponse>> {
    let date = query.resolve();
    let start = week_start(date);

    let total_hours = state.db.attendances().weekly_total(user_id, date).await?;

    Ok(Json(WeeklyTotalResponse {
        user_id,
        week_start: start,
        week_end: week_end(start),
        total_hours,
    }))
}

/// GET /api/attendances/user/:id
pub async fn list_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<Vec<Attendance>>> {
    Ok(Json(state.db.attendances().list_for_user(user_id).await?))
}

/// GET /api/attendances/date/:date
pub async fn list_for_date(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> ApiResult<Json<Vec<Attendance>>> {
    Ok(Json(state.db.attendances().list_for_date(date).await?))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_bodies_use_wire_field_names() {
        let req: TimeInRequest = serde_json::from_str(
            r#"{"userId": 3, "date": "2026-08-17", "timeIn": "09:00:00"}"#,
        )
        .unwrap();

        let (date, time) = resolve_clock(req.date, req.time_in);
        assert_eq!(date, "2026-08-17".parse::<NaiveDate>().unwrap());
        assert_eq!(time, "09:00:00".parse::<NaiveTime>().unwrap());
    }

    #[test]
    fn clock_bodies_reject_unknown_fields() {
        // A mislabeled time field must fail, not silently default to now.
        let result = serde_json::from_str::<TimeOutRequest>(
            r#"{"userId": 3, "date": "2026-08-17", "time": "17:30:00"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn week_query_reads_week_start_param() {
        let query: WeekQuery =
            serde_json::from_str(r#"{"weekStart": "2026-08-17"}"#).unwrap();
        assert_eq!(query.resolve(), "2026-08-17".parse::<NaiveDate>().unwrap());
    }
}
