//! # Attendance Repository
//!
//! Clock-in/out sessions and weekly hour totals.
//!
//! ## Session Rules
//! ```text
//!   time_in   always INSERTs a fresh row, even if one is already open
//!             (split shifts: morning 9-12, evening 17-21)
//!   time_out  closes the LATEST open row for (user, date) and stamps
//!             total_hours; with no open row it is a conflict
//!   auto      at end of day, every still-open row is closed at 23:59
//!             inside one transaction
//! ```
//! A closed session never reopens.

use chrono::{NaiveDate, NaiveTime};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::now;
use till_core::hours::{week_end, week_start, WorkedHours};
use till_core::Attendance;

/// One row of the all-users weekly report. Users without any closed
/// session that week appear with a total of zero.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserWeeklyHours {
    pub user_id: i64,
    pub username: String,
    pub full_name: String,
    pub total_hours: WorkedHours,
}

/// Repository for attendance database operations.
#[derive(Debug, Clone)]
pub struct AttendanceRepository {
    pool: SqlitePool,
}

impl AttendanceRepository {
    /// Creates a new AttendanceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AttendanceRepository { pool }
    }

    /// Records a clock-in for a user.
    ///
    /// Always inserts a new open session; an existing open session on the
    /// same date is left alone so split shifts stack up as separate rows.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - the user does not exist
    pub async fn time_in(
        &self,
        user_id: i64,
        date: NaiveDate,
        time: NaiveTime,
    ) -> DbResult<Attendance> {
        debug!(user_id, %date, %time, "Recording time-in");

        self.ensure_user(user_id).await?;

        let ts = now();

        let attendance = sqlx::query_as::<_, Attendance>(
            r#"
            INSERT INTO attendances (user_id, attendance_date, time_in, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(date)
        .bind(time)
        .bind(ts)
        .fetch_one(&self.pool)
        .await?;

        Ok(attendance)
    }

    /// Records a clock-out for a user.
    ///
    /// Closes the latest open session for (user, date) and stamps
    /// `total_hours`.
    ///
    /// ## Errors
    /// * `DbError::NoOpenSession` - no open time-in on that date
    /// * `DbError::InvalidTimeRange` - time-out precedes the time-in
    pub async fn time_out(
        &self,
        user_id: i64,
        date: NaiveDate,
        time: NaiveTime,
    ) -> DbResult<Attendance> {
        debug!(user_id, %date, %time, "Recording time-out");

        let open = self
            .find_latest_open(user_id, date)
            .await?
            .ok_or(DbError::NoOpenSession { user_id, date })?;

        if time < open.time_in {
            return Err(DbError::InvalidTimeRange {
                time_in: open.time_in,
                time_out: time,
            });
        }

        let total = WorkedHours::between(open.time_in, time);
        self.close_session(open.id, time, total).await
    }

    /// Errors with `DbError::NotFound` when the user does not exist.
    async fn ensure_user(&self, user_id: i64) -> DbResult<()> {
        sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE id = ?1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .map(|_| ())
            .ok_or_else(|| DbError::not_found("User", user_id))
    }

    /// Finds the latest open session for (user, date), if any.
    ///
    /// "Latest" is the most recently opened row. Ids are monotonically
    /// increasing, so a backdated correction entered after a later shift
    /// is still the one a clock-out targets.
    pub async fn find_latest_open(
        &self,
        user_id: i64,
        date: NaiveDate,
    ) -> DbResult<Option<Attendance>> {
        let attendance = sqlx::query_as::<_, Attendance>(
            r#"
            SELECT * FROM attendances
            WHERE user_id = ?1 AND attendance_date = ?2 AND time_out IS NULL
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attendance)
    }

    /// Closes a single session with the given time-out and total.
    async fn close_session(
        &self,
        id: i64,
        time_out: NaiveTime,
        total: WorkedHours,
    ) -> DbResult<Attendance> {
        let ts = now();

        let attendance = sqlx::query_as::<_, Attendance>(
            r#"
            UPDATE attendances SET
                time_out = ?2,
                total_hours = ?3,
                updated_at = ?4
            WHERE id = ?1 AND time_out IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(time_out)
        .bind(total)
        .bind(ts)
        .fetch_optional(&self.pool)
        .await?;

        attendance.ok_or_else(|| DbError::not_found("Attendance (open)", id))
    }

    /// Closes every still-open session on `date` at `close_time`, in one
    /// transaction. Returns how many sessions were closed.
    ///
    /// Run by the end-of-day scheduler at 23:59; sessions opened after
    /// `close_time` (clock skew) are closed with zero hours rather than a
    /// negative total.
    pub async fn close_all_open_for_date(
        &self,
        date: NaiveDate,
        close_time: NaiveTime,
    ) -> DbResult<u64> {
        let open = sqlx::query_as::<_, Attendance>(
            r#"
            SELECT * FROM attendances
            WHERE attendance_date = ?1 AND time_out IS NULL
            ORDER BY id
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        if open.is_empty() {
            return Ok(0);
        }

        let ts = now();
        let mut tx = self.pool.begin().await?;

        for session in &open {
            let total = if close_time < session.time_in {
                WorkedHours::zero()
            } else {
                WorkedHours::between(session.time_in, close_time)
            };

            sqlx::query(
                r#"
                UPDATE attendances SET
                    time_out = ?2,
                    total_hours = ?3,
                    updated_at = ?4
                WHERE id = ?1 AND time_out IS NULL
                "#,
            )
            .bind(session.id)
            .bind(close_time)
            .bind(total)
            .bind(ts)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(%date, closed = open.len(), "Auto-closed open attendance sessions");
        Ok(open.len() as u64)
    }

    /// Gets an attendance row by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Attendance>> {
        let attendance = sqlx::query_as::<_, Attendance>("SELECT * FROM attendances WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(attendance)
    }

    /// Lists a user's sessions, newest date first.
    pub async fn list_for_user(&self, user_id: i64) -> DbResult<Vec<Attendance>> {
        let rows = sqlx::query_as::<_, Attendance>(
            r#"
            SELECT * FROM attendances
            WHERE user_id = ?1
            ORDER BY attendance_date DESC, time_in DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Lists all sessions on a date.
    pub async fn list_for_date(&self, date: NaiveDate) -> DbResult<Vec<Attendance>> {
        let rows = sqlx::query_as::<_, Attendance>(
            r#"
            SELECT * FROM attendances
            WHERE attendance_date = ?1
            ORDER BY user_id, time_in, id
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Total closed hours for a user in the ISO week containing `date`.
    ///
    /// Open sessions contribute nothing until they are closed; a week with
    /// no sessions totals zero, never an error.
    pub async fn weekly_total(&self, user_id: i64, date: NaiveDate) -> DbResult<WorkedHours> {
        let start = week_start(date);
        let end = week_end(start);

        let total = sqlx::query_scalar::<_, WorkedHours>(
            r#"
            SELECT COALESCE(SUM(total_hours), 0) FROM attendances
            WHERE user_id = ?1
              AND attendance_date BETWEEN ?2 AND ?3
              AND total_hours IS NOT NULL
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    /// Weekly totals for every user, for the ISO week containing `date`.
    ///
    /// The LEFT JOIN keeps users with no sessions in the report at zero
    /// hours, sorted by full name.
    pub async fn weekly_report(&self, date: NaiveDate) -> DbResult<Vec<UserWeeklyHours>> {
        let start = week_start(date);
        let end = week_end(start);

        let rows = sqlx::query_as::<_, UserWeeklyHours>(
            r#"
            SELECT
                u.id AS user_id,
                u.username,
                u.full_name,
                COALESCE(SUM(a.total_hours), 0) AS total_hours
            FROM users u
            LEFT JOIN attendances a
                   ON a.user_id = u.id
                  AND a.attendance_date BETWEEN ?1 AND ?2
                  AND a.total_hours IS NOT NULL
            GROUP BY u.id, u.username, u.full_name
            ORDER BY u.full_name, u.id
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
