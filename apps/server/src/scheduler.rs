//! End-of-day attendance scheduler.
//!
//! A background task that waits for the next local 23:59 and force-closes
//! every attendance session still open for that date. Failures are logged
//! and the loop keeps running; the next day gets another attempt and a
//! manual time-out can always fix a missed close.

use chrono::{Duration, Local};
use std::time::Duration as StdDuration;
use tracing::{debug, error, info};

use till_core::end_of_day;
use till_db::Database;

/// Runs forever, closing open sessions at 23:59 local time each day.
pub async fn run(db: Database) {
    info!("End-of-day scheduler started");

    loop {
        let wait = until_next_close();
        debug!(seconds = wait.as_secs(), "Sleeping until next end-of-day close");
        tokio::time::sleep(wait).await;

        let today = Local::now().date_naive();
        match db.attendances().close_all_open_for_date(today, end_of_day()).await {
            Ok(0) => debug!(%today, "No open sessions at end of day"),
            Ok(closed) => info!(%today, closed, "End-of-day close complete"),
            Err(err) => error!(%today, %err, "End-of-day close failed"),
        }

        // Step past the trigger minute so the next wait targets tomorrow.
        tokio::time::sleep(StdDuration::from_secs(61)).await;
    }
}

/// Time until the next local 23:59:00.
fn until_next_close() -> StdDuration {
    let now = Local::now().naive_local();
    let today_close = now.date().and_time(end_of_day());

    let target = if now < today_close {
        today_close
    } else {
        today_close + Duration::days(1)
    };

    // Clock adjustments can make this negative; fire soon instead.
    (target - now).to_std().unwrap_or(StdDuration::from_secs(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_close_is_at_most_a_day_away() {
        let wait = until_next_close();
        assert!(wait <= StdDuration::from_secs(24 * 60 * 60));
    }
}
