//! # Report Repository
//!
//! Read-only aggregations over recorded sale lines. Reports group by the
//! values frozen on the lines (VAT rate, snapshots), so they stay correct
//! after catalog edits and deletes.

use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::error::DbResult;
use crate::repository::sale::day_bounds;
use till_core::{Money, VatRate, WorkedHours};

/// Totals for one VAT rate bucket.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VatSummaryRow {
    pub vat_rate: VatRate,
    pub line_count: i64,
    pub quantity: i64,
    pub gross_amount: Money,
    pub vat_amount: Money,
    pub net_amount: Money,
}

/// Totals for one category bucket. Quick-sale lines and lines whose item
/// was deleted fall into the "Quick Sale" bucket; items without a
/// category land in "Uncategorized".
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummaryRow {
    pub category_name: String,
    pub line_count: i64,
    pub quantity: i64,
    pub gross_amount: Money,
}

/// Payroll line: one user's closed hours and pay over a date range.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PayrollRow {
    pub user_id: i64,
    pub full_name: String,
    pub hourly_rate: Money,
    pub total_hours: WorkedHours,
}

/// Repository for reporting queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Sales totals grouped by the VAT rate frozen on each line, over the
    /// inclusive date range.
    ///
    /// Per bucket, gross = vat + net holds exactly because it holds per
    /// line and the bucket is a straight sum.
    pub async fn vat_summary(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> DbResult<Vec<VatSummaryRow>> {
        let (start, _) = day_bounds(from);
        let (_, end) = day_bounds(to);

        let rows = sqlx::query_as::<_, VatSummaryRow>(
            r#"
            SELECT
                si.vat_rate,
                COUNT(*) AS line_count,
                COALESCE(SUM(si.quantity), 0) AS quantity,
                COALESCE(SUM(si.total_price), 0) AS gross_amount,
                COALESCE(SUM(si.vat_amount), 0) AS vat_amount,
                COALESCE(SUM(si.price_excluding_vat), 0) AS net_amount
            FROM sale_items si
            JOIN sales s ON s.id = si.sale_id
            WHERE s.sale_date BETWEEN ?1 AND ?2
            GROUP BY si.vat_rate
            ORDER BY si.vat_rate
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Sales totals grouped by category, over the inclusive date range,
    /// biggest bucket first.
    pub async fn category_summary(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> DbResult<Vec<CategorySummaryRow>> {
        let (start, _) = day_bounds(from);
        let (_, end) = day_bounds(to);

        let rows = sqlx::query_as::<_, CategorySummaryRow>(
            r#"
            SELECT
                COALESCE(
                    c.name,
                    CASE WHEN si.item_id IS NULL THEN 'Quick Sale' ELSE 'Uncategorized' END
                ) AS category_name,
                COUNT(*) AS line_count,
                COALESCE(SUM(si.quantity), 0) AS quantity,
                COALESCE(SUM(si.total_price), 0) AS gross_amount
            FROM sale_items si
            JOIN sales s ON s.id = si.sale_id
            LEFT JOIN items i ON i.id = si.item_id
            LEFT JOIN categories c ON c.id = i.category_id
            WHERE s.sale_date BETWEEN ?1 AND ?2
            GROUP BY category_name
            ORDER BY gross_amount DESC, category_name
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Closed hours per user over the inclusive date range, with the
    /// hourly rate for payroll.
    pub async fn payroll(&self, from: NaiveDate, to: NaiveDate) -> DbResult<Vec<PayrollRow>> {
        let rows = sqlx::query_as::<_, PayrollRow>(
            r#"
            SELECT
                u.id AS user_id,
                u.full_name,
                u.hourly_rate,
                COALESCE(SUM(a.total_hours), 0) AS total_hours
            FROM users u
            LEFT JOIN attendances a
                   ON a.user_id = u.id
                  AND a.attendance_date BETWEEN ?1 AND ?2
                  AND a.total_hours IS NOT NULL
            GROUP BY u.id, u.full_name, u.hourly_rate
            ORDER BY u.full_name, u.id
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::category::CategoryFields;
    use crate::repository::item::NewItem;
    use crate::repository::sale::{NewSale, NewSaleLine};
    use crate::repository::testutil::test_db;
    use till_core::PaymentMethod;

    async fn seed_sold_catalog(db: &crate::pool::Database) -> NaiveDate {
        let bakery = db
            .categories()
            .insert(&CategoryFields {
                name: "Bakery".to_string(),
                description: None,
                vat_rate: Some(VatRate::from_bps(1350)),
                display_on_pos: true,
            })
            .await
            .unwrap();

        let bread = db
            .items()
            .insert(&NewItem {
                name: "Sourdough".to_string(),
                description: None,
                price: Money::from_cents(400),
                stock_quantity: 20,
                barcode: None,
                category_id: Some(bakery.id),
                vat_rate: None,
                batch_number: None,
                expiry_date: None,
            })
            .await
            .unwrap();

        let loose = db
            .items()
            .insert(&NewItem {
                name: "Firewood".to_string(),
                description: None,
                price: Money::from_cents(650),
                stock_quantity: 10,
                barcode: None,
                category_id: None,
                vat_rate: Some(VatRate::from_bps(2300)),
                batch_number: None,
                expiry_date: None,
            })
            .await
            .unwrap();

        let date: NaiveDate = "2026-08-20".parse().unwrap();
        db.sales()
            .create(&NewSale {
                payment_method: PaymentMethod::Cash,
                user_id: None,
                discount_type: None,
                discount_value: None,
                sale_date: Some(date.and_hms_opt(11, 0, 0).unwrap()),
                lines: vec![
                    NewSaleLine {
                        item_id: Some(bread.id),
                        quantity: 2,
                        unit_price: None,
                    },
                    NewSaleLine {
                        item_id: Some(loose.id),
                        quantity: 1,
                        unit_price: None,
                    },
                    NewSaleLine {
                        item_id: None,
                        quantity: 1,
                        unit_price: Some(Money::from_cents(500)),
                    },
                ],
            })
            .await
            .unwrap();

        date
    }

    #[tokio::test]
    async fn vat_summary_buckets_by_rate() {
        let db = test_db().await;
        let date = seed_sold_catalog(&db).await;

        let rows = db.reports().vat_summary(date, date).await.unwrap();
        assert_eq!(rows.len(), 2);

        let reduced = &rows[0];
        assert_eq!(reduced.vat_rate, VatRate::from_bps(1350));
        assert_eq!(reduced.gross_amount, Money::from_cents(800));
        assert_eq!(
            reduced.vat_amount + reduced.net_amount,
            reduced.gross_amount
        );

        // 23% bucket: the firewood line plus the quick-sale line.
        let standard = &rows[1];
        assert_eq!(standard.vat_rate, VatRate::from_bps(2300));
        assert_eq!(standard.line_count, 2);
        assert_eq!(standard.gross_amount, Money::from_cents(1150));
        assert_eq!(
            standard.vat_amount + standard.net_amount,
            standard.gross_amount
        );
    }

    #[tokio::test]
    async fn category_summary_buckets_quick_and_uncategorized() {
        let db = test_db().await;
        let date = seed_sold_catalog(&db).await;

        let rows = db.reports().category_summary(date, date).await.unwrap();
        let by_name: std::collections::HashMap<&str, Money> = rows
            .iter()
            .map(|r| (r.category_name.as_str(), r.gross_amount))
            .collect();

        assert_eq!(by_name["Bakery"], Money::from_cents(800));
        assert_eq!(by_name["Uncategorized"], Money::from_cents(650));
        assert_eq!(by_name["Quick Sale"], Money::from_cents(500));
    }

    #[tokio::test]
    async fn vat_summary_is_empty_outside_range() {
        let db = test_db().await;
        seed_sold_catalog(&db).await;

        let other: NaiveDate = "2026-08-21".parse().unwrap();
        let rows = db.reports().vat_summary(other, other).await.unwrap();
        assert!(rows.is_empty());
    }
}
