//! # Sale Repository
//!
//! Sale transactions with their line items and stock effects.
//!
//! ## Stock Effects
//! ```text
//!   create   conditional decrement per catalog line, inside one
//!            transaction; any shortfall rolls the whole sale back
//!   delete   restores stock for surviving catalog items, then the
//!            cascade removes the lines
//!   update   replaces lines and totals, NO stock effects at all
//! ```
//! The update asymmetry is deliberate: corrections to a recorded sale
//! (wrong payment method, mistyped price) must not move inventory that
//! already left the shop.
//!
//! ## Snapshot Pattern
//! Each line freezes the item's name, barcode, batch and VAT rate at sale
//! time. Receipts and reports stay stable when the catalog changes later;
//! quick-sale lines carry the fixed "Quick Sale" snapshot and no item
//! reference.

use chrono::{NaiveDate, NaiveDateTime};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::now;
use till_core::{DiscountType, Item, Money, PaymentMethod, Sale, SaleItem, VatRate};

// =============================================================================
// Inputs and Outputs
// =============================================================================

/// One requested line on a new sale.
#[derive(Debug, Clone)]
pub struct NewSaleLine {
    /// Catalog item to sell, or `None` for a quick-sale line.
    pub item_id: Option<i64>,
    pub quantity: i64,
    /// Price override in cents. Quick-sale lines must carry one; catalog
    /// lines default to the item's current price.
    pub unit_price: Option<Money>,
}

/// A sale to record.
#[derive(Debug, Clone)]
pub struct NewSale {
    pub payment_method: PaymentMethod,
    pub user_id: Option<i64>,
    pub discount_type: Option<DiscountType>,
    pub discount_value: Option<i64>,
    /// Defaults to the current local time when absent.
    pub sale_date: Option<NaiveDateTime>,
    pub lines: Vec<NewSaleLine>,
}

/// A sale together with its lines.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SaleWithItems {
    #[serde(flatten)]
    pub sale: Sale,
    pub items: Vec<SaleItem>,
}

/// Daily sales totals, split by payment method. Serializes with the wire
/// names receipt clients expect (`reportDate`, `totalSales`, `cashSales`,
/// `cardSales`).
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReport {
    pub report_date: NaiveDate,
    /// Number of sales in the day.
    pub total_sales: i64,
    pub total_amount: Money,
    /// Number of cash sales.
    pub cash_sales: i64,
    pub cash_amount: Money,
    /// Number of card sales.
    pub card_sales: i64,
    pub card_amount: Money,
}

#[derive(sqlx::FromRow)]
struct DailyTotalsRow {
    sale_count: i64,
    total_amount: Money,
    cash_amount: Money,
    cash_count: i64,
    card_amount: Money,
    card_count: i64,
}

/// A resolved line, ready to insert.
struct ResolvedLine {
    item_id: Option<i64>,
    quantity: i64,
    unit_price: Money,
    total_price: Money,
    item_name: String,
    item_barcode: Option<String>,
    batch_id: Option<String>,
    vat_rate: VatRate,
    vat_amount: Money,
    price_excluding_vat: Money,
}

impl ResolvedLine {
    /// Builds a line from a catalog item snapshot.
    fn from_item(item: &Item, quantity: i64, price_override: Option<Money>) -> Self {
        let unit_price = price_override.unwrap_or(item.price);
        let total_price = unit_price.multiply_quantity(quantity);
        let vat_amount = total_price.vat_portion(item.vat_rate);

        ResolvedLine {
            item_id: Some(item.id),
            quantity,
            unit_price,
            total_price,
            item_name: item.name.clone(),
            item_barcode: item.barcode.clone(),
            batch_id: item.batch_number.clone(),
            vat_rate: item.vat_rate,
            vat_amount,
            price_excluding_vat: total_price - vat_amount,
        }
    }

    /// Builds a quick-sale line: no catalog item, no stock effect, the
    /// standard VAT rate.
    fn quick_sale(quantity: i64, unit_price: Money) -> Self {
        let total_price = unit_price.multiply_quantity(quantity);
        let vat_rate = VatRate::default();
        let vat_amount = total_price.vat_portion(vat_rate);

        ResolvedLine {
            item_id: None,
            quantity,
            unit_price,
            total_price,
            item_name: "Quick Sale".to_string(),
            item_barcode: Some("N/A".to_string()),
            batch_id: None,
            vat_rate,
            vat_amount,
            price_excluding_vat: total_price - vat_amount,
        }
    }
}

/// Computes the informational discount amount stored on the sale.
///
/// The discount is metadata on the receipt; the sale total is always the
/// sum of line totals.
fn discount_amount(
    subtotal: Money,
    discount_type: Option<DiscountType>,
    discount_value: Option<i64>,
) -> Option<Money> {
    match (discount_type, discount_value) {
        (Some(DiscountType::Percentage), Some(bps)) => {
            // Half-up at two decimals, same as VAT extraction.
            let cents = (2 * subtotal.cents() as i128 * bps as i128 + 10_000) / 20_000;
            Some(Money::from_cents(cents as i64))
        }
        (Some(DiscountType::Amount), Some(cents)) => Some(Money::from_cents(cents)),
        _ => None,
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Records a sale.
    ///
    /// Runs in a single transaction: each catalog line decrements stock
    /// with a conditional update, the sale row and its lines are inserted,
    /// and everything commits together. Any failure (unknown item, stock
    /// shortfall) rolls the whole sale back, stock included.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - the cashier or a line's item is unknown
    /// * `DbError::InsufficientStock` - a line asks for more than is left
    pub async fn create(&self, new: &NewSale) -> DbResult<SaleWithItems> {
        debug!(lines = new.lines.len(), method = ?new.payment_method, "Creating sale");

        let ts = now();
        let sale_date = new.sale_date.unwrap_or(ts);

        let mut tx = self.pool.begin().await?;
        ensure_user(&mut tx, new.user_id).await?;

        let mut resolved = Vec::with_capacity(new.lines.len());

        for line in &new.lines {
            match line.item_id {
                Some(item_id) => {
                    let item = fetch_item(&mut tx, item_id).await?;
                    decrement_stock(&mut tx, &item, line.quantity, ts).await?;
                    resolved.push(ResolvedLine::from_item(&item, line.quantity, line.unit_price));
                }
                None => {
                    let unit_price = line.unit_price.unwrap_or(Money::zero());
                    resolved.push(ResolvedLine::quick_sale(line.quantity, unit_price));
                }
            }
        }

        let subtotal: Money = resolved.iter().map(|l| l.total_price).sum();
        let discount = discount_amount(subtotal, new.discount_type, new.discount_value);

        let sale = sqlx::query_as::<_, Sale>(
            r#"
            INSERT INTO sales (
                total_amount, subtotal_amount,
                discount_amount, discount_type, discount_value,
                sale_date, payment_method, user_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            RETURNING *
            "#,
        )
        .bind(subtotal)
        .bind(subtotal)
        .bind(discount)
        .bind(new.discount_type)
        .bind(new.discount_value)
        .bind(sale_date)
        .bind(new.payment_method)
        .bind(new.user_id)
        .fetch_one(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(resolved.len());
        for line in &resolved {
            items.push(insert_line(&mut tx, sale.id, line).await?);
        }

        tx.commit().await?;

        debug!(id = sale.id, total = %sale.total_amount, "Sale recorded");
        Ok(SaleWithItems { sale, items })
    }

    /// Deletes a sale and restores stock for its catalog lines.
    ///
    /// Lines whose item was deleted from the catalog in the meantime have
    /// nothing to restock and are skipped. The cascade removes the lines
    /// with the sale row.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting sale");

        let ts = now();
        let mut tx = self.pool.begin().await?;

        let lines = sqlx::query_as::<_, SaleItem>("SELECT * FROM sale_items WHERE sale_id = ?1")
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;

        for line in &lines {
            if let Some(item_id) = line.item_id {
                sqlx::query(
                    r#"
                    UPDATE items SET
                        stock_quantity = stock_quantity + ?2,
                        updated_at = ?3
                    WHERE id = ?1
                    "#,
                )
                .bind(item_id)
                .bind(line.quantity)
                .bind(ts)
                .execute(&mut *tx)
                .await?;
            }
        }

        let result = sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", id));
        }

        tx.commit().await?;
        Ok(())
    }

    /// Rewrites a recorded sale: header fields and a full replacement of
    /// its lines. Stock is not touched in either direction.
    ///
    /// Replacement lines referencing a catalog item re-snapshot its current
    /// name, price and VAT rate.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - the sale, the cashier or a line's item is
    ///   unknown
    pub async fn update(&self, id: i64, changes: &NewSale) -> DbResult<SaleWithItems> {
        debug!(id, "Updating sale");

        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, Sale>("SELECT * FROM sales WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::not_found("Sale", id))?;

        ensure_user(&mut tx, changes.user_id).await?;

        let mut resolved = Vec::with_capacity(changes.lines.len());
        for line in &changes.lines {
            match line.item_id {
                Some(item_id) => {
                    let item = fetch_item(&mut tx, item_id).await?;
                    resolved.push(ResolvedLine::from_item(&item, line.quantity, line.unit_price));
                }
                None => {
                    let unit_price = line.unit_price.unwrap_or(Money::zero());
                    resolved.push(ResolvedLine::quick_sale(line.quantity, unit_price));
                }
            }
        }

        let subtotal: Money = resolved.iter().map(|l| l.total_price).sum();
        let discount = discount_amount(subtotal, changes.discount_type, changes.discount_value);
        let sale_date = changes.sale_date.unwrap_or(existing.sale_date);

        sqlx::query("DELETE FROM sale_items WHERE sale_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let sale = sqlx::query_as::<_, Sale>(
            r#"
            UPDATE sales SET
                total_amount = ?2,
                subtotal_amount = ?3,
                discount_amount = ?4,
                discount_type = ?5,
                discount_value = ?6,
                sale_date = ?7,
                payment_method = ?8,
                user_id = ?9
            WHERE id = ?1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(subtotal)
        .bind(subtotal)
        .bind(discount)
        .bind(changes.discount_type)
        .bind(changes.discount_value)
        .bind(sale_date)
        .bind(changes.payment_method)
        .bind(changes.user_id)
        .fetch_one(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(resolved.len());
        for line in &resolved {
            items.push(insert_line(&mut tx, sale.id, line).await?);
        }

        tx.commit().await?;
        Ok(SaleWithItems { sale, items })
    }

    /// Gets a sale with its lines.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<SaleWithItems>> {
        let sale = sqlx::query_as::<_, Sale>("SELECT * FROM sales WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match sale {
            Some(sale) => {
                let items = self.get_items(sale.id).await?;
                Ok(Some(SaleWithItems { sale, items }))
            }
            None => Ok(None),
        }
    }

    /// Gets all lines for a sale.
    pub async fn get_items(&self, sale_id: i64) -> DbResult<Vec<SaleItem>> {
        let items = sqlx::query_as::<_, SaleItem>(
            "SELECT * FROM sale_items WHERE sale_id = ?1 ORDER BY id",
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists sales newest first, up to `limit`.
    pub async fn list(&self, limit: u32) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            "SELECT * FROM sales ORDER BY sale_date DESC, id DESC LIMIT ?1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Lists sales in a date-time range, oldest first.
    pub async fn list_between(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT * FROM sales
            WHERE sale_date BETWEEN ?1 AND ?2
            ORDER BY sale_date, id
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Daily totals for `date`, over the closed range 00:00:00 to
    /// 23:59:59, optionally filtered to one cashier.
    pub async fn daily_report(
        &self,
        date: NaiveDate,
        user_id: Option<i64>,
    ) -> DbResult<DailyReport> {
        let (start, end) = day_bounds(date);

        let row = sqlx::query_as::<_, DailyTotalsRow>(
            r#"
            SELECT
                COUNT(*) AS sale_count,
                COALESCE(SUM(total_amount), 0) AS total_amount,
                COALESCE(SUM(CASE WHEN payment_method = 'CASH' THEN total_amount END), 0) AS cash_amount,
                COALESCE(SUM(payment_method = 'CASH'), 0) AS cash_count,
                COALESCE(SUM(CASE WHEN payment_method = 'CARD' THEN total_amount END), 0) AS card_amount,
                COALESCE(SUM(payment_method = 'CARD'), 0) AS card_count
            FROM sales
            WHERE sale_date BETWEEN ?1 AND ?2
              AND (?3 IS NULL OR user_id = ?3)
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(DailyReport {
            report_date: date,
            total_sales: row.sale_count,
            total_amount: row.total_amount,
            cash_sales: row.cash_count,
            cash_amount: row.cash_amount,
            card_sales: row.card_count,
            card_amount: row.card_amount,
        })
    }
}

/// Start and end of the report day (inclusive bounds).
pub(crate) fn day_bounds(date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = date.and_hms_opt(0, 0, 0).unwrap_or_default();
    let end = date.and_hms_opt(23, 59, 59).unwrap_or_default();
    (start, end)
}

/// Resolves an optional cashier reference; an unknown id is NotFound, not
/// a foreign key conflict from the insert.
async fn ensure_user(tx: &mut Transaction<'_, Sqlite>, user_id: Option<i64>) -> DbResult<()> {
    let Some(user_id) = user_id else {
        return Ok(());
    };

    sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE id = ?1")
        .bind(user_id)
        .fetch_optional(&mut **tx)
        .await?
        .map(|_| ())
        .ok_or_else(|| DbError::not_found("User", user_id))
}

async fn fetch_item(tx: &mut Transaction<'_, Sqlite>, id: i64) -> DbResult<Item> {
    sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = ?1")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| DbError::not_found("Item", id))
}

/// Conditional decrement; a miss means the shelf is short and the whole
/// sale rolls back.
async fn decrement_stock(
    tx: &mut Transaction<'_, Sqlite>,
    item: &Item,
    quantity: i64,
    ts: NaiveDateTime,
) -> DbResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE items SET
            stock_quantity = stock_quantity - ?2,
            updated_at = ?3
        WHERE id = ?1 AND stock_quantity >= ?2
        "#,
    )
    .bind(item.id)
    .bind(quantity)
    .bind(ts)
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InsufficientStock {
            name: item.name.clone(),
            available: item.stock_quantity,
            requested: quantity,
        });
    }

    Ok(())
}

async fn insert_line(
    tx: &mut Transaction<'_, Sqlite>,
    sale_id: i64,
    line: &ResolvedLine,
) -> DbResult<SaleItem> {
    let item = sqlx::query_as::<_, SaleItem>(
        r#"
        INSERT INTO sale_items (
            sale_id, item_id, quantity, unit_price, total_price,
            item_name, item_barcode, batch_id,
            vat_rate, vat_amount, price_excluding_vat
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        RETURNING *
        "#,
    )
    .bind(sale_id)
    .bind(line.item_id)
    .bind(line.quantity)
    .bind(line.unit_price)
    .bind(line.total_price)
    .bind(&line.item_name)
    .bind(&line.item_barcode)
    .bind(&line.batch_id)
    .bind(line.vat_rate)
    .bind(line.vat_amount)
    .bind(line.price_excluding_vat)
    .fetch_one(&mut **tx)
    .await?;

    Ok(item)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::testutil::{seed_item, seed_user, test_db};

    fn catalog_line(item_id: i64, quantity: i64) -> NewSaleLine {
        NewSaleLine {
            item_id: Some(item_id),
            quantity,
            unit_price: None,
        }
    }

    fn cash_sale(lines: Vec<NewSaleLine>) -> NewSale {
        NewSale {
            payment_method: PaymentMethod::Cash,
            user_id: None,
            discount_type: None,
            discount_value: None,
            sale_date: None,
            lines,
        }
    }

    async fn stock_of(db: &crate::pool::Database, item_id: i64) -> i64 {
        db.items()
            .get_by_id(item_id)
            .await
            .unwrap()
            .unwrap()
            .stock_quantity
    }

    #[tokio::test]
    async fn create_decrements_stock_and_totals_lines() {
        let db = test_db().await;
        let item_id = seed_item(&db, "Amber Leaf", 1250, 50).await;

        let sale = db
            .sales()
            .create(&cash_sale(vec![catalog_line(item_id, 2)]))
            .await
            .unwrap();

        assert_eq!(sale.sale.total_amount, Money::from_cents(2500));
        assert_eq!(sale.sale.subtotal_amount, Money::from_cents(2500));
        assert_eq!(sale.items.len(), 1);

        let line = &sale.items[0];
        assert_eq!(line.item_name, "Amber Leaf");
        assert_eq!(line.unit_price, Money::from_cents(1250));
        // 2500 * 2300 / 12300 = 467.48 -> 467
        assert_eq!(line.vat_amount, Money::from_cents(467));
        assert_eq!(line.price_excluding_vat, Money::from_cents(2033));

        assert_eq!(stock_of(&db, item_id).await, 48);
    }

    #[tokio::test]
    async fn insufficient_stock_rejects_and_changes_nothing() {
        let db = test_db().await;
        let item_id = seed_item(&db, "Amber Leaf", 400, 5).await;

        let err = db
            .sales()
            .create(&cash_sale(vec![catalog_line(item_id, 6)]))
            .await
            .unwrap_err();

        match err {
            DbError::InsufficientStock {
                available,
                requested,
                ..
            } => {
                assert_eq!(available, 5);
                assert_eq!(requested, 6);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        assert_eq!(stock_of(&db, item_id).await, 5);
        assert!(db.sales().list(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn shortfall_on_second_line_rolls_back_first() {
        let db = test_db().await;
        let tobacco = seed_item(&db, "Amber Leaf", 1250, 50).await;
        let scarce = seed_item(&db, "Camel", 900, 1).await;

        let err = db
            .sales()
            .create(&cash_sale(vec![
                catalog_line(tobacco, 3),
                catalog_line(scarce, 2),
            ]))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::InsufficientStock { .. }));

        // First line's decrement must have rolled back.
        assert_eq!(stock_of(&db, tobacco).await, 50);
        assert_eq!(stock_of(&db, scarce).await, 1);
    }

    #[tokio::test]
    async fn quick_sale_line_has_snapshot_and_no_stock_effect() {
        let db = test_db().await;

        let sale = db
            .sales()
            .create(&cash_sale(vec![NewSaleLine {
                item_id: None,
                quantity: 1,
                unit_price: Some(Money::from_cents(750)),
            }]))
            .await
            .unwrap();

        let line = &sale.items[0];
        assert_eq!(line.item_id, None);
        assert_eq!(line.item_name, "Quick Sale");
        assert_eq!(line.item_barcode.as_deref(), Some("N/A"));
        assert_eq!(line.vat_rate, VatRate::from_bps(2300));
        // 750 * 2300 / 12300 = 140.24 -> 140
        assert_eq!(line.vat_amount, Money::from_cents(140));
        assert_eq!(sale.sale.total_amount, Money::from_cents(750));
    }

    #[tokio::test]
    async fn delete_restores_stock_and_removes_lines() {
        let db = test_db().await;
        let item_id = seed_item(&db, "Amber Leaf", 1250, 50).await;

        let sale = db
            .sales()
            .create(&cash_sale(vec![catalog_line(item_id, 4)]))
            .await
            .unwrap();
        assert_eq!(stock_of(&db, item_id).await, 46);

        db.sales().delete(sale.sale.id).await.unwrap();

        assert_eq!(stock_of(&db, item_id).await, 50);
        assert!(db.sales().get_by_id(sale.sale.id).await.unwrap().is_none());
        assert!(db.sales().get_items(sale.sale.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_missing_sale_is_not_found() {
        let db = test_db().await;
        let err = db.sales().delete(999).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn update_replaces_lines_without_touching_stock() {
        let db = test_db().await;
        let item_id = seed_item(&db, "Amber Leaf", 1250, 50).await;

        let sale = db
            .sales()
            .create(&cash_sale(vec![catalog_line(item_id, 2)]))
            .await
            .unwrap();
        assert_eq!(stock_of(&db, item_id).await, 48);

        let mut changes = cash_sale(vec![catalog_line(item_id, 5)]);
        changes.payment_method = PaymentMethod::Card;
        let updated = db.sales().update(sale.sale.id, &changes).await.unwrap();

        assert_eq!(updated.sale.payment_method, PaymentMethod::Card);
        assert_eq!(updated.sale.total_amount, Money::from_cents(6250));
        assert_eq!(updated.items.len(), 1);
        assert_eq!(updated.items[0].quantity, 5);

        // Stock reflects only the original sale's decrement.
        assert_eq!(stock_of(&db, item_id).await, 48);
    }

    #[tokio::test]
    async fn discount_is_metadata_only() {
        let db = test_db().await;
        let item_id = seed_item(&db, "Amber Leaf", 1000, 50).await;

        let mut new = cash_sale(vec![catalog_line(item_id, 1)]);
        new.discount_type = Some(DiscountType::Percentage);
        new.discount_value = Some(1000); // 10.00%

        let sale = db.sales().create(&new).await.unwrap();
        assert_eq!(sale.sale.discount_amount, Some(Money::from_cents(100)));
        // The total is still the line total.
        assert_eq!(sale.sale.total_amount, Money::from_cents(1000));
    }

    #[tokio::test]
    async fn daily_report_splits_cash_and_card() {
        let db = test_db().await;
        let item_id = seed_item(&db, "Amber Leaf", 1000, 50).await;
        let user_id = seed_user(&db, "pat").await;

        let date: NaiveDate = "2026-08-20".parse().unwrap();
        let at = |h: u32| date.and_hms_opt(h, 0, 0).unwrap();

        for (method, hour, uid) in [
            (PaymentMethod::Cash, 9, Some(user_id)),
            (PaymentMethod::Card, 12, Some(user_id)),
            (PaymentMethod::Cash, 18, None),
        ] {
            let mut new = cash_sale(vec![catalog_line(item_id, 1)]);
            new.payment_method = method;
            new.user_id = uid;
            new.sale_date = Some(at(hour));
            db.sales().create(&new).await.unwrap();
        }

        // Outside the report day.
        let mut other_day = cash_sale(vec![catalog_line(item_id, 1)]);
        other_day.sale_date = Some("2026-08-21T00:00:00".parse().unwrap());
        db.sales().create(&other_day).await.unwrap();

        let report = db.sales().daily_report(date, None).await.unwrap();
        assert_eq!(report.total_sales, 3);
        assert_eq!(report.cash_amount, Money::from_cents(2000));
        assert_eq!(report.card_amount, Money::from_cents(1000));
        assert_eq!(report.cash_sales, 2);
        assert_eq!(report.card_sales, 1);
        assert_eq!(
            report.cash_amount + report.card_amount,
            report.total_amount
        );

        let mine = db.sales().daily_report(date, Some(user_id)).await.unwrap();
        assert_eq!(mine.total_sales, 2);
        assert_eq!(mine.total_amount, Money::from_cents(2000));

        // Wire names receipt clients parse.
        let json = serde_json::to_value(&report).unwrap();
        for key in [
            "reportDate",
            "totalSales",
            "totalAmount",
            "cashSales",
            "cashAmount",
            "cardSales",
            "cardAmount",
        ] {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
    }

    #[tokio::test]
    async fn unknown_cashier_is_not_found() {
        let db = test_db().await;
        let item_id = seed_item(&db, "Amber Leaf", 1250, 50).await;

        let mut new = cash_sale(vec![catalog_line(item_id, 2)]);
        new.user_id = Some(999);

        let err = db.sales().create(&new).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
        assert_eq!(stock_of(&db, item_id).await, 50);

        // Reassigning a recorded sale to an unknown cashier fails the same
        // way.
        new.user_id = None;
        let sale = db.sales().create(&new).await.unwrap();
        let mut changes = cash_sale(vec![catalog_line(item_id, 1)]);
        changes.user_id = Some(999);
        let err = db.sales().update(sale.sale.id, &changes).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
