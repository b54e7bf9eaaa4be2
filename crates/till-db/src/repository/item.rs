//! # Item Repository
//!
//! Database operations for catalog items.
//!
//! ## VAT Resolution
//! The effective rate is fixed at write time, not sale time:
//! ```text
//!   explicit rate on the item
//!     └─ else the category's rate
//!          └─ else the flat 23.00% default
//! ```
//! Sale lines then snapshot whatever the item carried when it was sold.
//!
//! ## Stock
//! `stock_quantity` never goes negative. Decrements are conditional
//! updates (`WHERE stock_quantity >= delta`); a miss means insufficient
//! stock and the caller's transaction rolls back.

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::now;
use till_core::{Item, Money, VatRate};

/// Fields for a new or updated item. `vat_rate` of `None` means "inherit
/// from the category, else the default".
#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    pub stock_quantity: i64,
    pub barcode: Option<String>,
    pub category_id: Option<i64>,
    pub vat_rate: Option<VatRate>,
    pub batch_number: Option<String>,
    pub expiry_date: Option<NaiveDate>,
}

/// Repository for item database operations.
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    /// Creates a new ItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Resolves the effective VAT rate for the given explicit rate and
    /// category reference.
    async fn resolve_vat(
        &self,
        explicit: Option<VatRate>,
        category_id: Option<i64>,
    ) -> DbResult<VatRate> {
        let category_rate = match category_id {
            Some(id) => sqlx::query_scalar::<_, Option<VatRate>>(
                "SELECT vat_rate FROM categories WHERE id = ?1",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .flatten(),
            None => None,
        };

        Ok(VatRate::resolve(explicit, category_rate))
    }

    /// Inserts a new item.
    ///
    /// ## Errors
    /// * `DbError::UniqueViolation` - barcode already taken
    /// * `DbError::ForeignKeyViolation` - unknown category
    pub async fn insert(&self, new: &NewItem) -> DbResult<Item> {
        debug!(name = %new.name, "Inserting item");

        let vat_rate = self.resolve_vat(new.vat_rate, new.category_id).await?;
        let ts = now();

        let item = sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items (
                name, description, price, stock_quantity, barcode,
                category_id, vat_rate, batch_number, expiry_date,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
            RETURNING *
            "#,
        )
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.price)
        .bind(new.stock_quantity)
        .bind(&new.barcode)
        .bind(new.category_id)
        .bind(vat_rate)
        .bind(&new.batch_number)
        .bind(new.expiry_date)
        .bind(ts)
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    /// Gets an item by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Item>> {
        let item = sqlx::query_as::<_, Item>("SELECT * FROM items WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    /// Gets an item by barcode (the POS scan path).
    pub async fn get_by_barcode(&self, barcode: &str) -> DbResult<Option<Item>> {
        let item = sqlx::query_as::<_, Item>("SELECT * FROM items WHERE barcode = ?1")
            .bind(barcode)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    /// Lists all items sorted by name.
    pub async fn list(&self) -> DbResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>("SELECT * FROM items ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Lists items in a category.
    pub async fn list_by_category(&self, category_id: i64) -> DbResult<Vec<Item>> {
        let items =
            sqlx::query_as::<_, Item>("SELECT * FROM items WHERE category_id = ?1 ORDER BY name")
                .bind(category_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(items)
    }

    /// Searches items by name or barcode substring.
    pub async fn search(&self, term: &str) -> DbResult<Vec<Item>> {
        let pattern = format!("%{}%", term.trim());

        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT * FROM items
            WHERE name LIKE ?1 OR barcode LIKE ?1
            ORDER BY name
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists items at or below the given stock threshold.
    pub async fn list_low_stock(&self, threshold: i64) -> DbResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(
            "SELECT * FROM items WHERE stock_quantity <= ?1 ORDER BY stock_quantity, name",
        )
        .bind(threshold)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists items whose expiry date falls on or before the given date.
    pub async fn list_expiring_before(&self, date: NaiveDate) -> DbResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT * FROM items
            WHERE expiry_date IS NOT NULL AND expiry_date <= ?1
            ORDER BY expiry_date, name
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Updates an existing item. The VAT rate is re-resolved against the
    /// (possibly changed) category.
    pub async fn update(&self, id: i64, fields: &NewItem) -> DbResult<Item> {
        debug!(id, "Updating item");

        let vat_rate = self.resolve_vat(fields.vat_rate, fields.category_id).await?;
        let ts = now();

        let item = sqlx::query_as::<_, Item>(
            r#"
            UPDATE items SET
                name = ?2,
                description = ?3,
                price = ?4,
                stock_quantity = ?5,
                barcode = ?6,
                category_id = ?7,
                vat_rate = ?8,
                batch_number = ?9,
                expiry_date = ?10,
                updated_at = ?11
            WHERE id = ?1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.price)
        .bind(fields.stock_quantity)
        .bind(&fields.barcode)
        .bind(fields.category_id)
        .bind(vat_rate)
        .bind(&fields.batch_number)
        .bind(fields.expiry_date)
        .bind(ts)
        .fetch_optional(&self.pool)
        .await?;

        item.ok_or_else(|| DbError::not_found("Item", id))
    }

    /// Adjusts stock by a signed delta.
    ///
    /// Decrements are conditional so stock can never go below zero; a
    /// decrement past the available quantity fails with
    /// `DbError::InsufficientStock` and changes nothing.
    pub async fn adjust_stock(&self, id: i64, delta: i64) -> DbResult<Item> {
        debug!(id, delta, "Adjusting stock");

        let current = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Item", id))?;

        let ts = now();

        let updated = sqlx::query_as::<_, Item>(
            r#"
            UPDATE items SET
                stock_quantity = stock_quantity + ?2,
                updated_at = ?3
            WHERE id = ?1 AND stock_quantity + ?2 >= 0
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(delta)
        .bind(ts)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or(DbError::InsufficientStock {
            name: current.name,
            available: current.stock_quantity,
            requested: -delta,
        })
    }

    /// Deletes an item. Historical sale lines keep their snapshots and get
    /// `item_id` NULL through the foreign key.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM items WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::category::CategoryFields;
    use crate::repository::testutil::test_db;

    fn amber_leaf() -> NewItem {
        NewItem {
            name: "Amber Leaf".to_string(),
            description: None,
            price: Money::from_cents(1250),
            stock_quantity: 50,
            barcode: Some("123456789".to_string()),
            category_id: None,
            vat_rate: None,
            batch_number: None,
            expiry_date: None,
        }
    }

    #[tokio::test]
    async fn vat_defaults_to_standard_rate() {
        let db = test_db().await;

        let item = db.items().insert(&amber_leaf()).await.unwrap();
        assert_eq!(item.vat_rate, VatRate::from_bps(2300));
    }

    #[tokio::test]
    async fn vat_inherits_from_category() {
        let db = test_db().await;

        let cat = db
            .categories()
            .insert(&CategoryFields {
                name: "Bakery".to_string(),
                description: None,
                vat_rate: Some(VatRate::from_bps(1350)),
                display_on_pos: false,
            })
            .await
            .unwrap();

        let mut fields = amber_leaf();
        fields.category_id = Some(cat.id);
        let item = db.items().insert(&fields).await.unwrap();
        assert_eq!(item.vat_rate, VatRate::from_bps(1350));

        // Explicit rate still wins over the category.
        fields.vat_rate = Some(VatRate::zero());
        fields.barcode = Some("987654321".to_string());
        let item = db.items().insert(&fields).await.unwrap();
        assert_eq!(item.vat_rate, VatRate::zero());
    }

    #[tokio::test]
    async fn barcode_lookup() {
        let db = test_db().await;

        db.items().insert(&amber_leaf()).await.unwrap();
        let found = db.items().get_by_barcode("123456789").await.unwrap();
        assert_eq!(found.unwrap().name, "Amber Leaf");

        assert!(db.items().get_by_barcode("000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn adjust_stock_rejects_going_negative() {
        let db = test_db().await;

        let item = db.items().insert(&amber_leaf()).await.unwrap();

        let after = db.items().adjust_stock(item.id, -50).await.unwrap();
        assert_eq!(after.stock_quantity, 0);

        let err = db.items().adjust_stock(item.id, -1).await.unwrap_err();
        assert!(matches!(err, DbError::InsufficientStock { available: 0, .. }));

        // Unchanged after the failed decrement.
        let current = db.items().get_by_id(item.id).await.unwrap().unwrap();
        assert_eq!(current.stock_quantity, 0);
    }

    #[tokio::test]
    async fn low_stock_filter() {
        let db = test_db().await;
        let repo = db.items();

        let mut few = amber_leaf();
        few.stock_quantity = 2;
        few.barcode = None;
        repo.insert(&few).await.unwrap();
        repo.insert(&amber_leaf()).await.unwrap();

        let low = repo.list_low_stock(5).await.unwrap();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].stock_quantity, 2);
    }
}
