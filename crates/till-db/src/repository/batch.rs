//! # Batch Repository
//!
//! Database operations for delivery batches. Batches hang off an item and
//! are deleted with it (cascade); their purpose is expiry tracking, they
//! do not participate in stock arithmetic.

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::now;
use till_core::Batch;

/// Fields for a new or updated batch.
#[derive(Debug, Clone)]
pub struct BatchFields {
    pub item_id: i64,
    pub batch_id: String,
    pub quantity: i64,
    pub expiry_date: Option<NaiveDate>,
    pub manufacture_date: Option<NaiveDate>,
    pub received_date: Option<NaiveDate>,
    pub supplier_id: Option<String>,
}

/// Repository for batch database operations.
#[derive(Debug, Clone)]
pub struct BatchRepository {
    pool: SqlitePool,
}

impl BatchRepository {
    /// Creates a new BatchRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BatchRepository { pool }
    }

    /// Inserts a new batch.
    ///
    /// ## Errors
    /// * `DbError::ForeignKeyViolation` - unknown item
    pub async fn insert(&self, fields: &BatchFields) -> DbResult<Batch> {
        debug!(item_id = fields.item_id, batch_id = %fields.batch_id, "Inserting batch");

        let ts = now();

        let batch = sqlx::query_as::<_, Batch>(
            r#"
            INSERT INTO batches (
                item_id, batch_id, quantity,
                expiry_date, manufacture_date, received_date, supplier_id,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
            RETURNING *
            "#,
        )
        .bind(fields.item_id)
        .bind(&fields.batch_id)
        .bind(fields.quantity)
        .bind(fields.expiry_date)
        .bind(fields.manufacture_date)
        .bind(fields.received_date)
        .bind(&fields.supplier_id)
        .bind(ts)
        .fetch_one(&self.pool)
        .await?;

        Ok(batch)
    }

    /// Gets a batch by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Batch>> {
        let batch = sqlx::query_as::<_, Batch>("SELECT * FROM batches WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(batch)
    }

    /// Lists all batches for an item, soonest expiry first.
    pub async fn list_for_item(&self, item_id: i64) -> DbResult<Vec<Batch>> {
        let batches = sqlx::query_as::<_, Batch>(
            r#"
            SELECT * FROM batches
            WHERE item_id = ?1
            ORDER BY expiry_date IS NULL, expiry_date, id
            "#,
        )
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(batches)
    }

    /// Lists batches expiring on or before the given date.
    pub async fn list_expiring_before(&self, date: NaiveDate) -> DbResult<Vec<Batch>> {
        let batches = sqlx::query_as::<_, Batch>(
            r#"
            SELECT * FROM batches
            WHERE expiry_date IS NOT NULL AND expiry_date <= ?1
            ORDER BY expiry_date, id
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(batches)
    }

    /// Updates an existing batch.
    pub async fn update(&self, id: i64, fields: &BatchFields) -> DbResult<Batch> {
        debug!(id, "Updating batch");

        let ts = now();

        let batch = sqlx::query_as::<_, Batch>(
            r#"
            UPDATE batches SET
                item_id = ?2,
                batch_id = ?3,
                quantity = ?4,
                expiry_date = ?5,
                manufacture_date = ?6,
                received_date = ?7,
                supplier_id = ?8,
                updated_at = ?9
            WHERE id = ?1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(fields.item_id)
        .bind(&fields.batch_id)
        .bind(fields.quantity)
        .bind(fields.expiry_date)
        .bind(fields.manufacture_date)
        .bind(fields.received_date)
        .bind(&fields.supplier_id)
        .bind(ts)
        .fetch_optional(&self.pool)
        .await?;

        batch.ok_or_else(|| DbError::not_found("Batch", id))
    }

    /// Deletes a batch.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM batches WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Batch", id));
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
    use crate::repository::testutil::{seed_item, test_db};

    #[tokio::test]
    async fn batch_requires_existing_item() {
        let db = test_db().await;

        let err = db
            .batches()
            .insert(&BatchFields {
                item_id: 999,
                batch_id: "B-1".to_string(),
                quantity: 10,
                expiry_date: None,
                manufacture_date: None,
                received_date: None,
                supplier_id: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn expiry_ordering_and_filter() {
        let db = test_db().await;
        let item_id = seed_item(&db, "Milk", 150, 20).await;

        let d = |s: &str| s.parse::<NaiveDate>().unwrap();
        for (label, expiry) in [("B-2", Some(d("2026-09-01"))), ("B-1", Some(d("2026-08-25"))), ("B-3", None)] {
            db.batches()
                .insert(&BatchFields {
                    item_id,
                    batch_id: label.to_string(),
                    quantity: 5,
                    expiry_date: expiry,
                    manufacture_date: None,
                    received_date: None,
                    supplier_id: Some("DAIRY-CO".to_string()),
                })
                .await
                .unwrap();
        }

        let for_item = db.batches().list_for_item(item_id).await.unwrap();
        assert_eq!(
            for_item.iter().map(|b| b.batch_id.as_str()).collect::<Vec<_>>(),
            ["B-1", "B-2", "B-3"]
        );

        let expiring = db
            .batches()
            .list_expiring_before(d("2026-08-31"))
            .await
            .unwrap();
        assert_eq!(expiring.len(), 1);
        assert_eq!(expiring[0].batch_id, "B-1");
    }

    #[tokio::test]
    async fn deleting_item_cascades_to_batches() {
        let db = test_db().await;
        let item_id = seed_item(&db, "Milk", 150, 20).await;

        let batch = db
            .batches()
            .insert(&BatchFields {
                item_id,
                batch_id: "B-1".to_string(),
                quantity: 5,
                expiry_date: None,
                manufacture_date: None,
                received_date: None,
                supplier_id: None,
            })
            .await
            .unwrap();

        db.items().delete(item_id).await.unwrap();
        assert!(db.batches().get_by_id(batch.id).await.unwrap().is_none());
    }
}
