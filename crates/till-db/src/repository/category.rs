//! # Category Repository
//!
//! Database operations for item categories. Deleting a category detaches
//! its items (`category_id` goes NULL via the foreign key) rather than
//! deleting them.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::now;
use till_core::{Category, VatRate};

/// Fields for a new or updated category.
#[derive(Debug, Clone)]
pub struct CategoryFields {
    pub name: String,
    pub description: Option<String>,
    /// Rate items inherit when they do not set their own.
    pub vat_rate: Option<VatRate>,
    pub display_on_pos: bool,
}

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Inserts a new category.
    ///
    /// ## Errors
    /// * `DbError::UniqueViolation` - name already taken
    pub async fn insert(&self, fields: &CategoryFields) -> DbResult<Category> {
        debug!(name = %fields.name, "Inserting category");

        let ts = now();

        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, description, vat_rate, display_on_pos, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            RETURNING *
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.vat_rate)
        .bind(fields.display_on_pos)
        .bind(ts)
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    /// Gets a category by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(category)
    }

    /// Lists all categories sorted by name.
    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        Ok(categories)
    }

    /// Lists categories flagged for the POS quick grid.
    pub async fn list_pos_visible(&self) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE display_on_pos = 1 ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Updates an existing category.
    pub async fn update(&self, id: i64, fields: &CategoryFields) -> DbResult<Category> {
        debug!(id, "Updating category");

        let ts = now();

        let category = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories SET
                name = ?2,
                description = ?3,
                vat_rate = ?4,
                display_on_pos = ?5,
                updated_at = ?6
            WHERE id = ?1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.vat_rate)
        .bind(fields.display_on_pos)
        .bind(ts)
        .fetch_optional(&self.pool)
        .await?;

        category.ok_or_else(|| DbError::not_found("Category", id))
    }

    /// Deletes a category. Items keep existing with `category_id` NULL.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
