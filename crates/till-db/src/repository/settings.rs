//! # Company Settings Repository
//!
//! The company record is a singleton; `save` inserts on first write and
//! updates in place afterwards.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::now;
use till_core::CompanySettings;

/// Repository for the company settings singleton.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    /// Creates a new SettingsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository { pool }
    }

    /// Gets the company settings, if any have been saved.
    pub async fn get(&self) -> DbResult<Option<CompanySettings>> {
        let settings = sqlx::query_as::<_, CompanySettings>(
            "SELECT * FROM company_settings ORDER BY id LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(settings)
    }

    /// Saves the company settings, creating the row on first use.
    pub async fn save(
        &self,
        company_name: &str,
        address: Option<&str>,
    ) -> DbResult<CompanySettings> {
        debug!(company_name, "Saving company settings");

        let ts = now();

        let settings = match self.get().await? {
            Some(existing) => {
                sqlx::query_as::<_, CompanySettings>(
                    r#"
                    UPDATE company_settings SET
                        company_name = ?2,
                        address = ?3,
                        updated_at = ?4
                    WHERE id = ?1
                    RETURNING *
                    "#,
                )
                .bind(existing.id)
                .bind(company_name)
                .bind(address)
                .bind(ts)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, CompanySettings>(
                    r#"
                    INSERT INTO company_settings (company_name, address, created_at, updated_at)
                    VALUES (?1, ?2, ?3, ?3)
                    RETURNING *
                    "#,
                )
                .bind(company_name)
                .bind(address)
                .bind(ts)
                .fetch_one(&self.pool)
                .await?
            }
        };

        Ok(settings)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::repository::testutil::test_db;

    #[tokio::test]
    async fn save_is_singleton_upsert() {
        let db = test_db().await;
        let repo = db.settings();

        assert!(repo.get().await.unwrap().is_none());

        let first = repo.save("Corner Shop", Some("1 Main St")).await.unwrap();
        let second = repo.save("Corner Shop Ltd", None).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.company_name, "Corner Shop Ltd");
        assert_eq!(second.address, None);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM company_settings")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
