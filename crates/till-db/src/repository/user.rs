//! # User Repository
//!
//! Database operations for staff accounts.
//!
//! Passwords are stored as argon2 hashes; hashing and verification happen
//! in the server's auth layer, this repository only moves the hash string.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::now;
use till_core::{Money, Role, User};

/// Fields for a new staff account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: Role,
    pub hourly_rate: Money,
}

/// Mutable fields of an existing account. The username is fixed at
/// creation; `password_hash` is only written when a new one is supplied.
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub active: bool,
    pub hourly_rate: Money,
    pub password_hash: Option<String>,
}

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a new user.
    ///
    /// ## Errors
    /// * `DbError::UniqueViolation` - username or email already taken
    pub async fn insert(&self, new: &NewUser) -> DbResult<User> {
        debug!(username = %new.username, "Inserting user");

        let ts = now();

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (
                username, email, password_hash, full_name,
                role, active, hourly_rate, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?7, ?7)
            RETURNING *
            "#,
        )
        .bind(&new.username)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(&new.full_name)
        .bind(new.role)
        .bind(new.hourly_rate)
        .bind(ts)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets a user by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Gets a user by login name (for authentication).
    pub async fn get_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Lists all users sorted by full name.
    pub async fn list(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY full_name, id")
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    /// Updates an existing user.
    pub async fn update(&self, id: i64, changes: &UserChanges) -> DbResult<User> {
        debug!(id, "Updating user");

        let ts = now();

        // COALESCE keeps the stored hash when no new password was supplied.
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                email = ?2,
                full_name = ?3,
                role = ?4,
                active = ?5,
                hourly_rate = ?6,
                password_hash = COALESCE(?7, password_hash),
                updated_at = ?8
            WHERE id = ?1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.email)
        .bind(&changes.full_name)
        .bind(changes.role)
        .bind(changes.active)
        .bind(changes.hourly_rate)
        .bind(&changes.password_hash)
        .bind(ts)
        .fetch_optional(&self.pool)
        .await?;

        user.ok_or_else(|| DbError::not_found("User", id))
    }

    /// Deletes a user.
    ///
    /// Fails with a foreign key violation if attendance or sale rows still
    /// reference the account; deactivate instead of deleting in that case.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }

    /// Counts all users (used by the seed binary to detect a fresh database).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::testutil::test_db;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: format!("{username}@shop.test"),
            password_hash: "hash".to_string(),
            full_name: "Pat Doyle".to_string(),
            role: Role::User,
            hourly_rate: Money::from_cents(1350),
        }
    }

    #[tokio::test]
    async fn insert_and_fetch() {
        let db = test_db().await;
        let repo = db.users();

        let created = repo.insert(&new_user("pat")).await.unwrap();
        assert!(created.id > 0);
        assert!(created.active);

        let fetched = repo.get_by_username("pat").await.unwrap().unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.hourly_rate, Money::from_cents(1350));
    }

    #[tokio::test]
    async fn duplicate_username_is_unique_violation() {
        let db = test_db().await;
        let repo = db.users();

        repo.insert(&new_user("pat")).await.unwrap();
        let mut dup = new_user("pat");
        dup.email = "other@shop.test".to_string();

        let err = repo.insert(&dup).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn update_keeps_password_when_not_supplied() {
        let db = test_db().await;
        let repo = db.users();

        let user = repo.insert(&new_user("pat")).await.unwrap();

        let updated = repo
            .update(
                user.id,
                &UserChanges {
                    email: "new@shop.test".to_string(),
                    full_name: "Pat M. Doyle".to_string(),
                    role: Role::Admin,
                    active: false,
                    hourly_rate: Money::from_cents(1500),
                    password_hash: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.password_hash, "hash");
        assert_eq!(updated.role, Role::Admin);
        assert!(!updated.active);
    }

    #[tokio::test]
    async fn update_missing_user_is_not_found() {
        let db = test_db().await;

        let err = db
            .users()
            .update(
                999,
                &UserChanges {
                    email: "x@shop.test".to_string(),
                    full_name: "X".to_string(),
                    role: Role::User,
                    active: true,
                    hourly_rate: Money::zero(),
                    password_hash: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
