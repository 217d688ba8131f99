use sqlx::{Pool, Sqlite};
use uuid::Uuid;
use crate::db::models::User;
use crate::error::AppError;

pub struct UserRepository;

impl UserRepository {
    /// Insert a new user. A UNIQUE violation on `username` maps to
    /// `DuplicateUsername`, which also covers two racing registrations.
    pub async fn create(
        pool: &Pool<Sqlite>,
        username: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let id = Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now().timestamp();

        let user = sqlx::query_as::<_, User>(
            r#"
INSERT INTO users (id, username, password_hash, created_at)
VALUES (?, ?, ?, ?)
RETURNING *
            "#,
        )
        .bind(&id)
        .bind(username)
        .bind(password_hash)
        .bind(created_at)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            let unique = e
                .as_database_error()
                .map(|db_err| db_err.is_unique_violation())
                .unwrap_or(false);
            if unique {
                AppError::DuplicateUsername
            } else {
                AppError::Database(e)
            }
        })?;

        Ok(user)
    }

    pub async fn get_by_username(
        pool: &Pool<Sqlite>,
        username: &str,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE username = ?"
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    pub async fn exists(pool: &Pool<Sqlite>, username: &str) -> Result<bool, AppError> {
        let found: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(pool)
            .await?;

        Ok(found.is_some())
    }

    pub async fn count(pool: &Pool<Sqlite>) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn test_create_and_lookup() {
        let pool = test_pool().await;

        let user = UserRepository::create(&pool, "alice", "$argon2id$fake").await.unwrap();
        assert_eq!(user.username, "alice");

        let by_name = UserRepository::get_by_username(&pool, "alice").await.unwrap().unwrap();
        assert_eq!(by_name.id, user.id);

        assert!(UserRepository::exists(&pool, "alice").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected_by_constraint() {
        let pool = test_pool().await;

        UserRepository::create(&pool, "alice", "h1").await.unwrap();
        let err = UserRepository::create(&pool, "alice", "h2").await.unwrap_err();

        assert!(matches!(err, AppError::DuplicateUsername));
        assert_eq!(UserRepository::count(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_username_is_case_sensitive() {
        let pool = test_pool().await;

        UserRepository::create(&pool, "alice", "h1").await.unwrap();
        UserRepository::create(&pool, "Alice", "h2").await.unwrap();

        assert_eq!(UserRepository::count(&pool).await.unwrap(), 2);
        assert!(!UserRepository::exists(&pool, "ALICE").await.unwrap());
    }
}
