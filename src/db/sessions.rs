use sqlx::{Pool, Sqlite};
use uuid::Uuid;
use crate::db::models::Session;
use crate::error::AppError;

pub struct SessionRepository;

impl SessionRepository {
    pub async fn create(
        pool: &Pool<Sqlite>,
        user_id: &str,
        username: &str,
        expiry_hours: i64,
    ) -> Result<Session, AppError> {
        let id = Uuid::new_v4().to_string();
        let token = Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now().timestamp();
        let expires_at = created_at + (expiry_hours * 3600);

        let session = sqlx::query_as::<_, Session>(
            r#"
INSERT INTO sessions (id, token, user_id, username, expires_at, created_at)
VALUES (?, ?, ?, ?, ?, ?)
RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&token)
        .bind(user_id)
        .bind(username)
        .bind(expires_at)
        .bind(created_at)
        .fetch_one(pool)
        .await?;

        Ok(session)
    }

    /// Live sessions only; an expired token resolves to `None`.
    pub async fn get_by_token(
        pool: &Pool<Sqlite>,
        token: &str,
    ) -> Result<Option<Session>, AppError> {
        let now = chrono::Utc::now().timestamp();

        let session = sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions WHERE token = ? AND expires_at > ?"
        )
        .bind(token)
        .bind(now)
        .fetch_optional(pool)
        .await?;

        Ok(session)
    }

    /// Returns whether a row was removed. Deleting an unknown token is not an error.
    pub async fn delete(
        pool: &Pool<Sqlite>,
        token: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn cleanup_expired(pool: &Pool<Sqlite>) -> Result<u64, AppError> {
        let now = chrono::Utc::now().timestamp();

        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(now)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}
