pub mod models;
pub mod users;
pub mod sessions;

pub use models::{User, Session};
pub use users::UserRepository;
pub use sessions::SessionRepository;

use std::str::FromStr;
use std::time::Duration;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

use crate::config::Config;
use crate::error::AppError;

/// Open the SQLite pool described by `config`, creating the file if needed.
pub async fn connect(config: &Config) -> Result<Pool<Sqlite>, AppError> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.db_max_connections)
        .min_connections(config.db_min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect_with(options)
        .await?;

    Ok(pool)
}

pub async fn run_migrations(pool: &Pool<Sqlite>) -> Result<(), AppError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

#[cfg(test)]
pub(crate) async fn test_pool() -> Pool<Sqlite> {
    // A single connection keeps every query on the same in-memory database
    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        db_max_connections: 1,
        db_min_connections: 1,
        ..Config::default()
    };

    let pool = connect(&config).await.unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}
