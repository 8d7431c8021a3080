mod migrations;
mod models;
mod repository;

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;

use crate::error::AppError;

pub use migrations::run_migrations;
pub use models::TrackedUser;
pub use repository::Repository;

#[cfg(test)]
pub(crate) use repository::tests::memory_repository;

/// Open the pool, creating the database file on first start.
pub async fn connect(database_url: &str) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await?;

    info!(database_url, "📜 Database connected");
    Ok(pool)
}
