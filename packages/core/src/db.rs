//! SQLite pool construction.
//!
//! The schema is small enough to apply inline on every connect; all
//! statements are idempotent.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

const SCHEMA: &[&str] = &["CREATE TABLE IF NOT EXISTS notifications (
        id         INTEGER PRIMARY KEY AUTOINCREMENT,
        title      TEXT    NOT NULL,
        body       TEXT    NOT NULL,
        recipient  TEXT,
        created_at TEXT    NOT NULL
    )"];

/// Open a pool for `database_url` and apply the schema.
///
/// In-memory databases are limited to one connection, since every SQLite
/// `:memory:` connection is a separate database. That connection is never
/// retired for idleness or age, or the data would go with it.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let in_memory = database_url.contains(":memory:");
    let max_connections = if in_memory { 1 } else { 5 };

    let mut pool_options = SqlitePoolOptions::new().max_connections(max_connections);
    if in_memory {
        pool_options = pool_options
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }

    let pool = pool_options.connect_with(options).await?;

    for statement in SCHEMA {
        sqlx::query(statement).execute(&pool).await?;
    }

    tracing::info!("Database ready ({} connection(s) max)", max_connections);
    Ok(pool)
}
