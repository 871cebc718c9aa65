//! Database repository for admin notifications.
//!
//! All SQLite read/write logic lives here; the notification handlers only
//! validate input and shape responses.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};

/// A single stored notification row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub title: String,
    pub body: String,
    /// `None` means the notification is a broadcast.
    pub recipient: Option<String>,
    pub created_at: String,
}

/// Repository for reading and writing notifications to SQLite.
pub struct NotificationRepository {
    pool: SqlitePool,
}

impl NotificationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new notification. Returns the new row id.
    pub async fn insert(
        &self,
        title: &str,
        body: &str,
        recipient: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        let created_at = Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO notifications (title, body, recipient, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(title)
        .bind(body)
        .bind(recipient)
        .bind(&created_at)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// List notifications newest first. `limit` is clamped to 1..=100.
    pub async fn list(&self, limit: i64) -> Result<Vec<Notification>, sqlx::Error> {
        let limit = limit.clamp(1, 100);

        let rows = sqlx::query(
            "SELECT id, title, body, recipient, created_at
             FROM notifications
             ORDER BY id DESC
             LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|row| row_to_notification(&row)).collect()
    }

    /// Fetch a single notification by id.
    pub async fn get(&self, id: i64) -> Result<Option<Notification>, sqlx::Error> {
        let row = sqlx::query(
            "SELECT id, title, body, recipient, created_at FROM notifications WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| row_to_notification(&row)).transpose()
    }

    /// Delete a notification. Returns `true` if a row was removed.
    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_notification(row: &sqlx::sqlite::SqliteRow) -> Result<Notification, sqlx::Error> {
    Ok(Notification {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        body: row.try_get("body")?,
        recipient: row.try_get("recipient")?,
        created_at: row.try_get("created_at")?,
    })
}
