//! CRUD endpoints for admin notifications.
//!
//! Routes:
//! - `POST   /api/v1/admin/notifications`: create a notification
//! - `GET    /api/v1/admin/notifications`: list, newest first
//! - `GET    /api/v1/admin/notifications/:id`: fetch one
//! - `DELETE /api/v1/admin/notifications/:id`: delete one

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::envelope::{respond, ApiResponse};
use crate::error::AppError;
use crate::repository::{Notification, NotificationRepository};

/// Shared state for the notification routes.
pub type NotificationsState = Arc<NotificationRepository>;

// ---- Request / response shapes ----

#[derive(Debug, Deserialize)]
pub struct CreateNotificationRequest {
    pub title: String,
    pub body: String,
    pub recipient: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateNotificationResponse {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ListNotificationsQuery {
    pub limit: Option<i64>,
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Notification {} not found", id))
}

// ---- Handlers ----

/// `POST /api/v1/admin/notifications`
pub async fn create_notification(
    State(repo): State<NotificationsState>,
    payload: Result<Json<CreateNotificationRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(body) = payload?;
    if body.title.trim().is_empty() || body.body.trim().is_empty() {
        return Err(AppError::BadRequest(
            "title and body must not be empty".to_string(),
        ));
    }

    let recipient = body.recipient.as_deref().filter(|r| !r.trim().is_empty());
    let id = repo.insert(body.title.trim(), &body.body, recipient).await?;
    tracing::info!("Created notification {}", id);

    Ok(respond(
        StatusCode::CREATED,
        ApiResponse::with_results(
            "Notification created",
            CreateNotificationResponse { id },
        ),
    ))
}

/// `GET /api/v1/admin/notifications`. `limit` defaults to 20, clamped to 100.
pub async fn list_notifications(
    State(repo): State<NotificationsState>,
    query: Result<Query<ListNotificationsQuery>, QueryRejection>,
) -> Result<ApiResponse<Vec<Notification>>, AppError> {
    let Query(params) = query?;
    let notifications = repo.list(params.limit.unwrap_or(20)).await?;
    Ok(ApiResponse::with_results(
        "Notifications retrieved successfully",
        notifications,
    ))
}

/// `GET /api/v1/admin/notifications/:id`
pub async fn get_notification(
    State(repo): State<NotificationsState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<ApiResponse<Notification>, AppError> {
    let Path(id) = path?;
    let notification = repo.get(id).await?.ok_or_else(|| not_found(id))?;
    Ok(ApiResponse::with_results(
        "Notification retrieved successfully",
        notification,
    ))
}

/// `DELETE /api/v1/admin/notifications/:id`
pub async fn delete_notification(
    State(repo): State<NotificationsState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Response, AppError> {
    let Path(id) = path?;
    if repo.delete(id).await? {
        tracing::info!("Deleted notification {}", id);
        Ok(StatusCode::NO_CONTENT.into_response())
    } else {
        Err(not_found(id))
    }
}
