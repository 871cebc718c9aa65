//! HTTP surface of the admin gateway.

pub mod envelope;
pub mod health;
pub mod logs;
pub mod notifications;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::metrics::{metrics_handler, track_http_metrics, AppMetrics};

/// Prefix shared by every admin route.
pub const ADMIN_PREFIX: &str = "/api/v1/admin";

/// Create the log access router
pub fn create_logs_router(state: logs::LogsState) -> Router {
    Router::new()
        .route("/logs", get(logs::get_logs))
        .route("/logs/services", get(logs::get_log_services))
        .route("/logs/refresh", post(logs::refresh_logs))
        .with_state(state)
}

/// Create the notifications router
pub fn create_notifications_router(state: notifications::NotificationsState) -> Router {
    Router::new()
        .route(
            "/notifications",
            post(notifications::create_notification).get(notifications::list_notifications),
        )
        .route(
            "/notifications/:id",
            get(notifications::get_notification).delete(notifications::delete_notification),
        )
        .with_state(state)
}

/// Assemble the complete application router.
pub fn build_router(
    logs_state: logs::LogsState,
    notifications_state: notifications::NotificationsState,
    metrics: Arc<AppMetrics>,
) -> Router {
    let admin = Router::new()
        .merge(create_logs_router(logs_state))
        .merge(create_notifications_router(notifications_state));

    Router::new()
        .route("/health", get(health::health))
        .route("/metrics", get(metrics_handler).with_state(metrics.clone()))
        .nest(ADMIN_PREFIX, admin)
        .layer(middleware::from_fn_with_state(metrics, track_http_metrics))
        .layer(CorsLayer::permissive())
}
