//! Log access endpoints.
//!
//! Routes:
//! - `GET  /api/v1/admin/logs`: filtered, newest-first log entries
//! - `GET  /api/v1/admin/logs/services`: distinct service names
//! - `POST /api/v1/admin/logs/refresh`: reload the store from the source
//!
//! Query strings are validated here; the query engine only ever sees a
//! well-typed [`LogFilter`].

use std::sync::Arc;

use axum::extract::{rejection::QueryRejection, Query, State};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use tokio::sync::RwLock;

use super::envelope::ApiResponse;
use crate::error::AppError;
use crate::logs::parser::parse_timestamp;
use crate::logs::{LogEntry, LogFilter, LogLevel, LogSource};
use crate::metrics::AppMetrics;
use crate::scheduler::refresh_once;
use crate::store::LogStore;

/// Upper bound applied to client-supplied limits before querying.
pub const MAX_LOG_LIMIT: usize = 100;

/// Shared state type for the logs routes.
pub type LogsState = Arc<LogsApiState>;

#[derive(Clone)]
pub struct LogsApiState {
    pub store: Arc<RwLock<LogStore>>,
    pub source: Option<Arc<dyn LogSource + Send + Sync>>,
    pub metrics: Option<Arc<AppMetrics>>,
}

/// Raw query parameters, exactly as received.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogQueryParams {
    pub service: Option<String>,
    pub level: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub search_term: Option<String>,
    pub limit: Option<String>,
}

/// Empty strings count as "not provided".
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Accepts RFC 3339 instants or bare `YYYY-MM-DD` dates (midnight UTC).
fn parse_query_date(field: &str, raw: &str) -> Result<DateTime<Utc>, AppError> {
    if let Ok(date) = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    parse_timestamp(raw).ok_or_else(|| {
        AppError::BadRequest(format!(
            "Invalid {} '{}'. Expected an ISO-8601 date or timestamp",
            field, raw
        ))
    })
}

impl LogQueryParams {
    /// Validate raw parameters into a [`LogFilter`].
    pub fn into_filter(self) -> Result<LogFilter, AppError> {
        let level = non_empty(self.level)
            .map(|raw| raw.parse::<LogLevel>().map_err(AppError::BadRequest))
            .transpose()?;

        let start_date = non_empty(self.start_date)
            .map(|raw| parse_query_date("startDate", &raw))
            .transpose()?;
        let end_date = non_empty(self.end_date)
            .map(|raw| parse_query_date("endDate", &raw))
            .transpose()?;

        if let (Some(start), Some(end)) = (start_date, end_date) {
            if start >= end {
                return Err(AppError::BadRequest(
                    "startDate must be earlier than endDate".to_string(),
                ));
            }
        }

        let limit = non_empty(self.limit)
            .map(|raw| {
                raw.trim().parse::<usize>().map_err(|_| {
                    AppError::BadRequest(format!(
                        "Invalid limit '{}'. Must be a non-negative integer",
                        raw
                    ))
                })
            })
            .transpose()?
            .map(|limit| limit.min(MAX_LOG_LIMIT));

        Ok(LogFilter {
            service: non_empty(self.service),
            level,
            start_date,
            end_date,
            search_term: non_empty(self.search_term),
            limit,
        })
    }
}

/// `GET /api/v1/admin/logs`
pub async fn get_logs(
    State(state): State<LogsState>,
    query: Result<Query<LogQueryParams>, QueryRejection>,
) -> Result<ApiResponse<Vec<LogEntry>>, AppError> {
    let Query(params) = query?;
    let filter = params.into_filter()?;
    let results = state.store.read().await.query(&filter);

    if let Some(metrics) = state.metrics.as_ref() {
        metrics.log_queries_total.inc();
    }
    tracing::debug!("Log query {:?} matched {} entries", filter, results.len());

    Ok(ApiResponse::with_results(
        "Logs retrieved successfully",
        results,
    ))
}

/// `GET /api/v1/admin/logs/services`
pub async fn get_log_services(
    State(state): State<LogsState>,
) -> Result<ApiResponse<Vec<String>>, AppError> {
    let services = match state.source.as_ref() {
        Some(source) => source.list_services().await?,
        None => state.store.read().await.services(),
    };

    Ok(ApiResponse::with_results(
        "Log services retrieved successfully",
        services,
    ))
}

/// `POST /api/v1/admin/logs/refresh`
pub async fn refresh_logs(
    State(state): State<LogsState>,
) -> Result<ApiResponse<usize>, AppError> {
    let source = state
        .source
        .as_ref()
        .ok_or_else(|| AppError::Config("Log source missing from logs state".to_string()))?;

    let loaded = refresh_once(source, &state.store, state.metrics.as_deref())
        .await
        .ok_or_else(|| AppError::Internal("Log refresh failed".to_string()))?;

    Ok(ApiResponse::with_results("Logs refreshed", loaded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        routing::get,
        Router,
    };
    use chrono::TimeZone;
    use serde_json::Value;
    use tower::ServiceExt;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
    }

    fn entry(hour: u32, service: &str, level: LogLevel, message: &str) -> LogEntry {
        LogEntry {
            timestamp: at(hour),
            service: service.to_string(),
            level,
            message: message.to_string(),
        }
    }

    fn make_state(entries: Vec<LogEntry>) -> LogsState {
        let mut store = LogStore::new(1_000);
        store.replace(entries);
        Arc::new(LogsApiState {
            store: Arc::new(RwLock::new(store)),
            source: None,
            metrics: None,
        })
    }

    fn make_app(entries: Vec<LogEntry>) -> Router {
        Router::new()
            .route("/logs", get(get_logs))
            .route("/logs/services", get(get_log_services))
            .with_state(make_state(entries))
    }

    async fn call(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn sample() -> Vec<LogEntry> {
        vec![
            entry(1, "api", LogLevel::Info, "user logged in"),
            entry(3, "api-error", LogLevel::Error, "TypeError: boom"),
            entry(2, "worker", LogLevel::Warn, "queue slow"),
        ]
    }

    // ---- parameter validation ----

    #[test]
    fn empty_params_produce_empty_filter() {
        let filter = LogQueryParams::default().into_filter().unwrap();
        assert_eq!(filter, LogFilter::default());
    }

    #[test]
    fn blank_strings_are_treated_as_absent() {
        let params = LogQueryParams {
            service: Some("".into()),
            level: Some(" ".into()),
            limit: Some("".into()),
            ..Default::default()
        };
        assert_eq!(params.into_filter().unwrap(), LogFilter::default());
    }

    #[test]
    fn limit_is_clamped_to_maximum() {
        let params = LogQueryParams {
            limit: Some("5000".into()),
            ..Default::default()
        };
        assert_eq!(params.into_filter().unwrap().limit, Some(MAX_LOG_LIMIT));
    }

    #[test]
    fn negative_limit_is_rejected() {
        let params = LogQueryParams {
            limit: Some("-1".into()),
            ..Default::default()
        };
        assert!(matches!(params.into_filter(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn bare_date_means_midnight_utc() {
        let params = LogQueryParams {
            start_date: Some("2024-05-01".into()),
            ..Default::default()
        };
        assert_eq!(params.into_filter().unwrap().start_date, Some(at(0)));
    }

    #[test]
    fn inverted_date_range_is_rejected() {
        let params = LogQueryParams {
            start_date: Some("2024-05-02".into()),
            end_date: Some("2024-05-01".into()),
            ..Default::default()
        };
        assert!(matches!(params.into_filter(), Err(AppError::BadRequest(_))));
    }

    // ---- routes ----

    #[tokio::test]
    async fn get_logs_returns_envelope_newest_first() {
        let (status, json) = call(make_app(sample()), "/logs").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Logs retrieved successfully");
        let results = json["results"].as_array().unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0]["service"], "api-error");
        assert_eq!(results[0]["level"], "ERROR");
        assert_eq!(results[2]["service"], "api");
    }

    #[tokio::test]
    async fn get_logs_applies_all_filters() {
        let uri = "/logs?level=warn&startDate=2024-05-01T01:00:00Z&endDate=2024-05-01T03:00:00Z&searchTerm=queue&limit=10";
        let (status, json) = call(make_app(sample()), uri).await;

        assert_eq!(status, StatusCode::OK);
        let results = json["results"].as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["service"], "worker");
    }

    #[tokio::test]
    async fn get_logs_with_zero_limit_returns_empty_results() {
        let (status, json) = call(make_app(sample()), "/logs?limit=0").await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["results"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_logs_invalid_level_returns_400() {
        let (status, json) = call(make_app(sample()), "/logs?level=debug").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["message"].as_str().unwrap().contains("Invalid level"));
        assert!(json.get("results").is_none());
    }

    #[tokio::test]
    async fn get_logs_invalid_date_returns_400() {
        let (status, _) = call(make_app(sample()), "/logs?startDate=yesterday").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_logs_malformed_query_returns_400_envelope() {
        let (status, json) = call(make_app(sample()), "/logs?service=api&service=worker").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["message"].is_string());
        assert!(json.get("results").is_none());
    }

    #[tokio::test]
    async fn get_log_services_falls_back_to_store() {
        let (status, json) = call(make_app(sample()), "/logs/services").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["results"], serde_json::json!(["api", "api-error", "worker"]));
    }

    #[tokio::test]
    async fn refresh_without_source_returns_500() {
        let app = Router::new()
            .route("/logs/refresh", axum::routing::post(refresh_logs))
            .with_state(make_state(Vec::new()));
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/logs/refresh")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
