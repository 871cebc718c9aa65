//! Shared JSON response envelope.
//!
//! Every JSON route answers with `{ "message": ..., "results": ... }`;
//! `results` is omitted when there is nothing to return (errors included).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn with_results(message: impl Into<String>, results: T) -> Self {
        Self {
            message: message.into(),
            results: Some(results),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            results: None,
        }
    }
}

/// Pair an envelope with a status code for handlers that need non-200 codes.
pub fn respond<T: Serialize>(status: StatusCode, body: ApiResponse<T>) -> Response {
    (status, Json(body)).into_response()
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
