//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use palaver_types::error::MessageError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Pipeline and query errors.
    Message(MessageError),
    /// Generic internal error.
    Internal(String),
}

impl From<MessageError> for AppError {
    fn from(e: MessageError) -> Self {
        AppError::Message(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            AppError::Message(MessageError::Validation(violations)) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                format!("validation failed: {}", violations.join("; ")),
                Some(json!(violations)),
            ),
            AppError::Message(MessageError::Conflict(id)) => (
                StatusCode::CONFLICT,
                "CONFLICT",
                format!("message with id '{id}' already exists"),
                None,
            ),
            AppError::Message(MessageError::NotFound) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "message not found".to_string(),
                None,
            ),
            AppError::Message(MessageError::Storage(detail)) => {
                // The summary goes to the log; the client gets a generic line.
                tracing::error!(error = %detail, "storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "storage failure".to_string(),
                    None,
                )
            }
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                msg,
                None,
            ),
        };

        let body = json!({
            "success": false,
            "message": message,
            "data": null,
            "error": {
                "code": code,
                "details": details,
            },
            "meta": {
                "request_id": "",
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "response_time_ms": 0
            }
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
