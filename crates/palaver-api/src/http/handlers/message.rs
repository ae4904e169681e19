//! Message HTTP handlers.
//!
//! Endpoints:
//! - POST   /api/v1/messages                        - Ingest a message
//! - GET    /api/v1/sessions/{session_id}/messages  - List a session's messages
//! - GET    /api/v1/messages/search                 - Search stored content
//! - GET    /api/v1/messages/{id}                   - Get one message
//! - DELETE /api/v1/messages/{id}                   - Delete one message

use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use palaver_types::error::MessageError;
use palaver_types::message::{ChatMessage, MessageFilter, MessagePage, Sender};

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Query parameters for session message listing.
#[derive(Debug, Deserialize)]
pub struct SessionMessagesQuery {
    pub sender: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

/// Query parameters for content search.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

// Session listing and search share one page-size default.
fn default_limit() -> i64 {
    MessageFilter::DEFAULT_LIMIT
}

/// Parse an optional sender query parameter, rejecting unknown values.
fn parse_sender(raw: Option<&str>) -> Result<Option<Sender>, AppError> {
    match raw {
        Some(s) => s
            .parse::<Sender>()
            .map(Some)
            .map_err(|e| AppError::Message(MessageError::validation(e))),
        None => Ok(None),
    }
}

/// POST /api/v1/messages - Run the ingestion pipeline on a raw payload.
///
/// The body is taken as a raw JSON value so structural violations surface
/// as accumulated validation errors rather than a deserialization failure.
pub async fn create_message(
    State(state): State<AppState>,
    Json(raw): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<ApiResponse<ChatMessage>>), AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let stored = state.message_service.create_message(&raw).await?;

    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success("message created successfully", stored, request_id, elapsed);

    Ok((StatusCode::CREATED, Json(resp)))
}

/// GET /api/v1/sessions/{session_id}/messages - List a session's messages.
pub async fn get_session_messages(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Query(query): Query<SessionMessagesQuery>,
) -> Result<Json<ApiResponse<MessagePage>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let filter = MessageFilter {
        sender: parse_sender(query.sender.as_deref())?,
        limit: query.limit,
        offset: query.offset,
    };

    let result = state
        .message_service
        .messages_by_session(&session_id, filter)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(result.message, result.page, request_id, elapsed);

    Ok(Json(resp))
}

/// GET /api/v1/messages/search - Case-insensitive content search.
pub async fn search_messages(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<MessagePage>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let result = state
        .message_service
        .search_messages(&query.q, query.limit, query.offset)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(result.message, result.page, request_id, elapsed);

    Ok(Json(resp))
}

/// GET /api/v1/messages/{id} - Get one message by storage id.
pub async fn get_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<ChatMessage>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let message = state.message_service.message_by_id(id).await?;

    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(
        "message retrieved successfully",
        message,
        request_id,
        elapsed,
    );

    Ok(Json(resp))
}

/// DELETE /api/v1/messages/{id} - Delete one message by storage id.
pub async fn delete_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    state.message_service.delete_message(id).await?;

    let elapsed = start.elapsed().as_millis() as u64;

    let resp = ApiResponse::success(
        "message deleted successfully",
        serde_json::json!({"deleted": true, "id": id}),
        request_id,
        elapsed,
    );

    Ok(Json(resp))
}
