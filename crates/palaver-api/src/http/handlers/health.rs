//! Health check endpoints.
//!
//! - GET /health          - Liveness: static ok + version
//! - GET /health/detailed - Readiness: DB probe + store counters

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::state::AppState;

/// GET /health - Simple health check endpoint.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /health/detailed - Health check with a store connectivity probe.
///
/// Returns 503 with `"status": "degraded"` when the database probe fails.
/// Counters are best-effort and report null rather than failing the probe.
pub async fn health_detailed(
    State(state): State<AppState>,
) -> (StatusCode, Json<serde_json::Value>) {
    let database = match sqlx::query("SELECT 1").fetch_one(&state.db_pool.reader).await {
        Ok(_) => "connected",
        Err(e) => {
            tracing::warn!(error = %e, "database health probe failed");
            "error"
        }
    };

    let stats = state.message_service.store_stats().await.ok();

    let (status, code) = if database == "connected" {
        ("ok", StatusCode::OK)
    } else {
        ("degraded", StatusCode::SERVICE_UNAVAILABLE)
    };

    let body = serde_json::json!({
        "status": status,
        "version": env!("CARGO_PKG_VERSION"),
        "database": database,
        "messages": stats.as_ref().map(|s| s.total_messages),
        "sessions": stats.as_ref().map(|s| s.total_sessions),
        "flagged": stats.as_ref().map(|s| s.flagged_messages),
    });

    (code, Json(body))
}
