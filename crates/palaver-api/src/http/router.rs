//! Axum router configuration with middleware.
//!
//! Message routes are under `/api/v1/`; health probes live at the root.
//! Middleware: CORS, tracing.

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Ingestion pipeline
        .route("/messages", post(handlers::message::create_message))
        // Retrieval
        .route("/messages/search", get(handlers::message::search_messages))
        .route("/messages/{id}", get(handlers::message::get_message))
        .route("/messages/{id}", delete(handlers::message::delete_message))
        .route(
            "/sessions/{session_id}/messages",
            get(handlers::message::get_session_messages),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
