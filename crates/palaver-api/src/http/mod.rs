//! HTTP/REST API layer for Palaver.
//!
//! Axum-based REST API at `/api/v1/` with an envelope response format,
//! CORS support, and root-level health probes.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
