//! Health and readiness endpoint.
//!
//! The catalog starts empty and fills in once the first refresh lands, so
//! liveness and readiness are different signals: the process answers as
//! soon as it binds, but a load balancer probing this endpoint can tell an
//! empty catalog apart from a loaded one and route accordingly.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "ok" once the catalog holds books, "loading" before the first
    /// refresh completes.
    pub status: String,
    /// Books in the active dataset.
    pub books: usize,
}

/// GET /health - Liveness plus catalog readiness.
///
/// Always 200: an empty catalog is a healthy process that hasn't finished
/// its first load yet.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let books = state.catalog().n_books();
    let status = if books > 0 { "ok" } else { "loading" };
    Json(HealthResponse {
        status: status.to_string(),
        books,
    })
}

/// Build health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
