//! Book query endpoints.
//!
//! This module implements the JSON query surface:
//! - GET /books/query - books matching the query parameters
//! - GET /books/count - how many books would match, ignoring paging
//! - GET /books/stats - aggregate statistics for the active dataset
//! - GET /book/details/{*id} - one book by its (slash-bearing) ID
//!
//! Query parameters are translated by the request adapter in
//! `bookshelf-catalog`; this module only wires HTTP to it.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};

use bookshelf_catalog::{CatalogStats, ConstraintSpec, constraint_spec_from_params};
use bookshelf_core::EBook;

use crate::error::ApiResult;
use crate::state::AppState;

/// Builds a constraint spec from raw query pairs, bounded by the
/// configured maximum limit.
pub(crate) fn spec_from(
    params: &[(String, String)],
    state: &AppState,
) -> ApiResult<ConstraintSpec> {
    let spec = constraint_spec_from_params(
        params.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        state.config().max_limit,
    )?;
    Ok(spec)
}

/// GET /books/query - Run a query and return the matching books.
///
/// # Response
///
/// - 200 OK: JSON array of books
/// - 400 Bad Request: malformed constraint, limit, or page
async fn book_query(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Json<Vec<EBook>>> {
    let spec = spec_from(&params, &state)?;
    let result = state.catalog().query(&spec);
    tracing::debug!(hits = result.len(), "query completed");
    Ok(Json(result))
}

/// GET /books/count - Count the books a query would match.
///
/// Ignores `limit`, `page`, and `random`: the count is over the whole
/// match set.
async fn book_count(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Json<usize>> {
    let spec = spec_from(&params, &state)?;
    Ok(Json(state.catalog().count(&spec)))
}

/// GET /books/stats - Aggregate statistics over the active dataset.
async fn book_stats(State(state): State<AppState>) -> Json<CatalogStats> {
    Json(state.catalog().stats())
}

/// GET /book/details/{*id} - Fetch one book by ID.
///
/// Book IDs are resource URIs containing slashes, so the whole trailing
/// path is the ID.
///
/// # Response
///
/// - 200 OK: the book
/// - 404 Not Found: no such ID in the active dataset
async fn book_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<EBook>> {
    state
        .catalog()
        .get(&id)
        .map(Json)
        .ok_or_else(|| crate::error::ApiError::NotFound(format!("no book found with id {id}")))
}

/// Build book query routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/books/query", get(book_query))
        .route("/books/count", get(book_count))
        .route("/books/stats", get(book_stats))
        .route("/book/details/{*id}", get(book_details))
}
