//! HTML-rendered query results.
//!
//! GET /books/query/html/{format} runs the same query as /books/query and
//! pushes the result through the named template. Made for small devices
//! that want a ready-to-show page rather than JSON.

use axum::{
    Router,
    extract::{Path, Query, State},
    response::Html,
    routing::get,
};

use crate::error::ApiResult;
use crate::routes::books::spec_from;
use crate::state::AppState;

/// GET /books/query/html/{format} - Query, then render through the named
/// template.
///
/// # Response
///
/// - 200 OK: rendered HTML
/// - 400 Bad Request: bad query, unknown template, or template failure
async fn book_query_html(
    State(state): State<AppState>,
    Path(format): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Html<String>> {
    let spec = spec_from(&params, &state)?;
    let result = state.catalog().query(&spec);
    let html = state.templates().render(&format, &result)?;
    Ok(Html(html))
}

/// Build HTML query routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/books/query/html/{format}", get(book_query_html))
}
