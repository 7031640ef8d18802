//! Documentation page and the deliberately unfriendly root.

use axum::{
    Router,
    http::StatusCode,
    response::Html,
    routing::get,
};

use crate::state::AppState;

const DOC_TEXT: &str = r#"
<h1>Bookshelf</h1>
<p>This service serves catalog data for a small, freely shareable book
collection — the digital equivalent of the little book boxes on street
corners. Query it at /books/query; see /choices for the vocabulary the
active dataset supports.
</p>
"#;

/// GET / - returns 400 to discourage random discovery probes.
async fn root() -> (StatusCode, &'static str) {
    (StatusCode::BAD_REQUEST, "Go away.")
}

/// GET /doc - a short documentation page.
async fn doc() -> Html<&'static str> {
    Html(DOC_TEXT)
}

/// Build documentation routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(root)).route("/doc", get(doc))
}
