//! Route definitions for the HTTP API.

pub mod books;
pub mod choices;
pub mod docs;
pub mod health;
pub mod html;
pub mod qr;

use axum::Router;
use tower_http::services::ServeDir;

use crate::state::AppState;

/// Build the complete router with all routes.
pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .merge(health::routes())
        .merge(books::routes())
        .merge(html::routes())
        .merge(choices::routes())
        .merge(qr::routes())
        .merge(docs::routes());

    // Only serve static files when a root is configured; there is no safe
    // default path.
    if let Some(root) = state.config().static_root.clone() {
        router = router.nest_service("/static", ServeDir::new(root));
    }

    router.with_state(state)
}
