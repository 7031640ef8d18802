//! Query-vocabulary discovery.
//!
//! GET /choices/{field} returns the values actually present in the active
//! dataset for the fields a query can constrain. Everything here depends
//! on what ingest kept: a language filtered out at load time never shows
//! up as a choice.

use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};

use bookshelf_ingest::content_types;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// GET /choices/{field} - Values present in the dataset for a field.
///
/// - `types`: record types, as a sorted array
/// - `languages`: language codes, as a sorted array
/// - `formats`: the friendly-name → MIME submap for formats on hand
///
/// # Response
///
/// - 200 OK: array or map of choices
/// - 400 Bad Request: unrecognized field name
async fn choices(
    State(state): State<AppState>,
    Path(field): Path<String>,
) -> ApiResult<axum::response::Response> {
    let stats = state.catalog().stats();
    match field.as_str() {
        "types" | "type" | "typ" => {
            let mut types: Vec<&String> = stats.types.keys().collect();
            types.sort();
            Ok(Json(types).into_response())
        }
        "languages" | "language" | "lang" => {
            let mut langs: Vec<&String> = stats.languages.keys().collect();
            langs.sort();
            Ok(Json(langs).into_response())
        }
        "formats" | "format" | "fmt" => {
            // Formats in the dataset carry charset parameters; the table
            // maps friendly names to bare MIME prefixes.
            let on_hand: HashMap<&str, &str> = content_types()
                .iter()
                .filter(|(_, mime)| stats.formats.keys().any(|f| f.starts_with(**mime)))
                .map(|(name, mime)| (*name, *mime))
                .collect();
            Ok(Json(on_hand).into_response())
        }
        _ => Err(ApiError::BadRequest("unrecognized field name".to_string())),
    }
}

/// Build choices routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/choices/{field}", get(choices))
}
