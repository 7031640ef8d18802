//! QR code generation.
//!
//! GET /qr renders a PNG QR code for a `url` parameter. It exists to be
//! referenced from templated `img` tags, so it does nothing beyond
//! encoding what it's given.

use std::io::Cursor;

use axum::{
    Router,
    extract::Query,
    http::header,
    response::IntoResponse,
    routing::get,
};
use image::Luma;
use qrcode::{EcLevel, QrCode};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

const MIN_SIZE: u32 = 128;
const MAX_SIZE: u32 = 1024;
const DEFAULT_SIZE: u32 = 256;

/// Query parameters for QR generation.
#[derive(Debug, Deserialize)]
pub struct QrParams {
    /// Body of the QR code. Required.
    #[serde(default)]
    pub url: Option<String>,
    /// Recovery level: l (low), m (medium, default), h (high), x (max).
    #[serde(default)]
    pub level: Option<String>,
    /// Pixel size of the (square) PNG, 128–1024. Default 256.
    #[serde(default)]
    pub size: Option<u32>,
}

fn parse_level(level: Option<&str>) -> ApiResult<EcLevel> {
    match level {
        None | Some("") => Ok(EcLevel::M),
        Some("l") => Ok(EcLevel::L),
        Some("m") => Ok(EcLevel::M),
        // The two strongest recovery levels: ~25% and ~30%.
        Some("h") => Ok(EcLevel::Q),
        Some("x") => Ok(EcLevel::H),
        Some(_) => Err(ApiError::BadRequest(
            "level parameter must be one of l,m,h,x".to_string(),
        )),
    }
}

/// GET /qr - Render a PNG QR code.
///
/// # Query Parameters
///
/// - `url`: required; the content of the code
/// - `level`: recovery level, one of l/m/h/x (default m)
/// - `size`: output pixel size in [128, 1024] (default 256)
///
/// # Response
///
/// - 200 OK: `image/png` body
/// - 400 Bad Request: missing url, bad level, or size out of range
async fn qr_code(Query(params): Query<QrParams>) -> ApiResult<impl IntoResponse> {
    let url = params
        .url
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::BadRequest("URL query parameter required".to_string()))?;

    let level = parse_level(params.level.as_deref())?;

    let size = params.size.unwrap_or(DEFAULT_SIZE);
    if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
        return Err(ApiError::BadRequest(format!(
            "size parameter must be between {MIN_SIZE} and {MAX_SIZE}"
        )));
    }

    let code = QrCode::with_error_correction_level(url.as_bytes(), level)
        .map_err(|_| ApiError::BadRequest("could not encode that URL".to_string()))?;
    let modules = code.render::<Luma<u8>>().min_dimensions(size, size).build();
    let exact = image::imageops::resize(&modules, size, size, image::imageops::FilterType::Nearest);

    let mut png = Vec::new();
    image::DynamicImage::ImageLuma8(exact)
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| ApiError::Internal(format!("png encoding failed: {e}")))?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

/// Build QR routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/qr", get(qr_code))
}
