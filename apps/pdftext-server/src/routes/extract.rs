//! Text extraction routes
//!
//! - POST /extract-text      multipart upload, field `pdf`
//! - POST /extract-text-url  JSON `{ "url": "...", "filename": "..." }`

use axum::{
    extract::{
        multipart::{Multipart, MultipartRejection},
        rejection::JsonRejection,
        DefaultBodyLimit, State,
    },
    routing::post,
    Json, Router,
};

use crate::error::{ExtractError, Result};
use crate::pipeline::{run_remote, run_upload, UrlExtractionRequest};
use crate::response::ExtractionResponse;
use crate::state::AppState;

/// Room for multipart boundaries and part headers on top of the file itself
const MULTIPART_OVERHEAD: u64 = 64 * 1024;

/// Create the extract router
pub fn router(max_upload_size: u64) -> Router<AppState> {
    let body_limit = usize::try_from(max_upload_size.saturating_add(MULTIPART_OVERHEAD))
        .unwrap_or(usize::MAX);

    Router::new()
        .route(
            "/extract-text",
            post(extract_text).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/extract-text-url", post(extract_text_url))
}

/// Extract text from an uploaded PDF
async fn extract_text(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<ExtractionResponse>> {
    let multipart = multipart.map_err(|rejection| {
        tracing::debug!("Upload is not a multipart body: {}", rejection);
        ExtractError::MissingInput("No PDF file uploaded".to_string())
    })?;

    run_upload(&state, multipart).await.map(Json)
}

/// Extract text from a PDF at a remote URL
async fn extract_text_url(
    State(state): State<AppState>,
    payload: std::result::Result<Json<UrlExtractionRequest>, JsonRejection>,
) -> Result<Json<ExtractionResponse>> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!("Unreadable JSON body: {}", rejection);
            UrlExtractionRequest::default()
        }
    };

    run_remote(&state, request).await.map(Json)
}
