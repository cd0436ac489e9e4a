use std::path::{Component, Path as FsPath};

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use tracing::instrument;

use crate::error::AppError;
use crate::state::AppState;

/// Reject any path that could escape the media root once joined.
fn is_safe_relative(path: &str) -> bool {
    let path = FsPath::new(path);
    path.components()
        .all(|c| matches!(c, Component::Normal(_)))
}

#[instrument(skip(state))]
pub async fn serve_media(
    State(state): State<AppState>,
    Path(file_path): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !is_safe_relative(&file_path) {
        return Err(AppError::PermissionDenied);
    }

    let full_path = state.config.media.root.join(&file_path);

    let content = match tokio::fs::read(&full_path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound("File not found".to_string()));
        }
        Err(e) => return Err(AppError::Internal(format!("IO error: {}", e))),
    };

    let mime = mime_guess::from_path(&full_path).first_or_octet_stream();

    Response::builder()
        .header(header::CONTENT_TYPE, mime.as_ref())
        .header(header::CACHE_CONTROL, "public, max-age=3600")
        .body(Body::from(content))
        .map_err(|e| AppError::Internal(e.to_string()))
}
