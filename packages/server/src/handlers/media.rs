use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::Response;
use tracing::instrument;

use tradepost_common::storage::{BlobStore, StorageError};

use crate::error::AppError;
use crate::state::AppState;

/// Serves blobs written by the filesystem store so the public URLs it issues
/// resolve. Not part of the documented API surface.
#[instrument(skip(state))]
pub async fn serve_media(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, AppError> {
    let blob = state.blob_store.get(&path).await.map_err(|e| match e {
        StorageError::NotFound(_) | StorageError::InvalidPath(_) => {
            AppError::NotFound("Media not found".into())
        }
        other => AppError::Internal(other.to_string()),
    })?;

    Response::builder()
        .header(header::CONTENT_TYPE, blob.content_type)
        .header(header::CACHE_CONTROL, "public, max-age=86400")
        .body(Body::from(blob.data))
        .map_err(|e| AppError::Internal(format!("Response build failed: {e}")))
}
