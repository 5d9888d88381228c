use crate::errors::ApiError;
use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::path::PathBuf;
use tokio_util::io::ReaderStream;

/// Sends a regular file, streaming it above the configured threshold and
/// buffering it below. The caller has already confirmed the path names a
/// regular file; a race with deletion surfaces as 404.
pub async fn serve_from_disk(
    path: PathBuf,
    streaming_threshold_bytes: u64,
) -> Result<Response, ApiError> {
    let mime_type = mime_guess::from_path(&path).first_or_octet_stream();

    let size = match tokio::fs::metadata(&path).await {
        Ok(meta) => meta.len(),
        Err(e) => {
            tracing::warn!("could not stat '{}': {}", path.display(), e);
            return Err(ApiError::NotFound);
        }
    };

    let body = if size > streaming_threshold_bytes {
        tracing::debug!("streaming '{}' ({} bytes)", path.display(), size);
        let file = tokio::fs::File::open(&path).await.map_err(|e| {
            tracing::warn!("could not open '{}': {}", path.display(), e);
            ApiError::NotFound
        })?;
        Body::from_stream(ReaderStream::new(file))
    } else {
        let content = tokio::fs::read(&path).await.map_err(|e| {
            tracing::warn!("could not read '{}': {}", path.display(), e);
            ApiError::NotFound
        })?;
        Body::from(content)
    };

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, mime_type.to_string())],
        body,
    )
        .into_response())
}
