use super::{disk, validator};
use crate::errors::ApiError;
use crate::handlers::models::AppState;
use axum::{extract::State, response::Response};
use varia_negotiator::path::percent_decode;

/// Serves the request path from the first configured root that has it as a
/// regular file. Runs after negotiation, so the URI already names a concrete
/// variant when one was available.
pub async fn serve_file(
    State(state): State<AppState>,
    uri: axum::http::Uri,
) -> Result<Response, ApiError> {
    let requested_path = percent_decode(uri.path().trim_start_matches('/'));
    tracing::debug!("serve_file: requested_path = '{}'", requested_path);

    validator::validate_request_path(&requested_path)?;

    for root in state.roots.iter() {
        let full_path = root.join(&requested_path);
        match tokio::fs::metadata(&full_path).await {
            Ok(meta) if meta.is_file() => {
                return disk::serve_from_disk(full_path, state.streaming_threshold_bytes).await;
            }
            _ => continue,
        }
    }

    Err(ApiError::NotFound)
}
