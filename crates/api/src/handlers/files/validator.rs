use crate::errors::ApiError;

/// Validates a decoded request path to prevent path traversal attacks
pub fn validate_request_path(path: &str) -> Result<(), ApiError> {
    if path.contains("..") {
        return Err(ApiError::InvalidPath(
            "Path contains '..' (path traversal attempt)".to_string(),
        ));
    }

    if path.contains('\0') {
        return Err(ApiError::InvalidPath(
            "Path contains null byte".to_string(),
        ));
    }

    if path.starts_with('/') || path.starts_with('\\') {
        return Err(ApiError::InvalidPath(
            "Absolute paths are not allowed".to_string(),
        ));
    }

    // Windows drive letters (C:, D:, etc.)
    if path.len() >= 2 && path.chars().nth(1) == Some(':') {
        return Err(ApiError::InvalidPath(
            "Drive letters are not allowed".to_string(),
        ));
    }

    Ok(())
}
