use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

use crate::models::{ErrorDetail, ErrorResponse};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found")]
    NotFound,

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Negotiation error: {0}")]
    NegotiationError(#[from] varia_negotiator::CatalogError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    error: ErrorDetail {
                        code: "NOT_FOUND".to_string(),
                        message: "Resource not found".to_string(),
                    },
                },
            ),
            ApiError::InvalidPath(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: ErrorDetail {
                        code: "INVALID_PATH".to_string(),
                        message: msg,
                    },
                },
            ),
            ApiError::NegotiationError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    error: ErrorDetail {
                        code: "NEGOTIATION_ERROR".to_string(),
                        message: err.to_string(),
                    },
                },
            ),
            ApiError::IoError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    error: ErrorDetail {
                        code: "IO_ERROR".to_string(),
                        message: err.to_string(),
                    },
                },
            ),
        };

        (status, Json(error_response)).into_response()
    }
}
