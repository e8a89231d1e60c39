use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::shared::types::ApiResponse;
use crate::storage::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, message, errors) = match self {
            AppError::Store(StoreError::DuplicateKey) => (
                // Existing clients expect duplicate natural keys as 400
                StatusCode::BAD_REQUEST,
                "conflict",
                "Record already exists".to_string(),
                None,
            ),
            AppError::Store(StoreError::Timeout(d)) => {
                tracing::error!("Store operation timed out after {:?}", d);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "store_unavailable",
                    "Storage is temporarily unavailable".to_string(),
                    None,
                )
            }
            AppError::Store(StoreError::Database(ref e)) => {
                // Never leak raw driver errors to the client
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal",
                    "Database error occurred".to_string(),
                    None,
                )
            }
            AppError::NotFound(ref msg) => {
                (StatusCode::NOT_FOUND, "not_found", msg.clone(), None)
            }
            AppError::Validation(ref msg) => (
                StatusCode::BAD_REQUEST,
                "validation",
                msg.clone(),
                Some(vec![msg.clone()]),
            ),
            AppError::BadRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", msg.clone(), None)
            }
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal",
                    "Internal server error".to_string(),
                    None,
                )
            }
            AppError::Unauthorized(ref msg) => {
                (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone(), None)
            }
            AppError::Conflict(ref msg) => {
                (StatusCode::BAD_REQUEST, "conflict", msg.clone(), None)
            }
            AppError::ServiceUnavailable(ref msg) => {
                tracing::error!("Service unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "store_unavailable",
                    msg.clone(),
                    None,
                )
            }
        };

        let body = Json(ApiResponse::<()>::error(kind, Some(message), errors));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
