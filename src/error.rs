use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Attribution id used when a failure occurs before the acting identity
/// has been consulted.
pub const UNATTRIBUTED: i64 = 0;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Caller-supplied request is semantically invalid (empty payload,
    /// duplicate name, malformed rename target).
    #[error("{message}")]
    InputData { id: i64, message: String },

    /// Referenced user or file does not exist.
    #[error("{message}")]
    NotFound { id: i64, message: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error payload: attribution id plus human-readable message.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub id: i64,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, id, message) = match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    UNATTRIBUTED,
                    "Database error".to_string(),
                )
            }
            AppError::InputData { id, message } => (StatusCode::BAD_REQUEST, id, message),
            AppError::NotFound { id, message } => (StatusCode::NOT_FOUND, id, message),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, UNATTRIBUTED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, UNATTRIBUTED, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, UNATTRIBUTED, msg),
            AppError::Jwt(e) => {
                tracing::warn!("JWT error: {:?}", e);
                (
                    StatusCode::UNAUTHORIZED,
                    UNATTRIBUTED,
                    "Invalid token".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, UNATTRIBUTED, msg)
            }
        };

        let body = Json(ErrorBody { id, message });
        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
