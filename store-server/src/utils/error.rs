//! Unified error handling
//!
//! Application-level error type and response envelope:
//! - [`AppError`] - application error enum
//! - [`AppResponse`] - API response structure
//!
//! Single-item operations fail on the first violated precondition with no
//! partial effect. Bulk operations never surface per-order failures through
//! this type; they accumulate them into a `BatchResult` instead.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// Unified API response envelope
///
/// ```json
/// {
///   "code": "0000",
///   "message": "success",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    /// Error code ("0000" means success)
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> AppResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: "0000".to_string(),
            message: "success".to_string(),
            data: Some(data),
        }
    }
}

/// Application error enum
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Authentication errors (4xx) ==========
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Permission denied: {0}")]
    Forbidden(String),

    // ========== Business logic errors (4xx) ==========
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource conflict: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),

    #[error("Invalid status transition: {0}")]
    InvalidTransition(String),

    // ========== System errors (5xx) ==========
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn unauthorized() -> Self {
        AppError::Unauthorized
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        AppError::Forbidden(msg.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        AppError::NotFound(resource.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn insufficient_stock(msg: impl Into<String>) -> Self {
        AppError::InsufficientStock(msg.into())
    }

    pub fn invalid_transition(msg: impl Into<String>) -> Self {
        AppError::InvalidTransition(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        AppError::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

impl From<shared::InvalidTransition> for AppError {
    fn from(err: shared::InvalidTransition) -> Self {
        AppError::InvalidTransition(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            // Authentication errors (401/403)
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "1001"),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "1002"),
            AppError::TokenExpired => (StatusCode::UNAUTHORIZED, "1003"),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "2001"),

            // Business logic errors (4xx)
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "3001"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "3002"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "3003"),
            AppError::InsufficientStock(_) => (StatusCode::CONFLICT, "3004"),
            AppError::InvalidTransition(_) => (StatusCode::BAD_REQUEST, "3005"),

            // System errors (5xx) - log full detail, return generic message
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "9001"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "9002"),
        };

        let message = if status.is_server_error() {
            error!("System error: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = AppResponse::<()> {
            code: code.to_string(),
            message,
            data: None,
        };

        (status, Json(body)).into_response()
    }
}

/// Application-level Result type
pub type AppResult<T> = Result<T, AppError>;
