use crate::middleware::error_handling;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error_handling::into_response(self).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("server start failure: {0}")]
    StartServer(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("nothing to update: {0}")]
    NoOp(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("notification delivery failed: {0}")]
    NotificationDelivery(String),
}

impl AppError {
    /// Transient failures are worth retrying; definitive outcomes
    /// (validation, not-found, conflict, no-op) are not.
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::Database(e) => {
                matches!(
                    e,
                    sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
                )
            }
            AppError::NotificationDelivery(_) => true,
            _ => false,
        }
    }

    /// Returns HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::Validation(_) => 400,
            AppError::NotFound(_) => 404,
            AppError::NoOp(_) => 404,
            AppError::Conflict(_) => 409,
            AppError::NotificationDelivery(_) => 502,
            AppError::Database(_) => 500,
            _ => 500,
        }
    }
}

/// Unified API error body, shared shape across the platform's services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status: u16,
    /// Client-side routing bucket ("validation_error", "not_found_error", ...)
    pub error_type: String,
    /// Stable code for client localization ("MESSAGE_NOT_FOUND", ...)
    pub code: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error: &str, message: &str, status: u16, error_type: &str, code: &str) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
            status,
            error_type: error_type.to_string(),
            code: code.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

pub mod error_codes {
    pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
    pub const MESSAGE_NOT_FOUND: &str = "MESSAGE_NOT_FOUND";
    pub const CONVERSATION_EXISTS: &str = "CONVERSATION_EXISTS";
    pub const NO_UNREAD_MESSAGES: &str = "NO_UNREAD_MESSAGES";
    pub const NOTIFICATION_DELIVERY_FAILED: &str = "NOTIFICATION_DELIVERY_FAILED";
    pub const DATABASE_ERROR: &str = "DATABASE_ERROR";
    pub const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_errors_are_distinguished_from_definitive_ones() {
        assert!(AppError::Database(sqlx::Error::PoolTimedOut).is_transient());
        assert!(AppError::NotificationDelivery("kafka down".into()).is_transient());

        assert!(!AppError::Validation("bad flag".into()).is_transient());
        assert!(!AppError::NotFound("message".into()).is_transient());
        assert!(!AppError::Conflict("conversation exists".into()).is_transient());
        assert!(!AppError::NoOp("no unread messages".into()).is_transient());
    }

    #[test]
    fn status_codes_match_error_classes() {
        assert_eq!(AppError::Validation("x".into()).status_code(), 400);
        assert_eq!(AppError::NotFound("x".into()).status_code(), 404);
        assert_eq!(AppError::NoOp("x".into()).status_code(), 404);
        assert_eq!(AppError::Conflict("x".into()).status_code(), 409);
        assert_eq!(AppError::NotificationDelivery("x".into()).status_code(), 502);
        assert_eq!(AppError::Database(sqlx::Error::PoolClosed).status_code(), 500);
        assert_eq!(AppError::Config("x".into()).status_code(), 500);
    }
}
