use crate::error::{error_codes, AppError, ErrorResponse};
use axum::{http::StatusCode, response::IntoResponse, Json};

/// Map domain errors to HTTP responses
pub fn map_error(err: &AppError) -> (StatusCode, ErrorResponse) {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let (error_type, code) = match err {
        AppError::Validation(_) => ("validation_error", error_codes::INVALID_REQUEST),
        AppError::NotFound(_) => ("not_found_error", error_codes::MESSAGE_NOT_FOUND),
        AppError::Conflict(_) => ("conflict_error", error_codes::CONVERSATION_EXISTS),
        AppError::NoOp(_) => ("no_op_error", error_codes::NO_UNREAD_MESSAGES),
        AppError::Database(_) => ("server_error", error_codes::DATABASE_ERROR),
        AppError::NotificationDelivery(_) => {
            ("server_error", error_codes::NOTIFICATION_DELIVERY_FAILED)
        }
        AppError::Config(_) | AppError::StartServer(_) => {
            ("server_error", error_codes::INTERNAL_SERVER_ERROR)
        }
    };

    let message = err.to_string();
    let response = ErrorResponse::new(
        match status {
            StatusCode::BAD_REQUEST => "Bad Request",
            StatusCode::NOT_FOUND => "Not Found",
            StatusCode::CONFLICT => "Conflict",
            StatusCode::BAD_GATEWAY => "Bad Gateway",
            StatusCode::INTERNAL_SERVER_ERROR => "Internal Server Error",
            _ => "Error",
        },
        &message,
        status.as_u16(),
        error_type,
        code,
    );

    (status, response)
}

pub fn into_response(err: AppError) -> impl IntoResponse {
    let (status, response) = map_error(&err);
    (status, Json(response))
}
