//! Mapping of the domain error taxonomy onto the HTTP error surface.

use axum::http::StatusCode;
use chat_service::error::{error_codes, AppError};
use chat_service::middleware::error_handling::map_error;

#[test]
fn validation_maps_to_400_invalid_request() {
    let (status, body) = map_error(&AppError::Validation("unknown offer flag".into()));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.error_type, "validation_error");
    assert_eq!(body.code, error_codes::INVALID_REQUEST);
    assert_eq!(body.status, 400);
}

#[test]
fn not_found_maps_to_404() {
    let (status, body) = map_error(&AppError::NotFound("message x".into()));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.error_type, "not_found_error");
    assert_eq!(body.code, error_codes::MESSAGE_NOT_FOUND);
}

#[test]
fn conflict_maps_to_409_conversation_exists() {
    let (status, body) = map_error(&AppError::Conflict("conversation conv-1".into()));
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body.error_type, "conflict_error");
    assert_eq!(body.code, error_codes::CONVERSATION_EXISTS);
}

#[test]
fn noop_maps_to_404_no_unread_messages() {
    let (status, body) = map_error(&AppError::NoOp("nothing to mark".into()));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.error_type, "no_op_error");
    assert_eq!(body.code, error_codes::NO_UNREAD_MESSAGES);
}

#[test]
fn database_failures_map_to_500() {
    let (status, body) = map_error(&AppError::Database(sqlx::Error::PoolTimedOut));
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body.error_type, "server_error");
    assert_eq!(body.code, error_codes::DATABASE_ERROR);
}

#[test]
fn notification_delivery_maps_to_502() {
    let (status, body) = map_error(&AppError::NotificationDelivery("kafka down".into()));
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body.error_type, "server_error");
    assert_eq!(body.code, error_codes::NOTIFICATION_DELIVERY_FAILED);
}

#[test]
fn body_carries_the_error_message_and_a_timestamp() {
    let (_, body) = map_error(&AppError::NotFound("message 42".into()));
    assert!(body.message.contains("message 42"));
    assert!(!body.timestamp.is_empty());
}
