use crate::metrics;
use crate::state::AppState;
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

pub mod conversations;
use conversations::{get_conversation, get_conversation_list};
pub mod messages;
use messages::{
    get_conversation_messages, get_messages, mark_message_as_read,
    mark_multiple_messages_as_read, send_message, update_offer,
};

pub fn build_router() -> Router<AppState> {
    // Service introspection endpoints (no API version prefix)
    let introspection = Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/metrics", get(metrics::metrics_handler));

    // API v1 endpoints (all business logic routes with /api/v1 prefix)
    let api_v1 = Router::new()
        .route("/message", post(send_message))
        .route(
            "/conversation/:sender_username/:receiver_username",
            get(get_conversation),
        )
        .route("/conversations/:username", get(get_conversation_list))
        .route(
            "/messages/:sender_username/:receiver_username",
            get(get_messages),
        )
        .route(
            "/conversation-messages/:conversation_id",
            get(get_conversation_messages),
        )
        .route("/offer", put(update_offer))
        .route("/message/mark-as-read", put(mark_message_as_read))
        .route(
            "/message/mark-multiple-as-read",
            put(mark_multiple_messages_as_read),
        )
        .layer(middleware::from_fn(metrics::track_http_metrics));

    introspection.nest("/api/v1", api_v1)
}
