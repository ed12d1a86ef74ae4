use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Message, NewMessage};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    /// False on the first message of a new thread; the conversation record
    /// is created alongside the message in that case.
    #[serde(default)]
    pub has_conversation_id: bool,
    #[serde(flatten)]
    pub message: NewMessage,
}

pub async fn send_message(
    State(state): State<AppState>,
    Json(body): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<Message>), AppError> {
    if !body.has_conversation_id {
        state
            .conversations
            .create_conversation(
                &body.message.conversation_id,
                &body.message.sender_username,
                &body.message.receiver_username,
            )
            .await?;
    }

    let stored = state.messages.add_message(body.message).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

pub async fn get_messages(
    State(state): State<AppState>,
    Path((sender_username, receiver_username)): Path<(String, String)>,
) -> Result<Json<Vec<Message>>, AppError> {
    let messages = state
        .messages
        .get_messages(&sender_username, &receiver_username)
        .await?;
    Ok(Json(messages))
}

pub async fn get_conversation_messages(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> Result<Json<Vec<Message>>, AppError> {
    let messages = state.messages.get_user_messages(&conversation_id).await?;
    Ok(Json(messages))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOfferRequest {
    pub message_id: Uuid,
    /// Offer decision flag name; validated against the closed set.
    #[serde(rename = "type")]
    pub flag: String,
}

pub async fn update_offer(
    State(state): State<AppState>,
    Json(body): Json<UpdateOfferRequest>,
) -> Result<Json<Message>, AppError> {
    let message = state
        .messages
        .update_offer(body.message_id, &body.flag)
        .await?;
    Ok(Json(message))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAsReadRequest {
    pub message_id: Uuid,
}

pub async fn mark_message_as_read(
    State(state): State<AppState>,
    Json(body): Json<MarkAsReadRequest>,
) -> Result<Json<Message>, AppError> {
    let message = state.messages.mark_message_as_read(body.message_id).await?;
    Ok(Json(message))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkManyAsReadRequest {
    /// Anchor message returned to the caller; looked up independently of
    /// the bulk update.
    pub message_id: Uuid,
    pub sender_username: String,
    pub receiver_username: String,
}

pub async fn mark_multiple_messages_as_read(
    State(state): State<AppState>,
    Json(body): Json<MarkManyAsReadRequest>,
) -> Result<Json<Message>, AppError> {
    let anchor = state
        .messages
        .mark_many_messages_as_read(
            &body.receiver_username,
            &body.sender_username,
            body.message_id,
        )
        .await?;
    Ok(Json(anchor))
}
