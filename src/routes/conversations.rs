use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::models::{Conversation, Message};
use crate::state::AppState;

pub async fn get_conversation(
    State(state): State<AppState>,
    Path((sender_username, receiver_username)): Path<(String, String)>,
) -> Result<Json<Vec<Conversation>>, AppError> {
    let conversations = state
        .conversations
        .get_conversation(&sender_username, &receiver_username)
        .await?;
    Ok(Json(conversations))
}

/// Latest message preview per thread the user participates in.
pub async fn get_conversation_list(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Vec<Message>>, AppError> {
    let previews = state.messages.get_user_conversation_list(&username).await?;
    Ok(Json(previews))
}
