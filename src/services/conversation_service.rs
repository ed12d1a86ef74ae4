use sqlx::{Pool, Postgres, Row};

use crate::error::AppError;
use crate::models::Conversation;

/// Creates and looks up the conversation grouping between two participants.
#[derive(Clone)]
pub struct ConversationService {
    db: Pool<Postgres>,
}

impl ConversationService {
    pub fn new(db: Pool<Postgres>) -> Self {
        Self { db }
    }

    /// Insert a new conversation. No pre-read: the caller signals "no
    /// existing conversation" via the hasConversationId flag, and a
    /// concurrent duplicate surfaces as a unique violation mapped to
    /// `Conflict`.
    pub async fn create_conversation(
        &self,
        conversation_id: &str,
        sender_username: &str,
        receiver_username: &str,
    ) -> Result<Conversation, AppError> {
        sqlx::query(
            "INSERT INTO conversations (conversation_id, sender_username, receiver_username) \
             VALUES ($1, $2, $3)",
        )
        .bind(conversation_id)
        .bind(sender_username)
        .bind(receiver_username)
        .execute(&self.db)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(format!("conversation {conversation_id} already exists"))
            }
            _ => AppError::Database(e),
        })?;

        Ok(Conversation {
            conversation_id: conversation_id.to_string(),
            sender_username: sender_username.to_string(),
            receiver_username: receiver_username.to_string(),
        })
    }

    /// All conversations between the pair, matching either direction.
    /// Empty vec when none exist.
    pub async fn get_conversation(
        &self,
        sender_username: &str,
        receiver_username: &str,
    ) -> Result<Vec<Conversation>, AppError> {
        let rows = sqlx::query(
            "SELECT conversation_id, sender_username, receiver_username \
             FROM conversations \
             WHERE (sender_username = $1 AND receiver_username = $2) \
                OR (sender_username = $2 AND receiver_username = $1)",
        )
        .bind(sender_username)
        .bind(receiver_username)
        .fetch_all(&self.db)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(Conversation {
                    conversation_id: row.try_get("conversation_id")?,
                    sender_username: row.try_get("sender_username")?,
                    receiver_username: row.try_get("receiver_username")?,
                })
            })
            .collect()
    }
}
