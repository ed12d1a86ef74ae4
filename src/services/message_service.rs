//! Message store, query engine and orchestrator.
//!
//! Owns the durable write path plus its two side effects: the real-time
//! emit towards connected clients and, for offer messages, the async email
//! notification. The durable write is the source of truth; side-effect
//! failures after a committed write are logged and swallowed.

use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppError;
use crate::metrics;
use crate::models::{Message, NewMessage, OfferFlag};
use crate::realtime::{ChatEvent, RealtimeNotifier};
use crate::services::notification_producer::{
    NotificationPublisher, OrderEmailNotification, ORDER_EMAIL_ROUTING_KEY,
    ORDER_NOTIFICATION_EXCHANGE,
};

const MESSAGE_COLUMNS: &str = "id, conversation_id, body, file, gig_id, buyer_id, seller_id, \
     sender_username, sender_picture, receiver_username, receiver_picture, \
     is_read, has_offer, offer, created_at";

#[derive(Clone)]
pub struct MessageService {
    db: Pool<Postgres>,
    realtime: Arc<dyn RealtimeNotifier>,
    notifications: Arc<dyn NotificationPublisher>,
}

impl MessageService {
    pub fn new(
        db: Pool<Postgres>,
        realtime: Arc<dyn RealtimeNotifier>,
        notifications: Arc<dyn NotificationPublisher>,
    ) -> Self {
        Self {
            db,
            realtime,
            notifications,
        }
    }

    /// Persist a new message, then (for offers) publish the email payload
    /// and (always) emit the real-time event. The write must succeed before
    /// either side effect runs; side-effect failures never fail the call.
    pub async fn add_message(&self, new: NewMessage) -> Result<Message, AppError> {
        if new.has_offer != new.offer.is_some() {
            return Err(AppError::Validation(
                "hasOffer must match the presence of an offer sub-record".into(),
            ));
        }

        let message = Message {
            id: Uuid::new_v4(),
            conversation_id: new.conversation_id,
            body: new.body,
            file: new.file,
            gig_id: new.gig_id,
            buyer_id: new.buyer_id,
            seller_id: new.seller_id,
            sender_username: new.sender_username,
            sender_picture: new.sender_picture,
            receiver_username: new.receiver_username,
            receiver_picture: new.receiver_picture,
            is_read: new.is_read,
            has_offer: new.has_offer,
            offer: new.offer,
            created_at: new.created_at.unwrap_or_else(Utc::now),
        };

        let file_json = message
            .file
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| AppError::Validation(format!("invalid file attachment: {e}")))?;
        let offer_json = message
            .offer
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| AppError::Validation(format!("invalid offer: {e}")))?;

        sqlx::query(
            "INSERT INTO messages (id, conversation_id, body, file, gig_id, buyer_id, seller_id, \
             sender_username, sender_picture, receiver_username, receiver_picture, \
             is_read, has_offer, offer, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
        )
        .bind(message.id)
        .bind(&message.conversation_id)
        .bind(&message.body)
        .bind(&file_json)
        .bind(&message.gig_id)
        .bind(&message.buyer_id)
        .bind(&message.seller_id)
        .bind(&message.sender_username)
        .bind(&message.sender_picture)
        .bind(&message.receiver_username)
        .bind(&message.receiver_picture)
        .bind(message.is_read)
        .bind(message.has_offer)
        .bind(&offer_json)
        .bind(message.created_at)
        .execute(&self.db)
        .await?;

        metrics::record_message_created();

        if let Some(offer) = message.offer.as_ref() {
            let payload = OrderEmailNotification::for_offer(&message, offer);
            match serde_json::to_string(&payload) {
                Ok(serialized) => {
                    if let Err(e) = self
                        .notifications
                        .publish(
                            ORDER_NOTIFICATION_EXCHANGE,
                            ORDER_EMAIL_ROUTING_KEY,
                            &serialized,
                            "order email for an offer message",
                        )
                        .await
                    {
                        tracing::warn!(
                            error = %e,
                            message_id = %message.id,
                            "offer email publish failed after committed write"
                        );
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, message_id = %message.id, "offer email payload serialization failed");
                }
            }
        }

        self.emit_best_effort(ChatEvent::MessageReceived(message.clone()))
            .await;

        Ok(message)
    }

    /// Message history between two users, both directions, oldest first.
    pub async fn get_messages(
        &self,
        sender_username: &str,
        receiver_username: &str,
    ) -> Result<Vec<Message>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages \
             WHERE (sender_username = $1 AND receiver_username = $2) \
                OR (sender_username = $2 AND receiver_username = $1) \
             ORDER BY created_at ASC, id ASC"
        ))
        .bind(sender_username)
        .bind(receiver_username)
        .fetch_all(&self.db)
        .await?;

        rows.iter().map(map_message_row).collect()
    }

    /// Full history of one conversation, oldest first.
    pub async fn get_user_messages(
        &self,
        conversation_id: &str,
    ) -> Result<Vec<Message>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages \
             WHERE conversation_id = $1 \
             ORDER BY created_at ASC, id ASC"
        ))
        .bind(conversation_id)
        .fetch_all(&self.db)
        .await?;

        rows.iter().map(map_message_row).collect()
    }

    /// Latest message per conversation the user participates in, one row
    /// per distinct conversation id. Ties on created_at break by id so the
    /// preview is deterministic.
    pub async fn get_user_conversation_list(
        &self,
        username: &str,
    ) -> Result<Vec<Message>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT DISTINCT ON (conversation_id) {MESSAGE_COLUMNS} FROM messages \
             WHERE sender_username = $1 OR receiver_username = $1 \
             ORDER BY conversation_id, created_at DESC, id DESC"
        ))
        .bind(username)
        .fetch_all(&self.db)
        .await?;

        rows.iter().map(map_message_row).collect()
    }

    /// Set one offer decision flag to true. The flag name is validated
    /// against the closed set before it gets anywhere near the store;
    /// setting one flag never clears another. The sub-document is created
    /// when absent.
    pub async fn update_offer(&self, message_id: Uuid, flag: &str) -> Result<Message, AppError> {
        let flag = OfferFlag::parse(flag).ok_or_else(|| {
            AppError::Validation(format!(
                "unknown offer flag {flag:?}; allowed: {}",
                OfferFlag::ALLOWED
            ))
        })?;

        // The path literal is built from the enum, never from caller input.
        let row = sqlx::query(&format!(
            "UPDATE messages \
             SET offer = jsonb_set(COALESCE(offer, '{{}}'::jsonb), '{{{}}}', 'true'::jsonb) \
             WHERE id = $1 \
             RETURNING {MESSAGE_COLUMNS}",
            flag.as_str()
        ))
        .bind(message_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("message {message_id}")))?;

        map_message_row(&row)
    }

    /// Mark one message as read. Targeted set, idempotent. Emits a
    /// "message updated" event carrying only the id.
    pub async fn mark_message_as_read(&self, message_id: Uuid) -> Result<Message, AppError> {
        let row = sqlx::query(&format!(
            "UPDATE messages SET is_read = TRUE WHERE id = $1 RETURNING {MESSAGE_COLUMNS}"
        ))
        .bind(message_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("message {message_id}")))?;

        let message = map_message_row(&row)?;

        self.emit_best_effort(ChatEvent::MessageUpdated { message_id })
            .await;

        Ok(message)
    }

    /// Mark every unread message from `sender` to `receiver` as read in one
    /// bulk update (direction-specific, unlike conversation lookup). Zero
    /// matched rows is an error, not a silent success. The anchor message
    /// is then fetched independently by id and returned; it is typically
    /// the message that triggered the read action in the UI and need not be
    /// part of the updated set.
    pub async fn mark_many_messages_as_read(
        &self,
        receiver_username: &str,
        sender_username: &str,
        anchor_message_id: Uuid,
    ) -> Result<Message, AppError> {
        let result = sqlx::query(
            "UPDATE messages SET is_read = TRUE \
             WHERE sender_username = $1 AND receiver_username = $2 AND is_read = FALSE",
        )
        .bind(sender_username)
        .bind(receiver_username)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NoOp(format!(
                "no unread messages from {sender_username} to {receiver_username}"
            )));
        }

        let row = sqlx::query(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = $1"
        ))
        .bind(anchor_message_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("message {anchor_message_id}")))?;

        let anchor = map_message_row(&row)?;

        self.emit_best_effort(ChatEvent::MessageUpdated {
            message_id: anchor_message_id,
        })
        .await;

        Ok(anchor)
    }

    /// Real-time delivery is best-effort: a failed emit after a committed
    /// write is logged, never surfaced to the caller.
    async fn emit_best_effort(&self, event: ChatEvent) {
        if let Err(e) = self.realtime.emit(&event).await {
            tracing::warn!(error = %e, event = event.event_name(), "real-time emit failed");
        }
    }
}

fn map_message_row(row: &PgRow) -> Result<Message, AppError> {
    let file: Option<serde_json::Value> = row.try_get("file")?;
    let offer: Option<serde_json::Value> = row.try_get("offer")?;

    Ok(Message {
        id: row.try_get("id")?,
        conversation_id: row.try_get("conversation_id")?,
        body: row.try_get("body")?,
        file: file
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| AppError::Database(sqlx::Error::Decode(Box::new(e))))?,
        gig_id: row.try_get("gig_id")?,
        buyer_id: row.try_get("buyer_id")?,
        seller_id: row.try_get("seller_id")?,
        sender_username: row.try_get("sender_username")?,
        sender_picture: row.try_get("sender_picture")?,
        receiver_username: row.try_get("receiver_username")?,
        receiver_picture: row.try_get("receiver_picture")?,
        is_read: row.try_get("is_read")?,
        has_offer: row.try_get("has_offer")?,
        offer: offer
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| AppError::Database(sqlx::Error::Decode(Box::new(e))))?,
        created_at: row.try_get("created_at")?,
    })
}
