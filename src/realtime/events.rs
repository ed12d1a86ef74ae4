//! Real-time chat events.
//!
//! Every event is published as one JSON envelope on the chat channel:
//!
//! ```json
//! {"event": "message received", "data": { ...full message... }}
//! {"event": "message updated",  "data": {"messageId": "uuid"}}
//! ```
//!
//! Socket gateways subscribed to the channel relay the envelope to every
//! connected client. Delivery is best-effort and at-most-once; there is no
//! persistence or replay on this path.

use crate::models::Message;
use serde_json::json;
use uuid::Uuid;

pub const MESSAGE_RECEIVED: &str = "message received";
pub const MESSAGE_UPDATED: &str = "message updated";

#[derive(Debug, Clone)]
pub enum ChatEvent {
    /// A new message was stored; carries the full record so clients can
    /// render it without a follow-up fetch.
    MessageReceived(Message),
    /// An existing message changed (read flag, offer flag); carries only the
    /// id, clients re-fetch what they care about.
    MessageUpdated { message_id: Uuid },
}

impl ChatEvent {
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::MessageReceived(_) => MESSAGE_RECEIVED,
            Self::MessageUpdated { .. } => MESSAGE_UPDATED,
        }
    }

    /// Serialize the broadcast envelope. This is the only place event
    /// serialization happens; no manual JSON construction in services.
    pub fn to_broadcast_payload(&self) -> Result<String, serde_json::Error> {
        let data = match self {
            Self::MessageReceived(message) => serde_json::to_value(message)?,
            Self::MessageUpdated { message_id } => json!({ "messageId": message_id }),
        };
        serde_json::to_string(&json!({ "event": self.event_name(), "data": data }))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BroadcastError {
    #[error("failed to serialize event: {0}")]
    Serialization(String),

    #[error("failed to publish to redis: {0}")]
    Redis(String),

    #[error("publish timed out after {0:?}")]
    Timeout(std::time::Duration),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_message() -> Message {
        Message {
            id: Uuid::new_v4(),
            conversation_id: "conv-1".into(),
            body: "hello".into(),
            file: None,
            gig_id: "gig-1".into(),
            buyer_id: "b-1".into(),
            seller_id: "s-1".into(),
            sender_username: "alice".into(),
            sender_picture: "".into(),
            receiver_username: "bob".into(),
            receiver_picture: "".into(),
            is_read: false,
            has_offer: false,
            offer: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn event_names_match_the_socket_contract() {
        let received = ChatEvent::MessageReceived(sample_message());
        let updated = ChatEvent::MessageUpdated {
            message_id: Uuid::new_v4(),
        };

        assert_eq!(received.event_name(), "message received");
        assert_eq!(updated.event_name(), "message updated");
    }

    #[test]
    fn message_received_payload_carries_the_full_record() {
        let message = sample_message();
        let event = ChatEvent::MessageReceived(message.clone());

        let payload = event.to_broadcast_payload().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&payload).unwrap();

        assert_eq!(parsed["event"], "message received");
        assert_eq!(parsed["data"]["id"], message.id.to_string());
        assert_eq!(parsed["data"]["conversationId"], "conv-1");
        assert_eq!(parsed["data"]["body"], "hello");
        assert_eq!(parsed["data"]["senderUsername"], "alice");
    }

    #[test]
    fn message_updated_payload_carries_only_the_id() {
        let message_id = Uuid::new_v4();
        let event = ChatEvent::MessageUpdated { message_id };

        let payload = event.to_broadcast_payload().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&payload).unwrap();

        assert_eq!(parsed["event"], "message updated");
        assert_eq!(parsed["data"]["messageId"], message_id.to_string());
        assert_eq!(parsed["data"].as_object().unwrap().len(), 1);
    }
}
