use serde::{Deserialize, Serialize};

/// A chat thread between two marketplace users.
///
/// The id is an opaque string chosen by the caller (typically the gateway
/// concatenates the two usernames). A thread is created once, alongside the
/// first message, and never updated or deleted afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub conversation_id: String,
    pub sender_username: String,
    pub receiver_username: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_field_names_are_camel_case() {
        let conversation = Conversation {
            conversation_id: "alice-bob".into(),
            sender_username: "alice".into(),
            receiver_username: "bob".into(),
        };

        let json = serde_json::to_value(&conversation).unwrap();
        assert_eq!(json["conversationId"], "alice-bob");
        assert_eq!(json["senderUsername"], "alice");
        assert_eq!(json["receiverUsername"], "bob");
    }
}
