use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored chat message.
///
/// Field names keep the camelCase wire format the marketplace clients
/// already speak; the `file` and `offer` sub-records live in JSONB columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: String,
    pub body: String,
    pub file: Option<FileAttachment>,
    pub gig_id: String,
    pub buyer_id: String,
    pub seller_id: String,
    pub sender_username: String,
    pub sender_picture: String,
    pub receiver_username: String,
    pub receiver_picture: String,
    pub is_read: bool,
    pub has_offer: bool,
    pub offer: Option<Offer>,
    pub created_at: DateTime<Utc>,
}

/// Inbound message payload; the id is server-generated and `createdAt` is
/// assigned at insert time when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    pub conversation_id: String,
    #[serde(default)]
    pub body: String,
    pub file: Option<FileAttachment>,
    #[serde(default)]
    pub gig_id: String,
    #[serde(default)]
    pub buyer_id: String,
    #[serde(default)]
    pub seller_id: String,
    pub sender_username: String,
    #[serde(default)]
    pub sender_picture: String,
    pub receiver_username: String,
    #[serde(default)]
    pub receiver_picture: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub has_offer: bool,
    pub offer: Option<Offer>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Reference to a file already uploaded to object storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileAttachment {
    pub url: String,
    pub file_type: String,
    pub file_size: String,
    pub file_name: String,
}

/// An offer embedded in a message.
///
/// The decision flags start false and are only ever set to true, one at a
/// time; setting one never clears another. Container-level defaults keep
/// deserialization tolerant of sparse sub-documents (an offer flag may have
/// been set on a record that never carried the descriptive fields).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Offer {
    pub gig_title: String,
    pub price: f64,
    pub description: String,
    pub delivery_in_days: i32,
    pub accepted: bool,
    pub rejected: bool,
    pub completed: bool,
}

/// The closed set of offer decision flags callers may set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferFlag {
    Accepted,
    Rejected,
    Completed,
}

impl OfferFlag {
    pub const ALLOWED: &'static str = "accepted, rejected, completed";

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "accepted" => Some(Self::Accepted),
            "rejected" => Some(Self::Rejected),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_message() -> Message {
        Message {
            id: Uuid::new_v4(),
            conversation_id: "conv-1".into(),
            body: "hello".into(),
            file: None,
            gig_id: "gig-9".into(),
            buyer_id: "buyer-1".into(),
            seller_id: "seller-1".into(),
            sender_username: "Alice".into(),
            sender_picture: "alice.png".into(),
            receiver_username: "Bob".into(),
            receiver_picture: "bob.png".into(),
            is_read: false,
            has_offer: false,
            offer: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn message_serializes_with_camel_case_fields() {
        let json = serde_json::to_value(sample_message()).unwrap();

        assert_eq!(json["conversationId"], "conv-1");
        assert_eq!(json["gigId"], "gig-9");
        assert_eq!(json["senderUsername"], "Alice");
        assert_eq!(json["receiverPicture"], "bob.png");
        assert_eq!(json["isRead"], false);
        assert_eq!(json["hasOffer"], false);
        assert!(json["createdAt"].is_string());
    }

    #[test]
    fn offer_flags_default_to_false() {
        let offer: Offer = serde_json::from_value(serde_json::json!({
            "gigTitle": "Logo design",
            "price": 50,
            "description": "One logo",
            "deliveryInDays": 3
        }))
        .unwrap();

        assert!(!offer.accepted);
        assert!(!offer.rejected);
        assert!(!offer.completed);
        assert_eq!(offer.price, 50.0);
        assert_eq!(offer.delivery_in_days, 3);
    }

    #[test]
    fn sparse_offer_subdocument_deserializes() {
        // A flag can be set on a record whose offer never carried the
        // descriptive fields.
        let offer: Offer =
            serde_json::from_value(serde_json::json!({"accepted": true})).unwrap();

        assert!(offer.accepted);
        assert_eq!(offer.gig_title, "");
        assert_eq!(offer.price, 0.0);
    }

    #[test]
    fn file_attachment_round_trips_camel_case() {
        let json = serde_json::json!({
            "url": "https://cdn.example.com/a.pdf",
            "fileType": "pdf",
            "fileSize": "2048",
            "fileName": "a.pdf"
        });

        let file: FileAttachment = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(file.file_type, "pdf");
        assert_eq!(serde_json::to_value(&file).unwrap(), json);
    }

    #[test]
    fn new_message_defaults_optional_fields() {
        let new: NewMessage = serde_json::from_value(serde_json::json!({
            "conversationId": "conv-1",
            "senderUsername": "alice",
            "receiverUsername": "bob"
        }))
        .unwrap();

        assert_eq!(new.body, "");
        assert!(!new.is_read);
        assert!(!new.has_offer);
        assert!(new.offer.is_none());
        assert!(new.created_at.is_none());
    }

    #[test]
    fn offer_flag_parses_known_names_only() {
        assert_eq!(OfferFlag::parse("accepted"), Some(OfferFlag::Accepted));
        assert_eq!(OfferFlag::parse("rejected"), Some(OfferFlag::Rejected));
        assert_eq!(OfferFlag::parse("completed"), Some(OfferFlag::Completed));
        assert_eq!(OfferFlag::parse("cancelled"), None);
        assert_eq!(OfferFlag::parse("Accepted"), None);
        assert_eq!(OfferFlag::parse(""), None);
    }
}
