pub mod conversation_service;
pub mod message_service;
pub mod notification_producer;

pub use conversation_service::ConversationService;
pub use message_service::MessageService;
pub use notification_producer::{
    KafkaNotificationProducer, NotificationPublisher, OrderEmailNotification,
};
