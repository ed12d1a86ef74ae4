//! Kafka offer-notification producer.
//!
//! When a message carrying an offer is stored, the service hands an email
//! payload to the notification consumer through the broker. The send is
//! fire-and-forget relative to the HTTP response; redelivery is owned by
//! broker settings and the consumer, never retried here.

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::AppError;
use crate::models::{Message, Offer};

/// Addressing used consistently for offer emails. The exchange maps to the
/// Kafka topic, the routing key to the record key.
pub const ORDER_NOTIFICATION_EXCHANGE: &str = "order-notification";
pub const ORDER_EMAIL_ROUTING_KEY: &str = "order-email";

/// Broker side of the async notification path. The service layer only knows
/// this trait; tests substitute recording fakes.
#[async_trait]
pub trait NotificationPublisher: Send + Sync {
    async fn publish(
        &self,
        exchange: &str,
        routing_key: &str,
        payload: &str,
        description: &str,
    ) -> Result<(), AppError>;
}

/// Email payload consumed by the notification service's offer template.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderEmailNotification {
    pub sender: String,
    pub buyer_username: String,
    pub seller_username: String,
    /// Price rendered as a string; the email template interpolates verbatim.
    pub amount: String,
    pub title: String,
    pub description: String,
    pub delivery_days: String,
    pub template: String,
}

impl OrderEmailNotification {
    /// Offers travel seller to buyer: the sender of the message is the
    /// seller, the receiver the buyer. Usernames are lowercased for the
    /// email lookup.
    pub fn for_offer(message: &Message, offer: &Offer) -> Self {
        Self {
            sender: message.sender_username.clone(),
            buyer_username: message.receiver_username.to_lowercase(),
            seller_username: message.sender_username.to_lowercase(),
            amount: format_amount(offer.price),
            title: offer.gig_title.clone(),
            description: offer.description.clone(),
            delivery_days: offer.delivery_in_days.to_string(),
            template: "offer".to_string(),
        }
    }
}

/// Drop a trailing `.0` so whole prices render as integers in the email.
fn format_amount(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("{}", price as i64)
    } else {
        format!("{}", price)
    }
}

/// Publishes notification payloads to Kafka.
#[derive(Clone)]
pub struct KafkaNotificationProducer {
    producer: FutureProducer,
}

impl KafkaNotificationProducer {
    pub fn new(brokers: &str) -> Result<Self, AppError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .set("acks", "all")
            .set("retries", "3")
            .set("retry.backoff.ms", "100")
            .create()
            .map_err(|e| AppError::Config(format!("failed to create Kafka producer: {e}")))?;

        tracing::info!(brokers = %brokers, "notification producer initialized");

        Ok(Self { producer })
    }
}

#[async_trait]
impl NotificationPublisher for KafkaNotificationProducer {
    async fn publish(
        &self,
        exchange: &str,
        routing_key: &str,
        payload: &str,
        description: &str,
    ) -> Result<(), AppError> {
        let record = FutureRecord::to(exchange).key(routing_key).payload(payload);

        match self.producer.send(record, Duration::from_secs(5)).await {
            Ok((partition, offset)) => {
                tracing::debug!(
                    exchange = %exchange,
                    routing_key = %routing_key,
                    partition = partition,
                    offset = offset,
                    "{description}"
                );
                Ok(())
            }
            Err((e, _)) => {
                tracing::error!(
                    error = %e,
                    exchange = %exchange,
                    routing_key = %routing_key,
                    "failed to publish notification"
                );
                Err(AppError::NotificationDelivery(e.to_string()))
            }
        }
    }
}
