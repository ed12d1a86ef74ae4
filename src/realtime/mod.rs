pub mod events;

pub use events::{BroadcastError, ChatEvent};

use async_trait::async_trait;
use redis::AsyncCommands;
use std::time::Duration;

const EMIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Emit side of the real-time path. The service layer only knows this trait;
/// tests substitute recording fakes.
#[async_trait]
pub trait RealtimeNotifier: Send + Sync {
    async fn emit(&self, event: &ChatEvent) -> Result<(), BroadcastError>;
}

/// Publishes event envelopes to a single Redis pub/sub channel.
pub struct RedisNotifier {
    client: redis::Client,
    channel: String,
}

impl RedisNotifier {
    pub fn new(client: redis::Client, channel: String) -> Self {
        Self { client, channel }
    }
}

#[async_trait]
impl RealtimeNotifier for RedisNotifier {
    async fn emit(&self, event: &ChatEvent) -> Result<(), BroadcastError> {
        let payload = event
            .to_broadcast_payload()
            .map_err(|e| BroadcastError::Serialization(e.to_string()))?;

        let publish = async {
            let mut conn = self
                .client
                .get_multiplexed_async_connection()
                .await
                .map_err(|e| BroadcastError::Redis(e.to_string()))?;
            conn.publish::<_, _, ()>(&self.channel, payload)
                .await
                .map_err(|e| BroadcastError::Redis(e.to_string()))
        };

        // Bounded: a stuck Redis must not hold up the request path.
        tokio::time::timeout(EMIT_TIMEOUT, publish)
            .await
            .map_err(|_| BroadcastError::Timeout(EMIT_TIMEOUT))?
    }
}
