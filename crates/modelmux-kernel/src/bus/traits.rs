// MessageBus trait

use crate::bus::envelope::BusMessage;
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum BusError {
    #[error("Topic closed: {0}")]
    TopicClosed(String),
    #[error("Channel error: {0}")]
    ChannelError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type BusResult<T> = Result<T, BusError>;

/// A live subscription to one topic.
///
/// Dropping the subscription ends delivery; the transport is free to discard
/// anything published afterwards.
#[async_trait]
pub trait BusSubscription: Send {
    /// Next message on the topic, or `None` once the topic is closed.
    async fn next(&mut self) -> Option<BusMessage>;

    fn topic(&self) -> &str;
}

/// Transport seam for request/reply traffic.
///
/// Semantics follow a fire-and-forget broker: publishing to a topic with no
/// subscribers succeeds and drops the message, and delivery is at-most-once.
/// Redelivery and durability belong to the transport behind this trait, not
/// to callers.
#[async_trait]
pub trait MessageBus: Send + Sync + 'static {
    async fn publish(&self, topic: &str, message: BusMessage) -> BusResult<()>;

    async fn subscribe(&self, topic: &str) -> BusResult<Box<dyn BusSubscription>>;
}
