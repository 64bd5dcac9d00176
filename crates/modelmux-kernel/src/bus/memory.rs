//! In-memory message bus over tokio broadcast channels.
//!
//! Topic channels are created lazily on first subscribe. Publishing to a
//! topic nobody has subscribed to drops the message, matching broker
//! fire-and-forget semantics. Slow subscribers skip lagged messages rather
//! than stalling the topic.

use crate::bus::envelope::BusMessage;
use crate::bus::traits::{BusResult, BusSubscription, MessageBus};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

/// Per-topic buffer before slow subscribers start losing messages.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct InMemoryBus {
    channels: Arc<RwLock<HashMap<String, broadcast::Sender<BusMessage>>>>,
    capacity: usize,
}

impl InMemoryBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            capacity,
        }
    }

    async fn sender(&self, topic: &str) -> broadcast::Sender<BusMessage> {
        {
            let channels = self.channels.read().await;
            if let Some(sender) = channels.get(topic) {
                return sender.clone();
            }
        }
        let mut channels = self.channels.write().await;
        channels
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone()
    }
}

impl Default for InMemoryBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageBus for InMemoryBus {
    async fn publish(&self, topic: &str, message: BusMessage) -> BusResult<()> {
        let sender = {
            let channels = self.channels.read().await;
            channels.get(topic).cloned()
        };
        let Some(sender) = sender else {
            tracing::trace!(topic, "no subscribers, dropping message");
            return Ok(());
        };
        // A send error only means every receiver is gone, which is the same
        // fire-and-forget outcome as an unknown topic.
        let _ = sender.send(message);
        Ok(())
    }

    async fn subscribe(&self, topic: &str) -> BusResult<Box<dyn BusSubscription>> {
        let sender = self.sender(topic).await;
        Ok(Box::new(MemorySubscription {
            topic: topic.to_string(),
            receiver: sender.subscribe(),
        }))
    }
}

struct MemorySubscription {
    topic: String,
    receiver: broadcast::Receiver<BusMessage>,
}

#[async_trait]
impl BusSubscription for MemorySubscription {
    async fn next(&mut self) -> Option<BusMessage> {
        loop {
            match self.receiver.recv().await {
                Ok(message) => return Some(message),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(topic = %self.topic, skipped, "subscriber lagged, skipping");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    fn topic(&self) -> &str {
        &self.topic
    }
}
