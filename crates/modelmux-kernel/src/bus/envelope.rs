use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

// Standardized message envelope carried over the bus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusMessage {
    pub message_id: String,
    pub topic: String,
    pub reply_to: Option<String>,
    pub correlation_id: Option<String>,
    pub timestamp_ms: u64,
    pub payload: Vec<u8>,
}

impl BusMessage {
    pub fn new(topic: &str, payload: Vec<u8>) -> Self {
        Self {
            message_id: uuid::Uuid::now_v7().to_string(),
            topic: topic.to_string(),
            reply_to: None,
            correlation_id: None,
            timestamp_ms: now_epoch_ms(),
            payload,
        }
    }

    /// Build an envelope whose payload is the JSON encoding of `value`.
    pub fn json<T: Serialize>(topic: &str, value: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::new(topic, serde_json::to_vec(value)?))
    }

    pub fn with_reply_to(mut self, topic: &str) -> Self {
        self.reply_to = Some(topic.to_string());
        self
    }

    pub fn with_correlation_id(mut self, id: &str) -> Self {
        self.correlation_id = Some(id.to_string());
        self
    }

    /// Decode the payload as JSON.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.payload)
    }
}

pub(crate) fn now_epoch_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
