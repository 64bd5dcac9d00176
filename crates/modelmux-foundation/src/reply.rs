//! Reply publishing.
//!
//! Every admitted request gets exactly one reply: a [`Response`] on success
//! or an [`ErrorEnvelope`] otherwise. Replies go to the request envelope's
//! `reply_to` topic when one is set, else to the configured broadcast topic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use modelmux_kernel::bus::{BusMessage, MessageBus};

use crate::config::TopicConfig;
use crate::error::RouterError;

/// Successful completion payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub text: String,
    /// Qualified model name, `provider:model`.
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_cents: Option<f64>,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

impl Response {
    pub fn new(text: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model: model.into(),
            tokens_used: None,
            cost_cents: None,
            timestamp: Utc::now(),
            correlation_id: None,
        }
    }

    pub fn with_tokens_used(mut self, tokens: u32) -> Self {
        self.tokens_used = Some(tokens);
        self
    }

    pub fn with_cost_cents(mut self, cost: f64) -> Self {
        self.cost_cents = Some(cost);
        self
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }
}

/// Failure payload carrying a stable machine-readable code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ErrorEnvelope {
    pub fn from_error(error: &RouterError, correlation_id: Option<String>) -> Self {
        Self {
            error: error.to_string(),
            error_code: error.code().to_string(),
            correlation_id,
            timestamp: Utc::now(),
        }
    }
}

/// Publishes replies over the bus.
#[derive(Clone)]
pub struct ReplyEmitter {
    bus: Arc<dyn MessageBus>,
    topics: TopicConfig,
}

impl ReplyEmitter {
    pub fn new(bus: Arc<dyn MessageBus>, topics: TopicConfig) -> Self {
        Self { bus, topics }
    }

    /// Publishes a success reply. Failures are logged and swallowed so the
    /// dispatch path never double-replies or retries.
    pub async fn emit_response(&self, reply_to: Option<&str>, response: &Response) {
        let topic = reply_to.unwrap_or(&self.topics.response);
        self.publish(topic, response, response.correlation_id.clone())
            .await;
    }

    /// Publishes an error reply. Failures are logged and swallowed.
    pub async fn emit_error(&self, reply_to: Option<&str>, envelope: &ErrorEnvelope) {
        let topic = reply_to.unwrap_or(&self.topics.error);
        self.publish(topic, envelope, envelope.correlation_id.clone())
            .await;
    }

    async fn publish<T: Serialize>(&self, topic: &str, payload: &T, correlation_id: Option<String>) {
        let message = match BusMessage::json(topic, payload) {
            Ok(message) => match correlation_id {
                Some(id) => message.with_correlation_id(&id),
                None => message,
            },
            Err(e) => {
                tracing::error!(topic = %topic, error = %e, "failed to encode reply");
                return;
            }
        };
        if let Err(e) = self.bus.publish(topic, message).await {
            tracing::warn!(topic = %topic, error = %e, "failed to publish reply");
        }
    }
}
