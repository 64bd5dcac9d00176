//! Router configuration.

use serde::{Deserialize, Serialize};

use crate::error::{RouterError, RouterResult};

/// Default cap on concurrently dispatched requests.
pub const DEFAULT_MAX_CONCURRENT: usize = 10;

/// Default per-request deadline in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Bus topics the router listens and replies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicConfig {
    #[serde(default = "default_request_topic")]
    pub request: String,
    #[serde(default = "default_response_topic")]
    pub response: String,
    #[serde(default = "default_error_topic")]
    pub error: String,
}

fn default_request_topic() -> String {
    "llm.request".to_string()
}

fn default_response_topic() -> String {
    "llm.response".to_string()
}

fn default_error_topic() -> String {
    "llm.error".to_string()
}

impl Default for TopicConfig {
    fn default() -> Self {
        Self {
            request: default_request_topic(),
            response: default_response_topic(),
            error: default_error_topic(),
        }
    }
}

/// Top-level router settings. Absent fields fall back to defaults, so an
/// empty config file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterConfig {
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default)]
    pub topics: TopicConfig,
}

fn default_max_concurrent() -> usize {
    DEFAULT_MAX_CONCURRENT
}

fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            topics: TopicConfig::default(),
        }
    }
}

impl RouterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    pub fn with_request_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = timeout_ms;
        self
    }

    pub fn with_topics(mut self, topics: TopicConfig) -> Self {
        self.topics = topics;
        self
    }

    /// Loads settings from a TOML, YAML, or JSON file with env var
    /// substitution.
    pub fn load(path: &str) -> RouterResult<Self> {
        modelmux_kernel::config::load_config(path)
            .map_err(|e| RouterError::internal(format!("failed to load config: {e}")))
    }
}
