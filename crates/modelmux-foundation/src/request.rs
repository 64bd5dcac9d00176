//! Request model and validation.
//!
//! The wire payload decodes into [`RawRequest`], a deliberately lenient shape
//! where everything is optional. [`RawRequest::validate`] turns it into a
//! typed [`Request`] or reports the first violated constraint. Nothing
//! mutates a `Request` after validation; each one is owned by exactly one
//! in-flight dispatch.

use crate::classify::{CapabilityHint, Complexity, TaskType};
use crate::error::{RouterError, RouterResult};
use serde::{Deserialize, Serialize};

/// Upper bound on `max_tokens`.
pub const MAX_TOKENS_LIMIT: u64 = 128_000;
/// Upper bound on `temperature`.
pub const TEMPERATURE_LIMIT: f64 = 2.0;

/// Message author role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "system" => Some(Self::System),
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            _ => None,
        }
    }
}

/// One conversation turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A function tool the caller wants exposed to the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolSpec {
    /// Always `"function"`; other tool kinds are rejected at validation.
    #[serde(rename = "type")]
    pub tool_type: String,
    pub function: FunctionSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionSpec {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for the function arguments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Value>,
}

// ============================================================================
// Wire shape
// ============================================================================

/// Decoded request payload before validation. Every field is optional so a
/// malformed request still decodes and fails with a validation error rather
/// than an opaque decode error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRequest {
    pub provider: Option<String>,
    pub model: Option<String>,
    #[serde(default)]
    pub messages: Vec<RawMessage>,
    pub max_tokens: Option<u64>,
    pub temperature: Option<f64>,
    pub stream: Option<bool>,
    pub correlation_id: Option<String>,
    #[serde(default)]
    pub tools: Vec<RawTool>,
    pub complexity: Option<String>,
    pub task_type: Option<String>,
    #[serde(default)]
    pub capabilities: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMessage {
    pub role: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTool {
    #[serde(rename = "type")]
    pub tool_type: Option<String>,
    pub function: Option<RawFunction>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFunction {
    pub name: Option<String>,
    pub description: Option<String>,
    pub parameters: Option<serde_json::Value>,
}

// ============================================================================
// Validated shape
// ============================================================================

/// A validated completion request.
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub stream: bool,
    pub correlation_id: Option<String>,
    pub tools: Vec<ToolSpec>,
    pub complexity: Option<Complexity>,
    pub task_type: Option<TaskType>,
    pub capabilities: Vec<CapabilityHint>,
}

impl Request {
    /// All message contents joined for analyzer input.
    pub fn content_text(&self) -> String {
        self.messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Total length of all message contents.
    pub fn content_len(&self) -> usize {
        self.messages.iter().map(|m| m.content.len()).sum()
    }
}

impl RawRequest {
    /// Validate into a typed [`Request`].
    ///
    /// Checks run in a fixed order and stop at the first violation: messages
    /// present and well-formed, numeric ranges, enum vocabulary, tools.
    /// Whitespace-only content is accepted; only the empty string is
    /// rejected.
    pub fn validate(self) -> RouterResult<Request> {
        if self.messages.is_empty() {
            return Err(RouterError::validation("messages must not be empty"));
        }

        let mut messages = Vec::with_capacity(self.messages.len());
        for (i, message) in self.messages.into_iter().enumerate() {
            let role = match message.role.as_deref() {
                None => {
                    return Err(RouterError::validation(format!(
                        "message {i}: missing role"
                    )));
                }
                Some(raw) => Role::from_str_opt(raw).ok_or_else(|| {
                    RouterError::validation(format!("message {i}: invalid role '{raw}'"))
                })?,
            };
            let content = message.content.unwrap_or_default();
            if content.is_empty() {
                return Err(RouterError::validation(format!(
                    "message {i}: content must not be empty"
                )));
            }
            messages.push(ChatMessage { role, content });
        }

        let max_tokens = match self.max_tokens {
            None => None,
            Some(n) if (1..=MAX_TOKENS_LIMIT).contains(&n) => Some(n as u32),
            Some(n) => {
                return Err(RouterError::validation(format!(
                    "max_tokens must be between 1 and {MAX_TOKENS_LIMIT}, got {n}"
                )));
            }
        };

        let temperature = match self.temperature {
            None => None,
            Some(t) if (0.0..=TEMPERATURE_LIMIT).contains(&t) => Some(t as f32),
            Some(t) => {
                return Err(RouterError::validation(format!(
                    "temperature must be between 0.0 and {TEMPERATURE_LIMIT}, got {t}"
                )));
            }
        };

        let complexity = match self.complexity.as_deref() {
            None => None,
            Some(raw) => Some(Complexity::from_str_opt(raw).ok_or_else(|| {
                RouterError::validation(format!("unknown complexity '{raw}'"))
            })?),
        };

        let task_type = match self.task_type.as_deref() {
            None => None,
            Some(raw) => Some(TaskType::from_str_opt(raw).ok_or_else(|| {
                RouterError::validation(format!("unknown task_type '{raw}'"))
            })?),
        };

        let mut capabilities = Vec::with_capacity(self.capabilities.len());
        for raw in &self.capabilities {
            let hint = CapabilityHint::from_str_opt(raw).ok_or_else(|| {
                RouterError::validation(format!("unknown capability '{raw}'"))
            })?;
            capabilities.push(hint);
        }

        let mut tools = Vec::with_capacity(self.tools.len());
        for (i, tool) in self.tools.into_iter().enumerate() {
            let tool_type = tool.tool_type.unwrap_or_default();
            if tool_type != "function" {
                return Err(RouterError::validation(format!(
                    "tool {i}: type must be \"function\", got '{tool_type}'"
                )));
            }
            let function = tool.function.ok_or_else(|| {
                RouterError::validation(format!("tool {i}: missing function definition"))
            })?;
            let name = function.name.unwrap_or_default();
            if name.is_empty() {
                return Err(RouterError::validation(format!(
                    "tool {i}: function name must not be empty"
                )));
            }
            tools.push(ToolSpec {
                tool_type,
                function: FunctionSpec {
                    name,
                    description: function.description,
                    parameters: function.parameters,
                },
            });
        }

        Ok(Request {
            provider: self.provider,
            model: self.model,
            messages,
            max_tokens,
            temperature,
            stream: self.stream.unwrap_or(false),
            correlation_id: self.correlation_id,
            tools,
            complexity,
            task_type,
            capabilities,
        })
    }
}
