//! Provider adapter seam.
//!
//! A [`ProviderAdapter`] fronts one concrete backend (a CLI wrapper or HTTP
//! client built elsewhere). The router hands every adapter the same call
//! shape and expects plain text plus optional usage back; anything
//! provider-specific stays behind the trait.

use crate::candidates::Provider;
use crate::error::RouterResult;
use crate::request::{ChatMessage, ToolSpec};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Uniform adapter-facing call, assembled by the dispatcher.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderCall {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<AdapterTool>,
}

/// Tool definition in the uniform adapter shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdapterTool {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Value>,
}

/// Flatten validated request tools into the adapter shape.
pub fn translate_tools(tools: &[ToolSpec]) -> Vec<AdapterTool> {
    tools
        .iter()
        .map(|tool| AdapterTool {
            name: tool.function.name.clone(),
            description: tool.function.description.clone(),
            parameters: tool.function.parameters.clone(),
        })
        .collect()
}

/// What a provider returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOutput {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u32>,
}

/// One concrete provider backend.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Which provider this adapter fronts.
    fn provider(&self) -> Provider;

    /// Execute one completion call.
    async fn generate(&self, call: ProviderCall) -> RouterResult<GenerateOutput>;
}

/// Registry of live adapters keyed by provider.
pub struct AdapterRegistry {
    adapters: RwLock<HashMap<Provider, Arc<dyn ProviderAdapter>>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self {
            adapters: RwLock::new(HashMap::new()),
        }
    }

    /// Register an adapter under its own provider key. Re-registering a
    /// provider replaces the previous adapter.
    pub async fn register(&self, adapter: Arc<dyn ProviderAdapter>) {
        let provider = adapter.provider();
        let mut adapters = self.adapters.write().await;
        adapters.insert(provider, adapter);
    }

    pub async fn get(&self, provider: Provider) -> Option<Arc<dyn ProviderAdapter>> {
        let adapters = self.adapters.read().await;
        adapters.get(&provider).cloned()
    }

    pub async fn providers(&self) -> Vec<Provider> {
        let adapters = self.adapters.read().await;
        adapters.keys().copied().collect()
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::FunctionSpec;

    struct EchoAdapter(Provider);

    #[async_trait]
    impl ProviderAdapter for EchoAdapter {
        fn provider(&self) -> Provider {
            self.0
        }

        async fn generate(&self, call: ProviderCall) -> RouterResult<GenerateOutput> {
            Ok(GenerateOutput {
                text: format!("echo from {}", call.model),
                tokens_used: Some(7),
            })
        }
    }

    #[tokio::test]
    async fn test_register_and_get() {
        let registry = AdapterRegistry::new();
        registry.register(Arc::new(EchoAdapter(Provider::Claude))).await;
        registry.register(Arc::new(EchoAdapter(Provider::Gemini))).await;

        let adapter = registry.get(Provider::Claude).await.unwrap();
        assert_eq!(adapter.provider(), Provider::Claude);
        assert!(registry.get(Provider::Codex).await.is_none());

        let mut providers = registry.providers().await;
        providers.sort_by_key(|p| p.as_str());
        assert_eq!(providers, vec![Provider::Claude, Provider::Gemini]);
    }

    #[tokio::test]
    async fn test_generate_through_registry() {
        let registry = AdapterRegistry::new();
        registry.register(Arc::new(EchoAdapter(Provider::Codex))).await;

        let adapter = registry.get(Provider::Codex).await.unwrap();
        let output = adapter
            .generate(ProviderCall {
                model: "o3-mini".to_string(),
                messages: vec![ChatMessage::user("hi")],
                max_tokens: None,
                temperature: None,
                tools: Vec::new(),
            })
            .await
            .unwrap();
        assert_eq!(output.text, "echo from o3-mini");
        assert_eq!(output.tokens_used, Some(7));
    }

    #[test]
    fn test_translate_tools() {
        let tools = vec![ToolSpec {
            tool_type: "function".to_string(),
            function: FunctionSpec {
                name: "lookup".to_string(),
                description: Some("find things".to_string()),
                parameters: Some(serde_json::json!({"type": "object"})),
            },
        }];
        let translated = translate_tools(&tools);
        assert_eq!(translated.len(), 1);
        assert_eq!(translated[0].name, "lookup");
        assert_eq!(translated[0].description.as_deref(), Some("find things"));
    }

    #[test]
    fn test_call_serialization_omits_empty_fields() {
        let call = ProviderCall {
            model: "claude-sonnet-4".to_string(),
            messages: vec![ChatMessage::user("hi")],
            max_tokens: None,
            temperature: None,
            tools: Vec::new(),
        };
        let value = serde_json::to_value(&call).unwrap();
        assert!(value.get("max_tokens").is_none());
        assert!(value.get("tools").is_none());
    }
}
