use async_trait::async_trait;
use modelmux_foundation::candidates::Provider;
use modelmux_foundation::error::{RouterError, RouterResult};
use modelmux_foundation::provider::{GenerateOutput, ProviderAdapter, ProviderCall};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// A mock provider adapter with a predefined outcome.
///
/// It lets developers pin what a provider returns and how long it takes,
/// and inspect every call the router dispatched to it.
#[derive(Clone)]
pub struct MockAdapter {
    provider: Provider,
    delay: Duration,
    response: String,
    tokens_used: Option<u32>,
    failure: Option<String>,
    /// Track all calls dispatched to this adapter
    pub call_history: Arc<RwLock<Vec<ProviderCall>>>,
}

impl MockAdapter {
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            delay: Duration::ZERO,
            response: "This is a mock response.".to_string(),
            tokens_used: None,
            failure: None,
            call_history: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Sets the text this adapter will produce.
    pub fn with_response(mut self, text: &str) -> Self {
        self.response = text.to_string();
        self
    }

    /// Sets the usage the adapter reports alongside its response.
    pub fn with_tokens_used(mut self, tokens: u32) -> Self {
        self.tokens_used = Some(tokens);
        self
    }

    /// Makes every call take this long before completing.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Makes every call fail with a provider error carrying `message`.
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    /// Provider this adapter answers for.
    pub fn provider(&self) -> Provider {
        self.provider
    }

    /// Retrieve the history of calls made to this adapter
    pub async fn history(&self) -> Vec<ProviderCall> {
        self.call_history.read().await.clone()
    }

    /// Check the total number of times this adapter was called
    pub async fn call_count(&self) -> usize {
        self.call_history.read().await.len()
    }
}

#[async_trait]
impl ProviderAdapter for MockAdapter {
    fn provider(&self) -> Provider {
        self.provider
    }

    async fn generate(&self, call: ProviderCall) -> RouterResult<GenerateOutput> {
        self.call_history.write().await.push(call);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if let Some(message) = &self.failure {
            return Err(RouterError::provider(self.provider.as_str(), message.clone()));
        }
        Ok(GenerateOutput {
            text: self.response.clone(),
            tokens_used: self.tokens_used,
        })
    }
}

#[macro_export]
macro_rules! assert_adapter_called {
    ($adapter:expr, $expected_count:expr) => {
        let count = $adapter.call_count().await;
        assert_eq!(
            count, $expected_count,
            "Expected adapter '{}' to be called {} times, but was called {} times",
            $adapter.provider(),
            $expected_count,
            count
        );
    };
}
